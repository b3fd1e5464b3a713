//! # Commands
//!
//! The narrow command protocol spoken with Fibery, and the executor seam the
//! transport plugs into.
//!
//! A request is an ordered list of commands; the response is an ordered list
//! of `{success, result}` outcomes, one per command. Any failed outcome fails
//! the whole call with a single aggregated error.

use crate::primitives::{
    CMD_BATCH, CMD_ENTITY_CREATE, CMD_ENTITY_QUERY, CMD_ENTITY_UPDATE, CMD_SCHEMA_QUERY, ID_KEY,
};
use crate::types::BerryfiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

// =============================================================================
// COMMAND
// =============================================================================

/// A single remote command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

impl Command {
    /// A command without arguments.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: None,
        }
    }

    /// A command with arguments.
    #[must_use]
    pub fn with_args(command: impl Into<String>, args: Value) -> Self {
        Self {
            command: command.into(),
            args: Some(args),
        }
    }

    /// `fibery.schema/query`: the full type list plus workspace identity.
    #[must_use]
    pub fn schema_query() -> Self {
        Self::new(CMD_SCHEMA_QUERY)
    }

    /// `fibery.entity/create` for one record of `type_name`.
    #[must_use]
    pub fn create_entity(type_name: &str, entity: Map<String, Value>) -> Self {
        Self::with_args(
            CMD_ENTITY_CREATE,
            json!({ "type": type_name, "entity": entity }),
        )
    }

    /// `fibery.entity/update` for one record of `type_name`.
    #[must_use]
    pub fn update_entity(type_name: &str, entity: Map<String, Value>) -> Self {
        Self::with_args(
            CMD_ENTITY_UPDATE,
            json!({ "type": type_name, "entity": entity }),
        )
    }

    /// `fibery.entity/query` for a single entity by id, selecting `select`.
    #[must_use]
    pub fn query_entity(type_name: &str, id: &str, select: Vec<String>) -> Self {
        Self::with_args(
            CMD_ENTITY_QUERY,
            json!({
                "query": {
                    "q/from": type_name,
                    "q/select": select,
                    "q/where": ["=", [ID_KEY], "$id"],
                    "q/limit": 1
                },
                "params": { "$id": id }
            }),
        )
    }

    /// `fibery.command/batch` wrapping several commands into one.
    #[must_use]
    pub fn batch(commands: Vec<Command>) -> Self {
        Self::with_args(CMD_BATCH, json!({ "commands": commands }))
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// The remote answer to one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default)]
    pub result: Value,
}

impl CommandOutcome {
    /// A successful outcome.
    #[must_use]
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result,
        }
    }

    /// A failed outcome carrying `message`.
    #[must_use]
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            result: json!({ "message": message }),
        }
    }

    /// The failure message, if the remote gave one.
    pub fn message(&self) -> Option<&str> {
        self.result.get("message").and_then(Value::as_str)
    }
}

// =============================================================================
// EXECUTOR
// =============================================================================

/// Sends an ordered list of commands and returns their outcomes, one per command.
///
/// Implementations handle transport concerns (HTTP, auth, timeouts). They
/// return `Err` only when no outcomes could be obtained at all.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, commands: &[Command]) -> Result<Vec<CommandOutcome>, BerryfiError>;
}

/// Turn raw outcomes into results, failing on any unsuccessful command.
///
/// Every failure contributes one line to the aggregated error, so a batch
/// with several problems reports all of them.
pub fn collect_results(
    commands: &[Command],
    outcomes: Vec<CommandOutcome>,
) -> Result<Vec<Value>, BerryfiError> {
    if outcomes.len() != commands.len() {
        return Err(BerryfiError::UnexpectedResponse(format!(
            "sent {} commands, received {} results",
            commands.len(),
            outcomes.len()
        )));
    }

    let errors: Vec<String> = outcomes
        .iter()
        .zip(commands)
        .filter(|(outcome, _)| !outcome.success)
        .map(|(outcome, command)| {
            format!(
                "Error while executing command '{}': {}",
                command.command,
                outcome.message().unwrap_or("unknown error")
            )
        })
        .collect();

    if !errors.is_empty() {
        return Err(BerryfiError::Batch(errors));
    }

    Ok(outcomes.into_iter().map(|o| o.result).collect())
}

/// Execute `commands` and return their results, aggregating any failures.
pub async fn execute_checked(
    executor: &dyn CommandExecutor,
    commands: &[Command],
) -> Result<Vec<Value>, BerryfiError> {
    for command in commands {
        tracing::debug!(command = %command.command, "sending command");
    }
    let outcomes = executor.execute(commands).await?;
    collect_results(commands, outcomes)
}

/// Execute a single command and return its result.
pub async fn execute_one(
    executor: &dyn CommandExecutor,
    command: Command,
) -> Result<Value, BerryfiError> {
    let commands = [command];
    let mut results = execute_checked(executor, &commands).await?;
    results
        .pop()
        .ok_or_else(|| BerryfiError::UnexpectedResponse("empty result list".to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
