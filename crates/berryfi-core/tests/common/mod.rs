//! Shared fixtures for berryfi-core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use berryfi_core::{BerryfiError, Command, CommandExecutor, CommandOutcome, Ingestor, Workspace};
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Executor that replays scripted outcomes and records every request.
#[derive(Default)]
pub struct MockExecutor {
    responses: Mutex<VecDeque<Vec<CommandOutcome>>>,
    requests: Mutex<Vec<Vec<Command>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcomes returned by the next `execute` call.
    pub fn respond(&self, outcomes: Vec<CommandOutcome>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcomes);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<Vec<Command>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The single command of the most recent request.
    pub fn last_command(&self) -> Command {
        self.requests()
            .last()
            .and_then(|request| request.first().cloned())
            .expect("at least one request")
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(&self, commands: &[Command]) -> Result<Vec<CommandOutcome>, BerryfiError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(commands.to_vec());
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| BerryfiError::Transport("no scripted response".to_string()))
    }
}

/// A small schema: one primitive, two user types in two apps, one helper type.
pub fn schema_result() -> Value {
    json!({
        "fibery/id": "ws-1",
        "fibery/version": 7,
        "fibery/meta": {"fibery/version": "1", "fibery/rel-version": "2020-06"},
        "fibery/types": [
            {
                "fibery/id": "p-text",
                "fibery/name": {"fibery/name": "fibery/text", "fibery/primitive?": true}
            },
            {
                "fibery/id": "t-person",
                "fibery/name": "MyApp/Person",
                "fibery/meta": {"fibery/domain?": true, "fibery/secured?": true},
                "fibery/fields": [
                    {
                        "fibery/id": "f-id",
                        "fibery/name": "fibery/id",
                        "fibery/type": "fibery/uuid",
                        "fibery/meta": {"fibery/id?": true, "fibery/readonly?": true}
                    },
                    {
                        "fibery/id": "f-public-id",
                        "fibery/name": "fibery/public-id",
                        "fibery/type": "fibery/text",
                        "fibery/meta": {"fibery/public-id?": true, "fibery/readonly?": true}
                    },
                    {
                        "fibery/id": "f-name",
                        "fibery/name": "MyApp/Name",
                        "fibery/type": "fibery/text",
                        "fibery/meta": {"ui/title?": true}
                    },
                    {
                        "fibery/id": "f-email",
                        "fibery/name": "MyApp/User email",
                        "fibery/type": "fibery/email"
                    },
                    {
                        "fibery/id": "f-secret",
                        "fibery/name": "MyApp/Secret",
                        "fibery/type": "fibery/text"
                    }
                ]
            },
            {
                "fibery/id": "t-deal",
                "fibery/name": "Sales/Deal",
                "fibery/meta": {"fibery/domain?": true},
                "fibery/fields": []
            },
            {
                "fibery/id": "t-state",
                "fibery/name": "workflow/state",
                "fibery/meta": {},
                "fibery/fields": [
                    {"fibery/id": "f-state-name", "fibery/name": "enum/name", "fibery/type": "fibery/text"}
                ]
            }
        ]
    })
}

/// A workspace with [`schema_result`] ingested.
pub fn workspace() -> Workspace {
    let mut workspace = Workspace::new();
    Ingestor::ingest_schema(&mut workspace, &schema_result()).expect("ingest fixture");
    workspace
}

/// Turn a JSON object literal into a field map.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
