//! # Berryfi Client
//!
//! Owns the command executor and the ingested workspace schema.

use crate::config::BerryfiConfig;
use crate::http::HttpExecutor;
use berryfi_core::{
    BerryfiError, Command, CommandExecutor, IngestReport, Ingestor, Workspace, WorkspaceInfo,
    execute_checked, execute_one,
};
use serde_json::Value;
use std::sync::Arc;

/// A Fibery workspace client.
///
/// Entity operations take the executor explicitly, so a type borrowed
/// mutably from [`Berryfi::workspace_mut`] can still reach the remote via
/// [`Berryfi::executor`].
pub struct Berryfi<E: CommandExecutor = HttpExecutor> {
    executor: Arc<E>,
    workspace: Workspace,
}

impl Berryfi<HttpExecutor> {
    /// Create a client talking HTTP to the configured workspace.
    pub fn new(config: &BerryfiConfig) -> Result<Self, BerryfiError> {
        tracing::debug!(workspace = %config.workspace, "creating client");
        let executor = HttpExecutor::new(config)?;
        Ok(Self::with_executor(executor))
    }
}

impl<E: CommandExecutor> Berryfi<E> {
    /// Create a client over any executor.
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
            workspace: Workspace::new(),
        }
    }

    /// Query the schema and replace the workspace with it.
    ///
    /// The previous workspace is kept if the query or ingestion fails.
    pub async fn load(&mut self) -> Result<IngestReport, BerryfiError> {
        let result = execute_one(self.executor.as_ref(), Command::schema_query()).await?;

        let mut fresh = Workspace::new();
        let report = Ingestor::ingest_schema(&mut fresh, &result)?;
        self.workspace = fresh;
        Ok(report)
    }

    /// Execute raw commands, failing on any unsuccessful one.
    pub async fn execute(&self, commands: &[Command]) -> Result<Vec<Value>, BerryfiError> {
        execute_checked(self.executor.as_ref(), commands).await
    }

    /// A shared handle to the executor.
    pub fn executor(&self) -> Arc<E> {
        Arc::clone(&self.executor)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    /// Workspace identity from the last successful [`Berryfi::load`].
    pub fn info(&self) -> Option<&WorkspaceInfo> {
        self.workspace.info()
    }
}
