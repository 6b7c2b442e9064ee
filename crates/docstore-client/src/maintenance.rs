use tracing::debug;

use crate::commands::RavenCommand;
use crate::errors::ClientError;
use crate::model::validate_database_name;
use crate::operations::{MaintenanceOperation, ServerOperation};
use crate::store::DocumentStore;

type OperationOutput<O> = <<O as MaintenanceOperation>::Command as RavenCommand>::Output;
type ServerOperationOutput<O> = <<O as ServerOperation>::Command as RavenCommand>::Output;

/// Database-scoped administrative channel (`store.maintenance()`).
#[derive(Clone)]
pub struct MaintenanceOperationExecutor {
    store: DocumentStore,
    database: Option<String>,
}

impl MaintenanceOperationExecutor {
    pub(crate) fn new(store: DocumentStore, database: Option<String>) -> Self {
        Self { store, database }
    }

    /// Database this channel sends to.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Same channel, re-targeted at another database.
    pub fn for_database(&self, database: impl Into<String>) -> Self {
        Self::new(self.store.clone(), Some(database.into()))
    }

    /// Server-wide channel (`store.maintenance().server()`).
    pub fn server(&self) -> ServerOperationExecutor {
        ServerOperationExecutor {
            store: self.store.clone(),
        }
    }

    pub async fn send<O: MaintenanceOperation>(
        &self,
        operation: &O,
    ) -> Result<OperationOutput<O>, ClientError> {
        self.store.ensure_open()?;
        let database = self.database.as_deref().ok_or_else(|| {
            ClientError::Validation(
                "no database selected for maintenance operation; configure a default database or use for_database(name)".into(),
            )
        })?;
        validate_database_name(database)?;
        let command = operation.command(self.store.conventions())?;
        debug!(database, "sending maintenance operation");
        self.store.request_executor(database).execute(&command).await
    }
}

/// Server-wide administrative channel.
#[derive(Clone)]
pub struct ServerOperationExecutor {
    store: DocumentStore,
}

impl ServerOperationExecutor {
    pub async fn send<O: ServerOperation>(
        &self,
        operation: &O,
    ) -> Result<ServerOperationOutput<O>, ClientError> {
        self.store.ensure_open()?;
        let command = operation.command(self.store.conventions())?;
        debug!("sending server operation");
        self.store.server_executor().execute(&command).await
    }
}
