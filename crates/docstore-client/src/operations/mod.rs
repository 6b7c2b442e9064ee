//! Operations: immutable request descriptions sent through a maintenance channel.
//!
//! Server operations run against the server as a whole; maintenance operations
//! run against one database.
mod maintenance;
mod server;

pub use maintenance::GetStatisticsOperation;
pub use server::{CreateDatabaseOperation, DeleteDatabaseOperation, GetDatabaseNamesOperation};

use crate::commands::RavenCommand;
use crate::conventions::DocumentConventions;
use crate::errors::ClientError;

/// Operation sent through `ServerOperationExecutor::send`.
pub trait ServerOperation: Send + Sync {
    type Command: RavenCommand;

    /// Validates the operation and builds its command.
    fn command(&self, conventions: &DocumentConventions) -> Result<Self::Command, ClientError>;
}

/// Operation sent through `MaintenanceOperationExecutor::send`.
pub trait MaintenanceOperation: Send + Sync {
    type Command: RavenCommand;

    fn command(&self, conventions: &DocumentConventions) -> Result<Self::Command, ClientError>;
}
