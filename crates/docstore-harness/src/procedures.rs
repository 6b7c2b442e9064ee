//! Exercise procedures. Each one builds its own store, sends a single
//! operation (two for create-and-delete) and returns what the server said.
//! Errors are returned untouched.
use std::sync::Arc;

use docstore_client::prelude::*;
use docstore_client::{
    DatabasePutResult, DatabaseStatistics, DeleteDatabaseResult, HttpTransport, Topology,
};
use tracing::info;

/// Where procedures connect: server URLs plus an optional transport override.
#[derive(Clone)]
pub struct Target {
    urls: Vec<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Target {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn open_store(&self, database: &str) -> Result<DocumentStore, ClientError> {
        let mut builder = DocumentStore::builder()
            .urls(self.urls.iter().cloned())
            .database(database);
        if let Some(transport) = &self.transport {
            builder = builder.transport(transport.clone());
        }
        builder.initialize()
    }
}

/// Output of the create-then-delete procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAndDeleteOutcome {
    pub name: String,
    pub created: DatabasePutResult,
    pub deleted: DeleteDatabaseResult,
}

/// Unique database name for runs that must not collide with earlier ones.
pub fn random_database_name() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub async fn list_database_names(
    target: &Target,
    start: u32,
    page_size: u32,
) -> Result<Vec<String>, ClientError> {
    let store = target.open_store("")?;
    store
        .maintenance()
        .server()
        .send(&GetDatabaseNamesOperation::new(start, page_size))
        .await
}

pub async fn get_statistics(
    target: &Target,
    database: &str,
) -> Result<DatabaseStatistics, ClientError> {
    let store = target.open_store(database)?;
    store.maintenance().send(&GetStatisticsOperation::new()).await
}

pub async fn get_topology(target: &Target, database: &str) -> Result<Topology, ClientError> {
    let store = target.open_store(database)?;
    let session = store.open_session()?;
    session.execute(&GetTopologyCommand::new()).await
}

pub async fn create_database(
    target: &Target,
    name: &str,
) -> Result<DatabasePutResult, ClientError> {
    let store = target.open_store("")?;
    store
        .maintenance()
        .server()
        .send(&CreateDatabaseOperation::new(name))
        .await
}

/// Creates `name`, reports the acknowledgment through `on_created`, then
/// deletes it. `on_created` runs before the delete is sent, so a failed
/// delete still leaves the created database reported.
pub async fn create_and_delete_database(
    target: &Target,
    name: &str,
    hard_delete: bool,
    on_created: impl FnOnce(&DatabasePutResult),
) -> Result<CreateAndDeleteOutcome, ClientError> {
    let store = target.open_store("")?;
    let server = store.maintenance().server();
    let created = server.send(&CreateDatabaseOperation::new(name)).await?;
    info!(name, raft_index = created.raft_command_index, "database created");
    on_created(&created);
    let deleted = server
        .send(&DeleteDatabaseOperation::new(name, hard_delete))
        .await?;
    info!(name, hard_delete, "database deleted");
    Ok(CreateAndDeleteOutcome {
        name: name.to_string(),
        created,
        deleted,
    })
}
