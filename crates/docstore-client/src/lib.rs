//! Async client for RavenDB-compatible document servers.
//!
//! A `DocumentStore` is configured with server URLs and an optional default
//! database. Administrative requests go through maintenance channels,
//! per-database requests through sessions.
//!
//! ```no_run
//! use docstore_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let store = DocumentStore::builder()
//!     .url("http://localhost:9999")
//!     .database("")
//!     .initialize()?;
//!
//! let names = store
//!     .maintenance()
//!     .server()
//!     .send(&GetDatabaseNamesOperation::new(0, 3))
//!     .await?;
//! println!("{names:?}");
//! # Ok(())
//! # }
//! ```

/// Commands: one HTTP request plus response decoding.
pub mod commands;
/// Client tunables shared by a store's executors and sessions.
pub mod conventions;
/// Error taxonomy and server error payloads.
pub mod errors;
/// Node selection, topology discovery and failover.
pub mod executor;
/// Database-scoped and server-wide maintenance channels.
pub mod maintenance;
/// Wire types: nodes, topologies, statistics, acknowledgments.
pub mod model;
/// Request descriptions sent through maintenance channels.
pub mod operations;
/// Common imports for typical usage.
pub mod prelude;
/// Scoped sessions.
pub mod session;
/// Store handle and builder.
pub mod store;
/// HTTP transport seam and the reqwest implementation.
pub mod transport;

#[cfg(test)]
mod fake_server;

pub use commands::{GetClusterTopologyCommand, GetTopologyCommand, RavenCommand};
pub use conventions::{DocumentConventions, ReadBalanceBehavior};
pub use errors::{ClientError, ServerErrorBody};
pub use executor::RequestExecutor;
pub use maintenance::{MaintenanceOperationExecutor, ServerOperationExecutor};
pub use model::{
    ClusterTopology, ClusterTopologyResponse, DatabasePutResult, DatabaseStatistics,
    DeleteDatabaseResult, ServerNode, ServerRole, Topology,
};
pub use operations::{
    CreateDatabaseOperation, DeleteDatabaseOperation, GetDatabaseNamesOperation,
    GetStatisticsOperation, MaintenanceOperation, ServerOperation,
};
pub use session::Session;
pub use store::{DocumentStore, DocumentStoreBuilder};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
