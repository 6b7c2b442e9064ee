//! Common imports for typical client usage.
pub use crate::{
    ClientError, CreateDatabaseOperation, DeleteDatabaseOperation, DocumentConventions,
    DocumentStore, GetClusterTopologyCommand, GetDatabaseNamesOperation, GetStatisticsOperation,
    GetTopologyCommand, RavenCommand, Session,
};
