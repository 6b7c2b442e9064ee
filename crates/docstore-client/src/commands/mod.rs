//! Commands: one HTTP request against one node, plus decoding of its response.
//!
//! Operations (see `operations`) are the user-facing request descriptions; each
//! one produces a command that a `RequestExecutor` can run.
mod databases;
mod statistics;
mod topology;

pub use databases::{CreateDatabaseCommand, DeleteDatabaseCommand, GetDatabaseNamesCommand};
pub use statistics::GetStatisticsCommand;
pub use topology::{GetClusterTopologyCommand, GetTopologyCommand};

use serde::de::DeserializeOwned;

use crate::errors::ClientError;
use crate::model::ServerNode;
use crate::transport::{HttpRequest, HttpResponse};

/// A single request the executor can send to a node.
pub trait RavenCommand: Send + Sync {
    /// Decoded result of a successful response.
    type Output: Send;

    /// Builds the request for the given node.
    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError>;

    /// Decodes a successful (2xx) response.
    fn parse_response(&self, response: &HttpResponse) -> Result<Self::Output, ClientError>;

    /// Read requests may be balanced across nodes.
    fn is_read_request(&self) -> bool {
        false
    }

    /// Database-scoped commands report a 404 as a missing database.
    fn is_database_scoped(&self) -> bool {
        false
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    command: &str,
    response: &HttpResponse,
) -> Result<T, ClientError> {
    if response.body.trim().is_empty() {
        return Err(ClientError::protocol(format!(
            "{command}: expected a JSON body, got an empty response (status {})",
            response.status
        )));
    }
    serde_json::from_str(&response.body)
        .map_err(|e| ClientError::protocol(format!("{command}: invalid response body: {e}")))
}

pub(crate) fn base_url(node: &ServerNode) -> &str {
    node.url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeleteDatabaseResult;

    #[test]
    fn empty_body_is_protocol_error() {
        let err = decode_json::<DeleteDatabaseResult>("delete", &HttpResponse::new(200, " "))
            .expect_err("empty");
        assert!(matches!(err, ClientError::Protocol(message) if message.contains("empty")));
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let node = ServerNode::new("http://localhost:9999/", "db");
        assert_eq!(base_url(&node), "http://localhost:9999");
    }
}
