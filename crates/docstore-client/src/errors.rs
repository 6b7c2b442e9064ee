use serde::Deserialize;

/// Error payload a document server attaches to 4xx/5xx responses.
///
/// Every field is optional because some statuses (notably 404) come back with
/// an empty body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ServerErrorBody {
    #[serde(rename = "Url", default)]
    pub url: Option<String>,
    #[serde(rename = "Type", default)]
    pub error_type: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl ServerErrorBody {
    /// Parses an error body, falling back to an empty payload for non-JSON text.
    pub fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: Some(body.trim().to_string()),
            ..Self::default()
        })
    }

    /// Returns true when the server reported a missing database.
    pub fn is_database_does_not_exist(&self) -> bool {
        self.error_type
            .as_deref()
            .is_some_and(|t| t.contains("DatabaseDoesNotExistException"))
    }

    fn summary(&self) -> String {
        let message = self.message.as_deref().unwrap_or("<no message>");
        match self.error_type.as_deref() {
            Some(kind) => format!("{kind}: {message}"),
            None => message.to_string(),
        }
    }
}

/// Errors returned by the store, its executors and its sessions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Invalid store or transport configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid caller input, detected before any request is sent.
    #[error("validation error: {0}")]
    Validation(String),
    /// The request never produced an HTTP response (connect, timeout, I/O).
    #[error("transport error ({url}): {message}")]
    Transport { url: String, message: String },
    /// Every candidate node failed at the transport level.
    #[error("all {} node(s) failed: {}", .failures.len(), .failures.join("; "))]
    AllNodesFailed { failures: Vec<String> },
    /// Server answered 400 Bad Request.
    #[error("server returned 400 Bad Request for '{url}': {}", .body.summary())]
    BadRequest { url: String, body: ServerErrorBody },
    /// Server answered 404 for a resource that is not database-scoped.
    #[error("server returned 404 Not Found for '{url}'")]
    NotFound { url: String },
    /// The targeted database does not exist on the server.
    #[error("database '{database}' does not exist")]
    DatabaseDoesNotExist { database: String },
    /// Server answered 409 Conflict (for example, the database already exists).
    #[error("server returned 409 Conflict for '{url}': {}", .body.summary())]
    Conflict { url: String, body: ServerErrorBody },
    /// Server answered 500 Internal Server Error.
    #[error("server returned 500 Internal Server Error for '{url}': {}", .body.summary())]
    InternalServer { url: String, body: ServerErrorBody },
    /// Server answered 503 Service Unavailable.
    #[error("server returned 503 Service Unavailable for '{url}': {}", .body.summary())]
    ServiceUnavailable { url: String, body: ServerErrorBody },
    /// Any other non-success status.
    #[error("server returned unexpected status {status} for '{url}'")]
    UnexpectedStatus { status: u16, url: String },
    /// Response shape did not match what the command expected.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The session used up its request budget.
    #[error("session exceeded its limit of {limit} requests")]
    TooManyRequests { limit: usize },
}

impl ClientError {
    pub(crate) fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Returns true for both a plain 404 and a missing database.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::DatabaseDoesNotExist { .. }
        )
    }

    /// Returns true when the server rejected the request as a conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Errors worth retrying on another node of the topology.
    pub(crate) fn should_fail_over(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::ServiceUnavailable { .. }
        )
    }
}

/// Maps a non-success HTTP status to the matching error.
///
/// `database` is set for database-scoped commands so that a 404 or a
/// `DatabaseDoesNotExistException` payload reads as a missing database.
pub(crate) fn error_from_status(
    status: u16,
    url: &str,
    body: &str,
    database: Option<&str>,
) -> ClientError {
    let parsed = ServerErrorBody::parse(body);
    if parsed.is_database_does_not_exist() {
        let database = database
            .map(ToOwned::to_owned)
            .or_else(|| parsed.message.as_deref().and_then(quoted_name))
            .unwrap_or_default();
        return ClientError::DatabaseDoesNotExist { database };
    }
    let url = url.to_string();
    match status {
        400 => ClientError::BadRequest { url, body: parsed },
        404 => match database {
            Some(database) => ClientError::DatabaseDoesNotExist {
                database: database.to_string(),
            },
            None => ClientError::NotFound { url },
        },
        409 => ClientError::Conflict { url, body: parsed },
        500 => ClientError::InternalServer { url, body: parsed },
        503 => ClientError::ServiceUnavailable { url, body: parsed },
        status => ClientError::UnexpectedStatus { status, url },
    }
}

fn quoted_name(message: &str) -> Option<String> {
    let (_, rest) = message.split_once('\'')?;
    let (name, _) = rest.split_once('\'')?;
    Some(name.to_string())
}
