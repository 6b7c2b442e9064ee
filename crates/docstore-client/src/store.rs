use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::conventions::DocumentConventions;
use crate::errors::ClientError;
use crate::executor::RequestExecutor;
use crate::maintenance::MaintenanceOperationExecutor;
use crate::model::validate_database_name;
use crate::session::Session;
use crate::transport::{HttpTransport, ReqwestTransport};

pub(crate) struct StoreInner {
    urls: Vec<String>,
    database: Option<String>,
    conventions: DocumentConventions,
    transport: Arc<dyn HttpTransport>,
    server_executor: Arc<RequestExecutor>,
    database_executors: DashMap<String, Arc<RequestExecutor>>,
    closed: AtomicBool,
}

/// Configured access to a server cluster and, optionally, a default database.
///
/// Cheap to clone; clones share executors and the transport.
#[derive(Clone)]
pub struct DocumentStore {
    pub(crate) inner: Arc<StoreInner>,
}

impl DocumentStore {
    /// Starts a builder; `initialize()` on the builder yields a usable store.
    pub fn builder() -> DocumentStoreBuilder {
        DocumentStoreBuilder::default()
    }

    pub fn urls(&self) -> &[String] {
        &self.inner.urls
    }

    /// Default database, `None` when the store was built with an empty selector.
    pub fn database(&self) -> Option<&str> {
        self.inner.database.as_deref()
    }

    pub fn conventions(&self) -> &DocumentConventions {
        &self.inner.conventions
    }

    /// Maintenance channel bound to the default database.
    pub fn maintenance(&self) -> MaintenanceOperationExecutor {
        MaintenanceOperationExecutor::new(self.clone(), self.inner.database.clone())
    }

    /// Opens a session on the default database.
    pub fn open_session(&self) -> Result<Session, ClientError> {
        let database = self.inner.database.clone().ok_or_else(|| {
            ClientError::Validation(
                "store has no default database; use open_session_for(name)".into(),
            )
        })?;
        self.open_session_for(&database)
    }

    /// Opens a session on the named database.
    pub fn open_session_for(&self, database: &str) -> Result<Session, ClientError> {
        self.ensure_open()?;
        validate_database_name(database)?;
        let executor = self.request_executor(database);
        Ok(Session::new(
            database.to_string(),
            executor,
            self.inner.conventions.max_number_of_requests_per_session,
        ))
    }

    /// Executor for a database, created on first request and cached afterwards.
    pub fn request_executor(&self, database: &str) -> Arc<RequestExecutor> {
        self.inner
            .database_executors
            .entry(database.to_string())
            .or_insert_with(|| {
                debug!(database, "creating request executor");
                Arc::new(RequestExecutor::for_database(
                    self.inner.urls.clone(),
                    database,
                    self.inner.transport.clone(),
                    self.inner.conventions.clone(),
                ))
            })
            .clone()
    }

    /// Executor used for server-wide operations.
    pub fn server_executor(&self) -> Arc<RequestExecutor> {
        self.inner.server_executor.clone()
    }

    /// Drops cached executors; later sends and sessions fail with a config error.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            self.inner.database_executors.clear();
            debug!(urls = ?self.inner.urls, "document store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn ensure_open(&self) -> Result<(), ClientError> {
        if self.is_closed() {
            return Err(ClientError::Config("document store is closed".into()));
        }
        Ok(())
    }
}

/// Collects store configuration; nothing is validated until `initialize`.
#[derive(Default)]
pub struct DocumentStoreBuilder {
    urls: Vec<String>,
    database: Option<String>,
    conventions: DocumentConventions,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl DocumentStoreBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls.extend(urls.into_iter().map(Into::into));
        self
    }

    /// Sets the default database. An empty name means "no default".
    pub fn database(mut self, database: impl Into<String>) -> Self {
        let database = database.into();
        self.database = (!database.trim().is_empty()).then_some(database);
        self
    }

    pub fn conventions(mut self, conventions: DocumentConventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Replaces the reqwest transport, for proxies or in-memory test servers.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validates the configuration and returns a ready store.
    ///
    /// No request is sent here; topology is discovered on first use.
    pub fn initialize(self) -> Result<DocumentStore, ClientError> {
        if self.urls.is_empty() {
            return Err(ClientError::Config(
                "document store requires at least one url".into(),
            ));
        }
        let urls = self
            .urls
            .iter()
            .map(|url| normalize_url(url))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(database) = self.database.as_deref() {
            validate_database_name(database)?;
        }
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.conventions.request_timeout)?),
        };
        let server_executor = Arc::new(RequestExecutor::for_server(
            urls.clone(),
            transport.clone(),
            self.conventions.clone(),
        ));
        debug!(urls = ?urls, database = ?self.database, "document store initialized");

        Ok(DocumentStore {
            inner: Arc::new(StoreInner {
                urls,
                database: self.database,
                conventions: self.conventions,
                transport,
                server_executor,
                database_executors: DashMap::new(),
                closed: AtomicBool::new(false),
            }),
        })
    }
}

fn normalize_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ClientError::Config(format!("invalid url '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "url '{raw}' must use http or https"
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ClientError::Config(format!("url '{raw}' has no host")));
    }
    Ok(trimmed.to_string())
}
