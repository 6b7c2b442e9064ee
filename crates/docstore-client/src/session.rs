use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::commands::RavenCommand;
use crate::errors::ClientError;
use crate::executor::RequestExecutor;

/// Scoped unit of work bound to one database.
///
/// Sessions only carry requests here; they do not track documents. The
/// session is released when dropped.
pub struct Session {
    id: uuid::Uuid,
    database: String,
    executor: Arc<RequestExecutor>,
    requests: AtomicUsize,
    max_requests: usize,
}

impl Session {
    pub(crate) fn new(database: String, executor: Arc<RequestExecutor>, max_requests: usize) -> Self {
        let id = uuid::Uuid::new_v4();
        debug!(session_id = %id, database = %database, "session opened");
        Self {
            id,
            database,
            executor,
            requests: AtomicUsize::new(0),
            max_requests,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// The executor this session sends through.
    pub fn requests_executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn number_of_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Executes a command, counting it against the session's request budget.
    pub async fn execute<C: RavenCommand>(&self, command: &C) -> Result<C::Output, ClientError> {
        let used = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        if used > self.max_requests {
            self.requests.fetch_sub(1, Ordering::SeqCst);
            return Err(ClientError::TooManyRequests {
                limit: self.max_requests,
            });
        }
        self.executor.execute(command).await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            session_id = %self.id,
            database = %self.database,
            requests = self.number_of_requests(),
            "session released"
        );
    }
}
