use std::time::Duration;

/// How a request executor picks a node for read requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReadBalanceBehavior {
    /// Always start with the first node of the topology.
    #[default]
    None,
    /// Rotate read requests across the topology. Writes still go to the first node.
    RoundRobin,
}

/// Client-side tunables shared by every executor and session of a store.
#[derive(Clone, Debug)]
pub struct DocumentConventions {
    /// Requests a single session may issue before it refuses more.
    pub max_number_of_requests_per_session: usize,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Node selection for read requests.
    pub read_balance_behavior: ReadBalanceBehavior,
    /// Replication factor used by `CreateDatabaseOperation` unless overridden.
    pub default_replication_factor: u32,
}

impl Default for DocumentConventions {
    fn default() -> Self {
        Self {
            max_number_of_requests_per_session: 30,
            request_timeout: Duration::from_secs(30),
            read_balance_behavior: ReadBalanceBehavior::None,
            default_replication_factor: 1,
        }
    }
}

impl DocumentConventions {
    pub fn max_number_of_requests_per_session(mut self, limit: usize) -> Self {
        self.max_number_of_requests_per_session = limit;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn read_balance_behavior(mut self, behavior: ReadBalanceBehavior) -> Self {
        self.read_balance_behavior = behavior;
        self
    }

    pub fn default_replication_factor(mut self, factor: u32) -> Self {
        self.default_replication_factor = factor;
        self
    }
}
