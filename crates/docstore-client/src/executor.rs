use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

use crate::commands::{GetClusterTopologyCommand, GetTopologyCommand, RavenCommand};
use crate::conventions::{DocumentConventions, ReadBalanceBehavior};
use crate::errors::{ClientError, error_from_status};
use crate::model::{ServerNode, ServerRole, Topology};
use crate::transport::HttpTransport;

/// Runs commands against the nodes of one database (or of the server).
///
/// A database executor discovers its topology on first use by asking each
/// configured URL in turn. A server executor talks to the configured URLs
/// until `update_topology` replaces them with the cluster's members.
pub struct RequestExecutor {
    database: Option<String>,
    initial_urls: Vec<String>,
    transport: Arc<dyn HttpTransport>,
    conventions: DocumentConventions,
    topology: RwLock<Option<Topology>>,
    first_topology_update: OnceCell<()>,
    cursor: AtomicUsize,
}

impl RequestExecutor {
    pub(crate) fn for_database(
        initial_urls: Vec<String>,
        database: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        conventions: DocumentConventions,
    ) -> Self {
        Self::new(initial_urls, Some(database.into()), transport, conventions)
    }

    pub(crate) fn for_server(
        initial_urls: Vec<String>,
        transport: Arc<dyn HttpTransport>,
        conventions: DocumentConventions,
    ) -> Self {
        Self::new(initial_urls, None, transport, conventions)
    }

    fn new(
        initial_urls: Vec<String>,
        database: Option<String>,
        transport: Arc<dyn HttpTransport>,
        conventions: DocumentConventions,
    ) -> Self {
        Self {
            database,
            initial_urls,
            transport,
            conventions,
            topology: RwLock::new(None),
            first_topology_update: OnceCell::new(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Database this executor is bound to, `None` for the server executor.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn conventions(&self) -> &DocumentConventions {
        &self.conventions
    }

    /// Snapshot of the last topology fetched, if any.
    pub async fn topology(&self) -> Option<Topology> {
        self.topology.read().await.clone()
    }

    pub async fn node_count(&self) -> usize {
        match self.topology.read().await.as_ref() {
            Some(topology) if !topology.nodes.is_empty() => topology.nodes.len(),
            _ => self.initial_urls.len(),
        }
    }

    /// Executes one command, failing over to the next node on transport errors.
    pub async fn execute<C: RavenCommand>(&self, command: &C) -> Result<C::Output, ClientError> {
        let nodes = self.nodes().await?;
        let order = self.node_order(nodes.len(), command.is_read_request());

        let mut failures = Vec::new();
        let mut last_error = None;
        for index in order {
            let node = &nodes[index];
            match self.send_to_node(node, command).await {
                Ok(output) => return Ok(output),
                Err(err) if err.should_fail_over() => {
                    warn!(node = %node, error = %err, "node failed, trying next node");
                    failures.push(format!("{node}: {err}"));
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(collapse_failures(failures, last_error))
    }

    /// Fetches a fresh topology and installs it unless a newer one is already known.
    ///
    /// Database executors ask `GET /topology`; the server executor derives its
    /// nodes from `GET /cluster/topology`.
    pub async fn update_topology(&self) -> Result<Topology, ClientError> {
        let fetched = match self.database.as_deref() {
            Some(database) => self.fetch_database_topology(database).await?,
            None => self.fetch_cluster_nodes().await?,
        };

        let mut guard = self.topology.write().await;
        let keep_current = guard
            .as_ref()
            .is_some_and(|current| current.etag > fetched.etag);
        if keep_current {
            debug!(etag = fetched.etag, "ignoring stale topology");
        } else {
            debug!(
                database = self.database.as_deref().unwrap_or("<server>"),
                etag = fetched.etag,
                nodes = fetched.nodes.len(),
                "topology updated"
            );
            *guard = Some(fetched);
        }
        Ok((*guard).clone().unwrap_or_default())
    }

    async fn nodes(&self) -> Result<Vec<ServerNode>, ClientError> {
        if self.database.is_some() {
            self.first_topology_update
                .get_or_try_init(|| async { self.update_topology().await.map(|_| ()) })
                .await?;
        }
        let database = self.database.clone().unwrap_or_default();
        let guard = self.topology.read().await;
        match guard.as_ref() {
            Some(topology) if !topology.nodes.is_empty() => Ok(topology.nodes.clone()),
            _ => Ok(self
                .initial_urls
                .iter()
                .map(|url| ServerNode::new(url.clone(), database.clone()))
                .collect()),
        }
    }

    fn node_order(&self, len: usize, is_read: bool) -> Vec<usize> {
        let start = match self.conventions.read_balance_behavior {
            ReadBalanceBehavior::RoundRobin if is_read && len > 0 => {
                self.cursor.fetch_add(1, Ordering::Relaxed) % len
            }
            _ => 0,
        };
        (0..len).map(|i| (start + i) % len).collect()
    }

    async fn fetch_database_topology(&self, database: &str) -> Result<Topology, ClientError> {
        let command = GetTopologyCommand::new();
        let mut failures = Vec::new();
        let mut last_error = None;
        for url in &self.initial_urls {
            let node = ServerNode::new(url.clone(), database);
            match self.send_to_node(&node, &command).await {
                Ok(topology) => return Ok(topology),
                Err(err) if err.should_fail_over() => {
                    warn!(url = %url, error = %err, "topology fetch failed, trying next url");
                    failures.push(format!("{url}: {err}"));
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(collapse_failures(failures, last_error))
    }

    async fn fetch_cluster_nodes(&self) -> Result<Topology, ClientError> {
        let command = GetClusterTopologyCommand::new();
        let mut failures = Vec::new();
        let mut last_error = None;
        for url in &self.initial_urls {
            let node = ServerNode::new(url.clone(), "");
            match self.send_to_node(&node, &command).await {
                Ok(response) => {
                    let nodes = response
                        .topology
                        .members
                        .iter()
                        .map(|(tag, url)| ServerNode {
                            url: url.clone(),
                            database: String::new(),
                            cluster_tag: Some(tag.clone()),
                            server_role: ServerRole::Member,
                        })
                        .collect();
                    let etag = self
                        .topology
                        .read()
                        .await
                        .as_ref()
                        .map_or(0, |t| t.etag);
                    return Ok(Topology { etag, nodes });
                }
                Err(err) if err.should_fail_over() => {
                    failures.push(format!("{url}: {err}"));
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(collapse_failures(failures, last_error))
    }

    async fn send_to_node<C: RavenCommand>(
        &self,
        node: &ServerNode,
        command: &C,
    ) -> Result<C::Output, ClientError> {
        let request = command.create_request(node)?;
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return command.parse_response(&response);
        }
        let database = if command.is_database_scoped() && !node.database.is_empty() {
            Some(node.database.as_str())
        } else {
            None
        };
        debug!(url = %url, status = response.status, "request failed");
        Err(error_from_status(
            response.status,
            &url,
            &response.body,
            database,
        ))
    }
}

fn collapse_failures(failures: Vec<String>, last_error: Option<ClientError>) -> ClientError {
    match (failures.len(), last_error) {
        (1, Some(err)) => err,
        (0, _) => ClientError::Config("no nodes to send the request to".into()),
        _ => ClientError::AllNodesFailed { failures },
    }
}
