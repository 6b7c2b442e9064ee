//! In-memory stand-in for a document server, used by unit tests.
//!
//! Implements `HttpTransport` and answers the handful of endpoints the client
//! knows about, with the same status codes and error payloads a real server
//! sends.
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::errors::ClientError;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[derive(Default)]
struct State {
    primary_url: String,
    serving: HashSet<String>,
    unreachable: HashSet<String>,
    databases: BTreeMap<String, i64>,
    deletes: Vec<(String, bool)>,
    topology_etag: i64,
    raft_index: i64,
    requests: Vec<HttpRequest>,
}

#[derive(Clone)]
pub(crate) struct FakeServer {
    state: Arc<Mutex<State>>,
}

impl FakeServer {
    pub(crate) fn new(url: &str) -> Self {
        let state = State {
            primary_url: url.to_string(),
            serving: HashSet::from([url.to_string()]),
            topology_etag: 1,
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub(crate) fn with_database(self, name: &str) -> Self {
        self.lock().databases.insert(name.to_string(), 0);
        self
    }

    pub(crate) fn with_documents(self, name: &str, count: i64) -> Self {
        self.lock().databases.insert(name.to_string(), count);
        self
    }

    pub(crate) fn also_serving(self, url: &str) -> Self {
        self.lock().serving.insert(url.to_string());
        self
    }

    pub(crate) fn unreachable(self, url: &str) -> Self {
        self.lock().unreachable.insert(url.to_string());
        self
    }

    pub(crate) fn set_topology_etag(&self, etag: i64) {
        self.lock().topology_etag = etag;
    }

    pub(crate) fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::new(self.clone())
    }

    pub(crate) fn has_database(&self, name: &str) -> bool {
        self.lock().databases.contains_key(name)
    }

    /// Hard-delete flag of the last delete of `name`, if it was deleted.
    pub(crate) fn deleted_with(&self, name: &str) -> Option<bool> {
        self.lock()
            .deletes
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, hard)| *hard)
    }

    pub(crate) fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub(crate) fn requests_matching(&self, fragment: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.url.contains(fragment))
            .count()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake server state poisoned")
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let (base, path, query) = split_url(&request.url);
        if state.unreachable.contains(base) {
            return Err(ClientError::transport(&request.url, "connection refused"));
        }
        if !state.serving.contains(base) {
            return Err(ClientError::transport(&request.url, "unknown host"));
        }

        let response = match (request.method, path) {
            (HttpMethod::Get, "/databases") => list_databases(&state, &query),
            (HttpMethod::Get, "/cluster/topology") => cluster_topology(&state),
            (HttpMethod::Get, "/topology") => database_topology(&state, &query),
            (HttpMethod::Get, p) if p.starts_with("/databases/") && p.ends_with("/stats") => {
                let name = &p["/databases/".len()..p.len() - "/stats".len()];
                statistics(&state, name)
            }
            (HttpMethod::Put, "/admin/databases") => create_database(&mut state, &query, &request),
            (HttpMethod::Delete, "/admin/databases") => delete_databases(&mut state, &request),
            _ => HttpResponse::new(404, ""),
        };
        Ok(response)
    }
}

fn split_url(url: &str) -> (&str, &str, BTreeMap<String, String>) {
    let scheme_end = url.find("://").map_or(0, |i| i + 3);
    let path_start = url[scheme_end..]
        .find('/')
        .map_or(url.len(), |i| scheme_end + i);
    let base = &url[..path_start];
    let rest = &url[path_start..];
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    let params = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (k, v) = p.split_once('=').unwrap_or((p, ""));
            (k.to_string(), v.to_string())
        })
        .collect();
    (base, path, params)
}

fn database_missing(name: &str) -> HttpResponse {
    HttpResponse::new(
        503,
        json!({
            "Type": "Raven.Client.Exceptions.Database.DatabaseDoesNotExistException",
            "Message": format!("Database '{name}' was not found"),
        })
        .to_string(),
    )
}

fn list_databases(state: &State, query: &BTreeMap<String, String>) -> HttpResponse {
    let start: usize = query.get("start").and_then(|v| v.parse().ok()).unwrap_or(0);
    let page_size: usize = query
        .get("pageSize")
        .and_then(|v| v.parse().ok())
        .unwrap_or(usize::MAX);
    let names: Vec<&String> = state.databases.keys().skip(start).take(page_size).collect();
    HttpResponse::new(200, json!({ "Databases": names }).to_string())
}

fn cluster_topology(state: &State) -> HttpResponse {
    HttpResponse::new(
        200,
        json!({
            "Topology": {
                "TopologyId": "fake-cluster",
                "LastNodeId": "A",
                "Members": { "A": state.primary_url },
                "Promotables": {},
                "Watchers": {},
            },
            "Leader": "A",
            "NodeTag": "A",
        })
        .to_string(),
    )
}

fn database_topology(state: &State, query: &BTreeMap<String, String>) -> HttpResponse {
    let name = query.get("name").cloned().unwrap_or_default();
    if !state.databases.contains_key(&name) {
        return HttpResponse::new(404, "");
    }
    HttpResponse::new(
        200,
        json!({
            "Etag": state.topology_etag,
            "Nodes": [{
                "Url": state.primary_url,
                "ClusterTag": "A",
                "Database": name,
                "ServerRole": "Member",
            }],
        })
        .to_string(),
    )
}

fn statistics(state: &State, name: &str) -> HttpResponse {
    match state.databases.get(name) {
        Some(count) => HttpResponse::new(
            200,
            json!({
                "CountOfDocuments": count,
                "CountOfIndexes": 0,
                "DatabaseId": format!("{name}-id"),
                "Is64Bit": true,
                "SizeOnDisk": { "HumaneSize": "64 KBytes", "SizeInBytes": 65536 },
            })
            .to_string(),
        ),
        None => database_missing(name),
    }
}

fn create_database(
    state: &mut State,
    query: &BTreeMap<String, String>,
    request: &HttpRequest,
) -> HttpResponse {
    let name = query.get("name").cloned().unwrap_or_default();
    let record_name = request
        .body
        .as_ref()
        .and_then(|b| b.get("DatabaseName"))
        .and_then(|v| v.as_str());
    if name.is_empty() || record_name != Some(name.as_str()) {
        return HttpResponse::new(
            400,
            json!({
                "Type": "System.ArgumentException",
                "Message": "Name does not match the database record",
            })
            .to_string(),
        );
    }
    if state.databases.contains_key(&name) {
        return HttpResponse::new(
            409,
            json!({
                "Url": "/admin/databases",
                "Type": "Raven.Client.Exceptions.ConcurrencyException",
                "Message": format!("Database '{name}' already exists!"),
            })
            .to_string(),
        );
    }
    let factor: u32 = query
        .get("replication-factor")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    state.databases.insert(name.clone(), 0);
    state.raft_index += 1;
    HttpResponse::new(
        201,
        json!({
            "RaftCommandIndex": state.raft_index,
            "Name": name,
            "Topology": { "Members": ["A"], "ReplicationFactor": factor },
            "NodesAddedTo": [state.primary_url],
        })
        .to_string(),
    )
}

fn delete_databases(state: &mut State, request: &HttpRequest) -> HttpResponse {
    let Some(body) = request.body.as_ref() else {
        return HttpResponse::new(400, json!({ "Message": "missing body" }).to_string());
    };
    let hard = body
        .get("HardDelete")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let names: Vec<String> = body
        .get("DatabaseNames")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default();
    if let Some(missing) = names.iter().find(|n| !state.databases.contains_key(*n)) {
        return database_missing(missing);
    }
    for name in names {
        state.databases.remove(&name);
        state.deletes.push((name, hard));
    }
    state.raft_index += 1;
    HttpResponse::new(
        200,
        json!({ "RaftCommandIndex": state.raft_index, "PendingDeletes": [] }).to_string(),
    )
}
