use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

const MAX_DATABASE_NAME_LEN: usize = 128;

/// Validates a database name before it is placed into a URL.
pub fn validate_database_name(name: &str) -> Result<(), ClientError> {
    if name.is_empty() {
        return Err(ClientError::Validation(
            "database name must not be empty".into(),
        ));
    }
    if name.len() > MAX_DATABASE_NAME_LEN {
        return Err(ClientError::Validation(format!(
            "database name '{name}' is longer than {MAX_DATABASE_NAME_LEN} characters"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(ClientError::Validation(format!(
            "database name '{name}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Role a node plays for a database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerRole {
    #[default]
    None,
    Promotable,
    Member,
    Rehab,
}

/// One server that can serve requests for a database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerNode {
    pub url: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub cluster_tag: Option<String>,
    #[serde(default)]
    pub server_role: ServerRole,
}

impl ServerNode {
    /// Creates a node with no cluster tag, typically from a configured URL.
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            cluster_tag: None,
            server_role: ServerRole::None,
        }
    }
}

impl fmt::Display for ServerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cluster_tag {
            Some(tag) => write!(f, "{} ({tag})", self.url),
            None => f.write_str(&self.url),
        }
    }
}

/// Database topology as reported by `GET /topology?name={db}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Topology {
    #[serde(default)]
    pub etag: i64,
    #[serde(default)]
    pub nodes: Vec<ServerNode>,
}

/// Cluster membership, keyed by node tag (for example `A`) to node URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterTopology {
    #[serde(rename = "LastNodeId", default)]
    pub last_node_id: String,
    #[serde(rename = "TopologyId", default)]
    pub topology_id: String,
    #[serde(default)]
    pub members: BTreeMap<String, String>,
    #[serde(default)]
    pub promotables: BTreeMap<String, String>,
    #[serde(default)]
    pub watchers: BTreeMap<String, String>,
}

impl ClusterTopology {
    /// Returns members, promotables and watchers merged into one map.
    pub fn all_nodes(&self) -> BTreeMap<String, String> {
        self.members
            .iter()
            .chain(&self.promotables)
            .chain(&self.watchers)
            .map(|(tag, url)| (tag.clone(), url.clone()))
            .collect()
    }
}

/// Response of `GET /cluster/topology`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterTopologyResponse {
    #[serde(default)]
    pub topology: ClusterTopology,
    #[serde(default)]
    pub leader: String,
    #[serde(default)]
    pub node_tag: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SizeOnDisk {
    #[serde(default)]
    pub humane_size: String,
    #[serde(default)]
    pub size_in_bytes: i64,
}

/// Database statistics returned by `GET /databases/{db}/stats`.
///
/// Only the counters are typed; per-index details stay raw JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseStatistics {
    #[serde(default)]
    pub last_doc_etag: i64,
    #[serde(default)]
    pub count_of_indexes: i64,
    #[serde(default)]
    pub count_of_documents: i64,
    #[serde(default)]
    pub count_of_revision_documents: i64,
    #[serde(default)]
    pub count_of_documents_conflicts: i64,
    #[serde(default)]
    pub count_of_tombstones: i64,
    #[serde(default)]
    pub count_of_conflicts: i64,
    #[serde(default)]
    pub count_of_attachments: i64,
    #[serde(default)]
    pub count_of_unique_attachments: i64,
    #[serde(default)]
    pub indexes: Vec<serde_json::Value>,
    #[serde(default)]
    pub database_change_vector: Option<String>,
    #[serde(rename = "DatabaseId", default)]
    pub database_id: String,
    #[serde(rename = "Is64Bit", default)]
    pub is_64_bit: bool,
    #[serde(default)]
    pub pager: Option<String>,
    #[serde(default)]
    pub last_indexing_time: Option<String>,
    #[serde(default)]
    pub size_on_disk: SizeOnDisk,
    #[serde(default)]
    pub number_of_transaction_merger_queue_operations: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeaderStamp {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub term: i64,
    #[serde(default)]
    pub leaders_ticks: i64,
}

/// Placement of a database across cluster nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseTopology {
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub promotables: Vec<String>,
    #[serde(default)]
    pub rehabs: Vec<String>,
    #[serde(default)]
    pub replication_factor: u32,
    #[serde(default)]
    pub dynamic_nodes_distribution: bool,
    #[serde(default)]
    pub stamp: Option<LeaderStamp>,
}

/// Acknowledgment of a create-database request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabasePutResult {
    #[serde(default)]
    pub raft_command_index: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topology: DatabaseTopology,
    #[serde(default)]
    pub nodes_added_to: Vec<String>,
}

/// Acknowledgment of a delete-database request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteDatabaseResult {
    #[serde(default)]
    pub raft_command_index: i64,
    #[serde(default)]
    pub pending_deletes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_names_are_validated() {
        assert!(validate_database_name("PyRavenDB").is_ok());
        assert!(validate_database_name("orders_2024.v-1").is_ok());
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name("bad/name").is_err());
        assert!(validate_database_name(&"x".repeat(129)).is_err());
    }

    #[test]
    fn cluster_topology_decodes_sample_response() {
        let raw = r#"{"Topology":{"TopologyId":"8bf47de1","AllNodes":{"A":"http://localhost:9999"},"Members":{"A":"http://localhost:9999"},"Promotables":{},"Watchers":{"C":"http://localhost:9997"},"LastNodeId":"A"},"Leader":"A","CurrentState":"Leader","NodeTag":"A","CurrentTerm":4}"#;
        let response: ClusterTopologyResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.leader, "A");
        assert_eq!(response.topology.topology_id, "8bf47de1");
        let all = response.topology.all_nodes();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("C").map(String::as_str), Some("http://localhost:9997"));
    }

    #[test]
    fn statistics_tolerate_missing_fields() {
        let raw = r#"{"CountOfDocuments":12,"DatabaseId":"abc","Is64Bit":true,"SizeOnDisk":{"HumaneSize":"1 MBytes","SizeInBytes":1048576}}"#;
        let stats: DatabaseStatistics = serde_json::from_str(raw).expect("decode");
        assert_eq!(stats.count_of_documents, 12);
        assert!(stats.is_64_bit);
        assert_eq!(stats.size_on_disk.size_in_bytes, 1_048_576);
        assert_eq!(stats.count_of_indexes, 0);
    }

    #[test]
    fn server_node_display_includes_tag() {
        let mut node = ServerNode::new("http://localhost:9999", "db");
        assert_eq!(node.to_string(), "http://localhost:9999");
        node.cluster_tag = Some("A".into());
        assert_eq!(node.to_string(), "http://localhost:9999 (A)");
    }
}
