use crate::errors::ClientError;
use crate::model::{ClusterTopologyResponse, ServerNode, Topology};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse};

use super::{RavenCommand, base_url, decode_json};

/// `GET {url}/topology?name={db}`: nodes serving the node's database.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetTopologyCommand;

impl GetTopologyCommand {
    pub fn new() -> Self {
        Self
    }
}

impl RavenCommand for GetTopologyCommand {
    type Output = Topology;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError> {
        if node.database.is_empty() {
            return Err(ClientError::Validation(
                "get topology requires a database-bound node".into(),
            ));
        }
        Ok(HttpRequest::new(
            HttpMethod::Get,
            format!("{}/topology?name={}", base_url(node), node.database),
        ))
    }

    fn parse_response(&self, response: &HttpResponse) -> Result<Topology, ClientError> {
        decode_json("get topology", response)
    }

    fn is_read_request(&self) -> bool {
        true
    }

    fn is_database_scoped(&self) -> bool {
        true
    }
}

/// `GET {url}/cluster/topology`: cluster membership and leader.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetClusterTopologyCommand;

impl GetClusterTopologyCommand {
    pub fn new() -> Self {
        Self
    }
}

impl RavenCommand for GetClusterTopologyCommand {
    type Output = ClusterTopologyResponse;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest::new(
            HttpMethod::Get,
            format!("{}/cluster/topology", base_url(node)),
        ))
    }

    fn parse_response(
        &self,
        response: &HttpResponse,
    ) -> Result<ClusterTopologyResponse, ClientError> {
        decode_json("get cluster topology", response)
    }

    fn is_read_request(&self) -> bool {
        true
    }
}
