use serde::Deserialize;

use crate::errors::ClientError;
use crate::model::{DatabasePutResult, DeleteDatabaseResult, ServerNode};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse};

use super::{RavenCommand, base_url, decode_json};

#[derive(Deserialize)]
struct DatabaseNamesResponse {
    #[serde(rename = "Databases", default)]
    databases: Vec<String>,
}

/// `GET {url}/databases?start=..&pageSize=..&namesOnly=true`.
#[derive(Clone, Debug)]
pub struct GetDatabaseNamesCommand {
    start: u32,
    page_size: u32,
}

impl GetDatabaseNamesCommand {
    pub fn new(start: u32, page_size: u32) -> Self {
        Self { start, page_size }
    }
}

impl RavenCommand for GetDatabaseNamesCommand {
    type Output = Vec<String>;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest::new(
            HttpMethod::Get,
            format!(
                "{}/databases?start={}&pageSize={}&namesOnly=true",
                base_url(node),
                self.start,
                self.page_size
            ),
        ))
    }

    fn parse_response(&self, response: &HttpResponse) -> Result<Vec<String>, ClientError> {
        let decoded: DatabaseNamesResponse = decode_json("get database names", response)?;
        Ok(decoded.databases)
    }

    fn is_read_request(&self) -> bool {
        true
    }
}

/// `PUT {url}/admin/databases?name=..&replication-factor=..` with a database record body.
#[derive(Clone, Debug)]
pub struct CreateDatabaseCommand {
    name: String,
    replication_factor: u32,
}

impl CreateDatabaseCommand {
    /// A replication factor below 1 is raised to 1.
    pub fn new(name: impl Into<String>, replication_factor: u32) -> Self {
        Self {
            name: name.into(),
            replication_factor: replication_factor.max(1),
        }
    }

    pub(crate) fn record(&self) -> serde_json::Value {
        serde_json::json!({
            "DatabaseName": self.name,
            "Disabled": false,
            "Encrypted": false,
            "Settings": {},
        })
    }
}

impl RavenCommand for CreateDatabaseCommand {
    type Output = DatabasePutResult;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest::new(
            HttpMethod::Put,
            format!(
                "{}/admin/databases?name={}&replication-factor={}",
                base_url(node),
                self.name,
                self.replication_factor
            ),
        )
        .json(self.record()))
    }

    fn parse_response(&self, response: &HttpResponse) -> Result<DatabasePutResult, ClientError> {
        decode_json("create database", response)
    }
}

/// `DELETE {url}/admin/databases` with the names to delete in the body.
#[derive(Clone, Debug)]
pub struct DeleteDatabaseCommand {
    name: String,
    hard_delete: bool,
    from_node: Option<String>,
}

impl DeleteDatabaseCommand {
    pub fn new(name: impl Into<String>, hard_delete: bool, from_node: Option<String>) -> Self {
        Self {
            name: name.into(),
            hard_delete,
            from_node,
        }
    }

    pub(crate) fn parameters(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "DatabaseNames": [self.name],
            "HardDelete": self.hard_delete,
        });
        if let Some(node) = self.from_node.as_deref().filter(|n| !n.is_empty()) {
            body["FromNodes"] = serde_json::json!([node]);
        }
        body
    }
}

impl RavenCommand for DeleteDatabaseCommand {
    type Output = DeleteDatabaseResult;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError> {
        Ok(
            HttpRequest::new(HttpMethod::Delete, format!("{}/admin/databases", base_url(node)))
                .json(self.parameters()),
        )
    }

    fn parse_response(
        &self,
        response: &HttpResponse,
    ) -> Result<DeleteDatabaseResult, ClientError> {
        decode_json("delete database", response)
    }
}
