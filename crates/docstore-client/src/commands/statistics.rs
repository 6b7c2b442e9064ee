use crate::errors::ClientError;
use crate::model::{DatabaseStatistics, ServerNode};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse};

use super::{RavenCommand, base_url, decode_json};

/// `GET {url}/databases/{db}/stats`, optionally tagged for server-side debugging.
#[derive(Clone, Debug, Default)]
pub struct GetStatisticsCommand {
    debug_tag: Option<String>,
}

impl GetStatisticsCommand {
    pub fn new(debug_tag: Option<String>) -> Self {
        Self { debug_tag }
    }
}

impl RavenCommand for GetStatisticsCommand {
    type Output = DatabaseStatistics;

    fn create_request(&self, node: &ServerNode) -> Result<HttpRequest, ClientError> {
        if node.database.is_empty() {
            return Err(ClientError::Validation(
                "get statistics requires a database".into(),
            ));
        }
        let mut url = format!("{}/databases/{}/stats", base_url(node), node.database);
        if let Some(tag) = self.debug_tag.as_deref().filter(|t| !t.is_empty()) {
            url.push('?');
            url.push_str(tag);
        }
        Ok(HttpRequest::new(HttpMethod::Get, url))
    }

    fn parse_response(&self, response: &HttpResponse) -> Result<DatabaseStatistics, ClientError> {
        decode_json("get statistics", response)
    }

    fn is_read_request(&self) -> bool {
        true
    }

    fn is_database_scoped(&self) -> bool {
        true
    }
}
