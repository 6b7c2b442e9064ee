use crate::commands::GetStatisticsCommand;
use crate::conventions::DocumentConventions;
use crate::errors::ClientError;

use super::MaintenanceOperation;

/// Fetches statistics of the channel's database.
#[derive(Clone, Debug, Default)]
pub struct GetStatisticsOperation {
    debug_tag: Option<String>,
}

impl GetStatisticsOperation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query-string tag that shows up in server request logs.
    pub fn with_debug_tag(debug_tag: impl Into<String>) -> Self {
        Self {
            debug_tag: Some(debug_tag.into()),
        }
    }
}

impl MaintenanceOperation for GetStatisticsOperation {
    type Command = GetStatisticsCommand;

    fn command(&self, _conventions: &DocumentConventions) -> Result<Self::Command, ClientError> {
        Ok(GetStatisticsCommand::new(self.debug_tag.clone()))
    }
}
