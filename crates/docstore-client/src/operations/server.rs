use crate::commands::{CreateDatabaseCommand, DeleteDatabaseCommand, GetDatabaseNamesCommand};
use crate::conventions::DocumentConventions;
use crate::errors::ClientError;
use crate::model::validate_database_name;

use super::ServerOperation;

/// Lists database names, one page at a time.
#[derive(Clone, Debug)]
pub struct GetDatabaseNamesOperation {
    start: u32,
    page_size: u32,
}

impl GetDatabaseNamesOperation {
    pub fn new(start: u32, page_size: u32) -> Self {
        Self { start, page_size }
    }
}

impl ServerOperation for GetDatabaseNamesOperation {
    type Command = GetDatabaseNamesCommand;

    fn command(&self, _conventions: &DocumentConventions) -> Result<Self::Command, ClientError> {
        if self.page_size == 0 {
            return Err(ClientError::Validation(
                "page size must be greater than 0".into(),
            ));
        }
        Ok(GetDatabaseNamesCommand::new(self.start, self.page_size))
    }
}

/// Creates a database with a default record.
#[derive(Clone, Debug)]
pub struct CreateDatabaseOperation {
    name: String,
    replication_factor: Option<u32>,
}

impl CreateDatabaseOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replication_factor: None,
        }
    }

    /// Overrides `DocumentConventions::default_replication_factor`.
    pub fn replication_factor(mut self, factor: u32) -> Self {
        self.replication_factor = Some(factor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ServerOperation for CreateDatabaseOperation {
    type Command = CreateDatabaseCommand;

    fn command(&self, conventions: &DocumentConventions) -> Result<Self::Command, ClientError> {
        validate_database_name(&self.name)?;
        let factor = self
            .replication_factor
            .unwrap_or(conventions.default_replication_factor);
        Ok(CreateDatabaseCommand::new(self.name.clone(), factor))
    }
}

/// Deletes a database. A soft delete (`hard_delete = false`) keeps the data files on disk.
#[derive(Clone, Debug)]
pub struct DeleteDatabaseOperation {
    name: String,
    hard_delete: bool,
    from_node: Option<String>,
}

impl DeleteDatabaseOperation {
    pub fn new(name: impl Into<String>, hard_delete: bool) -> Self {
        Self {
            name: name.into(),
            hard_delete,
            from_node: None,
        }
    }

    /// Restricts the delete to the node with the given cluster tag.
    pub fn from_node(mut self, tag: impl Into<String>) -> Self {
        self.from_node = Some(tag.into());
        self
    }
}

impl ServerOperation for DeleteDatabaseOperation {
    type Command = DeleteDatabaseCommand;

    fn command(&self, _conventions: &DocumentConventions) -> Result<Self::Command, ClientError> {
        validate_database_name(&self.name)?;
        Ok(DeleteDatabaseCommand::new(
            self.name.clone(),
            self.hard_delete,
            self.from_node.clone(),
        ))
    }
}
