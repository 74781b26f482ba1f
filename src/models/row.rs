// file: src/models/row.rs
// description: one exported organization record

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgRow {
    pub name: String,
    /// Empty when no address was found.
    pub email: String,
    /// `Some` only when the description column is enabled.
    pub description: Option<String>,
}

impl OrgRow {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}
