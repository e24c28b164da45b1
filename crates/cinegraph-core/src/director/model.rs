//! Director domain models.

use serde::{Deserialize, Serialize};

/// A director with the titles they directed and the awards they won.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    pub movies: Vec<String>,
    pub awards: Vec<String>,
}

/// Input for creating a director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectorInput {
    pub name: String,
    pub birthdate: String,
    #[serde(default)]
    pub award_ids: Vec<String>,
}

impl CreateDirectorInput {
    pub fn new(name: impl Into<String>, birthdate: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birthdate: birthdate.into(),
            award_ids: Vec::new(),
        }
    }

    pub fn with_award(mut self, award_id: impl Into<String>) -> Self {
        self.award_ids.push(award_id.into());
        self
    }
}
