//! Award domain models.

use serde::{Deserialize, Serialize};

use crate::error::{CineError, CineResult};
use crate::graph::{Label, Node, NodeRef};

/// An award in a given year and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub id: String,
    pub name: String,
    pub year: i64,
    pub category: String,
}

/// Input for creating an award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAwardInput {
    pub name: String,
    pub year: i64,
    pub category: String,
}

impl CreateAwardInput {
    pub fn new(name: impl Into<String>, year: i64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year,
            category: category.into(),
        }
    }
}

/// Something that can win an award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum AwardWinner {
    Actor(String),
    Director(String),
    Movie(String),
}

impl AwardWinner {
    /// Classify a node as a winner; only actors, directors and movies qualify.
    pub fn from_node(node: &Node) -> CineResult<Self> {
        match node.label {
            Label::Actor => Ok(Self::Actor(node.id.clone())),
            Label::Director => Ok(Self::Director(node.id.clone())),
            Label::Movie => Ok(Self::Movie(node.id.clone())),
            other => Err(CineError::invalid_reference(format!(
                "{} {} cannot win an award",
                other, node.id
            ))),
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        match self {
            Self::Actor(id) => NodeRef::new(Label::Actor, id.as_str()),
            Self::Director(id) => NodeRef::new(Label::Director, id.as_str()),
            Self::Movie(id) => NodeRef::new(Label::Movie, id.as_str()),
        }
    }
}
