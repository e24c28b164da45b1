//! Node and edge vocabulary of the film graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CineError, CineResult};

/// Property map of a node. Values are JSON scalars.
pub type Properties = Map<String, Value>;

/// Node labels of the film graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Actor,
    Director,
    Movie,
    Genre,
    Award,
}

impl Label {
    pub const ALL: [Label; 5] = [
        Label::Actor,
        Label::Director,
        Label::Movie,
        Label::Genre,
        Label::Award,
    ];

    /// The label as it appears in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Actor => "Actor",
            Label::Director => "Director",
            Label::Movie => "Movie",
            Label::Genre => "Genre",
            Label::Award => "Award",
        }
    }

    /// Properties every node of this label must carry.
    pub fn required_properties(&self) -> &'static [&'static str] {
        match self {
            Label::Actor | Label::Director => &["id", "name", "birthdate"],
            Label::Movie => &[
                "id",
                "title",
                "released",
                "rating",
                "budget",
                "boxOffice",
                "description",
            ],
            Label::Genre => &["id", "name"],
            Label::Award => &["id", "name", "year", "category"],
        }
    }

    /// The property used as the display name (`title` for movies).
    pub fn name_property(&self) -> &'static str {
        match self {
            Label::Movie => "title",
            _ => "name",
        }
    }

    /// Check a property map against the required properties of this label.
    pub fn validate(&self, properties: &Properties) -> CineResult<()> {
        for key in self.required_properties() {
            match properties.get(*key) {
                None | Some(Value::Null) => {
                    return Err(CineError::validation(format!(
                        "{} is missing required property '{}'",
                        self, key
                    )));
                }
                Some(Value::Array(_)) | Some(Value::Object(_)) => {
                    return Err(CineError::validation(format!(
                        "{}.{} must be a scalar value",
                        self, key
                    )));
                }
                Some(_) => {}
            }
        }
        match properties.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(()),
            _ => Err(CineError::validation(format!("{}.id must be a non-empty string", self))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = CineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CineError::invalid_reference(format!("unknown label '{}'", s)))
    }
}

/// Directed relationship types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    ActedIn,
    Directed,
    HasGenre,
    WonAward,
}

impl Relation {
    /// The relationship type as it appears in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::ActedIn => "ACTED_IN",
            Relation::Directed => "DIRECTED",
            Relation::HasGenre => "HAS_GENRE",
            Relation::WonAward => "WON_AWARD",
        }
    }

    /// Labels allowed at the source end.
    pub fn sources(&self) -> &'static [Label] {
        match self {
            Relation::ActedIn => &[Label::Actor],
            Relation::Directed => &[Label::Director],
            Relation::HasGenre => &[Label::Movie],
            Relation::WonAward => &[Label::Actor, Label::Director, Label::Movie],
        }
    }

    /// The label at the target end.
    pub fn target(&self) -> Label {
        match self {
            Relation::ActedIn | Relation::Directed => Label::Movie,
            Relation::HasGenre => Label::Genre,
            Relation::WonAward => Label::Award,
        }
    }

    /// Reject endpoint labels this relation cannot connect.
    pub fn check_endpoints(&self, from: Label, to: Label) -> CineResult<()> {
        if self.sources().contains(&from) && self.target() == to {
            Ok(())
        } else {
            Err(CineError::invalid_reference(format!(
                "{} cannot connect {} to {}",
                self, from, to
            )))
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traversal direction relative to the anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// Identity of a node: its label plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub label: Label,
    pub id: String,
}

impl NodeRef {
    pub fn new(label: Label, id: impl Into<String>) -> Self {
        Self { label, id: id.into() }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label, self.id)
    }
}

/// A labeled node with its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub label: Label,
    pub id: String,
    pub properties: Properties,
}

impl Node {
    /// Build a node from a property map, taking the id from the `id` property.
    pub fn from_properties(label: Label, properties: Properties) -> CineResult<Self> {
        let id = properties
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CineError::validation(format!("{} node has no string id", label)))?;
        Ok(Self { label, id, properties })
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.label, self.id.clone())
    }

    pub fn str_prop(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn i64_prop(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(Value::as_i64)
    }

    pub fn f64_prop(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Display name: `title` for movies, `name` for everything else.
    pub fn display_name(&self) -> &str {
        self.str_prop(self.label.name_property()).unwrap_or_default()
    }

    /// Render a scalar property as text, the way string concatenation would.
    pub fn prop_text(&self, key: &str) -> String {
        match self.properties.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
