//! Uniqueness constraints: declaration, installation and checking.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{CineError, CineResult};
use crate::graph::{GraphStore, Label, Properties};

/// A uniqueness rule on one property of one label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub label: Label,
    pub property: String,
}

impl UniqueConstraint {
    pub fn new(label: Label, property: impl Into<String>) -> Self {
        Self {
            label,
            property: property.into(),
        }
    }

    /// Store-side name of the constraint, e.g. `Actor_id_unique`.
    pub fn name(&self) -> String {
        format!("{}_{}_unique", self.label, self.property)
    }
}

/// Explicit declaration of the constraints a deployment requires.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    constraints: Vec<UniqueConstraint>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a uniqueness rule. Duplicate declarations are ignored.
    pub fn with_unique(mut self, label: Label, property: &str) -> Self {
        let constraint = UniqueConstraint::new(label, property);
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
        self
    }

    /// The film graph schema: ids unique per label, genres unique by name.
    pub fn cinema() -> Self {
        Self::new()
            .with_unique(Label::Actor, "id")
            .with_unique(Label::Director, "id")
            .with_unique(Label::Movie, "id")
            .with_unique(Label::Award, "id")
            .with_unique(Label::Genre, "name")
    }

    pub fn constraints(&self) -> &[UniqueConstraint] {
        &self.constraints
    }
}

/// Outcome of a schema installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub installed: usize,
    pub existing: usize,
}

/// Install every constraint of `schema` into `store`.
///
/// Safe to run multiple times and from several processes at once: each rule
/// goes through the store's own create-if-absent primitive.
pub async fn install_schema(store: &dyn GraphStore, schema: &Schema) -> CineResult<SchemaReport> {
    info!("Installing graph schema...");

    let mut report = SchemaReport::default();
    for constraint in schema.constraints() {
        if store.ensure_unique_constraint(constraint).await? {
            info!(label = %constraint.label, property = %constraint.property, "Constraint created");
            report.installed += 1;
        } else {
            info!(label = %constraint.label, property = %constraint.property, "Constraint exists");
            report.existing += 1;
        }
    }

    info!(
        installed = report.installed,
        existing = report.existing,
        "Graph schema installed"
    );
    Ok(report)
}

/// Active rules, checked on every write by stores that enforce them in process.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    rules: IndexSet<UniqueConstraint>,
}

impl ConstraintSet {
    /// Add a rule. Returns false if it was already active.
    pub fn insert(&mut self, constraint: UniqueConstraint) -> bool {
        self.rules.insert(constraint)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UniqueConstraint> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Reject `candidate` if it collides with any of `existing` on an active
    /// rule for `label`. Null and absent values never collide.
    pub fn check(&self, label: Label, candidate: &Properties, existing: &[&Properties]) -> CineResult<()> {
        for rule in self.rules.iter().filter(|rule| rule.label == label) {
            let value = match candidate.get(&rule.property) {
                None | Some(Value::Null) => continue,
                Some(value) => value,
            };
            if existing.iter().any(|other| other.get(&rule.property) == Some(value)) {
                return Err(CineError::constraint(
                    label,
                    format!("{}.{} = {} already exists", label, rule.property, value),
                ));
            }
        }
        Ok(())
    }
}
