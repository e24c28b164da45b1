//! Genre domain models.

use serde::{Deserialize, Serialize};

/// A genre. The name is its identity; the id is assigned on first creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}
