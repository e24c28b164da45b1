//! Award winner resolution.

use serde::{Deserialize, Serialize};

use crate::common::distinct_nodes;
use crate::error::CineResult;
use crate::graph::{Direction, GraphStore, Label, Relation};

/// A winner of an award, rendered as its label and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    #[serde(rename = "type")]
    pub kind: Label,
    pub id: String,
    pub name: String,
}

const WINNER_LABELS: [Label; 3] = [Label::Actor, Label::Director, Label::Movie];

/// Everyone and everything that won `award_id`: actors first, then
/// directors, then movies, each group ordered by name.
pub async fn winners(store: &dyn GraphStore, award_id: &str) -> CineResult<Vec<Winner>> {
    let mut rx = store.read().await?;
    let award = rx.get_node(Label::Award, award_id).await?;

    let sources = distinct_nodes(
        rx.neighbors(&award.node_ref(), Relation::WonAward, Direction::Incoming)
            .await?,
    );

    let mut result = Vec::with_capacity(sources.len());
    for label in WINNER_LABELS {
        let mut group: Vec<Winner> = sources
            .iter()
            .filter(|node| node.label == label && !node.display_name().is_empty())
            .map(|node| Winner {
                kind: label,
                id: node.id.clone(),
                name: node.display_name().to_string(),
            })
            .collect();
        group.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        result.extend(group);
    }
    Ok(result)
}
