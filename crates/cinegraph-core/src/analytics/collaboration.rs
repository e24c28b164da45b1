//! Co-actor discovery.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::common::distinct_nodes;
use crate::error::CineResult;
use crate::graph::{Direction, GraphStore, Label, Node, Relation};

/// Another actor and the titles shared with the anchor actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub actor_id: String,
    pub actor_name: String,
    pub movies_together: Vec<String>,
}

/// Actors who appeared in at least one movie with `actor_id`, most shared
/// movies first.
pub async fn collaborations(store: &dyn GraphStore, actor_id: &str) -> CineResult<Vec<Collaboration>> {
    let mut rx = store.read().await?;
    let actor = rx.get_node(Label::Actor, actor_id).await?;

    let films = distinct_nodes(
        rx.neighbors(&actor.node_ref(), Relation::ActedIn, Direction::Outgoing)
            .await?,
    );

    let mut partners: IndexMap<String, (Node, BTreeSet<String>)> = IndexMap::new();
    for film in &films {
        let cast = rx
            .neighbors(&film.node_ref(), Relation::ActedIn, Direction::Incoming)
            .await?;
        for co_actor in cast {
            if co_actor.id == actor.id {
                continue;
            }
            let title = film.display_name().to_string();
            partners
                .entry(co_actor.id.clone())
                .or_insert_with(|| (co_actor, BTreeSet::new()))
                .1
                .insert(title);
        }
    }

    let mut result: Vec<Collaboration> = partners
        .into_values()
        .map(|(node, titles)| Collaboration {
            actor_name: node.display_name().to_string(),
            actor_id: node.id,
            movies_together: titles.into_iter().collect(),
        })
        .collect();

    result.sort_by(|a, b| {
        b.movies_together
            .len()
            .cmp(&a.movies_together.len())
            .then_with(|| a.actor_name.cmp(&b.actor_name))
            .then_with(|| a.actor_id.cmp(&b.actor_id))
    });
    Ok(result)
}
