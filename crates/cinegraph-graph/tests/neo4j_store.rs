//! Store behavior against a live Neo4j instance.
//!
//! Connection settings come from the `NEO4J_*` environment variables.
//! Run with: cargo test -p cinegraph-graph -- --ignored

use cinegraph_core::actor::{self, model::CreateActorInput};
use cinegraph_core::common::new_id;
use cinegraph_core::genre;
use cinegraph_core::movie::{self, model::CreateMovieInput};
use cinegraph_core::{analytics, install_schema, CineError, GraphStore, Label, Schema};
use cinegraph_graph::{GraphClient, GraphConfig, Neo4jStore};
use serde_json::json;

async fn live_store() -> Neo4jStore {
    let config = GraphConfig::load(None).unwrap();
    let client = GraphClient::connect(&config).await.unwrap();
    let store = Neo4jStore::new(client);
    install_schema(&store, &Schema::cinema()).await.unwrap();
    store
}

#[tokio::test]
#[ignore = "Integration test: requires a running Neo4j. Run with: cargo test -- --ignored"]
async fn test_schema_install_is_idempotent() {
    let store = live_store().await;
    let report = install_schema(&store, &Schema::cinema()).await.unwrap();
    assert_eq!(report.installed, 0);
    assert_eq!(report.existing, 5);

    let active = store.unique_constraints().await.unwrap();
    assert!(active.iter().any(|c| c.label == Label::Genre && c.property == "name"));
}

#[tokio::test]
#[ignore = "Integration test: requires a running Neo4j. Run with: cargo test -- --ignored"]
async fn test_genre_upsert_returns_same_id() {
    let store = live_store().await;
    let name = format!("Genre {}", new_id());

    let first = genre::create_genre(&store, &name).await.unwrap();
    let second = genre::create_genre(&store, &name).await.unwrap();
    assert_eq!(first.id, second.id);

    genre::delete_genre(&store, &first.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Integration test: requires a running Neo4j. Run with: cargo test -- --ignored"]
async fn test_duplicate_genre_name_violates_constraint() {
    let store = live_store().await;
    let name = format!("Genre {}", new_id());
    let existing = genre::create_genre(&store, &name).await.unwrap();

    let mut tx = store.write().await.unwrap();
    let clash = json!({"id": new_id(), "name": name});
    let err = tx
        .create_node(Label::Genre, clash.as_object().cloned().unwrap())
        .await
        .unwrap_err();
    let _ = tx.rollback().await;
    assert!(matches!(err, CineError::ConstraintViolation { label: Label::Genre, .. }));

    genre::delete_genre(&store, &existing.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Integration test: requires a running Neo4j. Run with: cargo test -- --ignored"]
async fn test_movie_roundtrip_and_cascade() {
    let store = live_store().await;
    let genre_name = format!("Genre {}", new_id());
    let alice = actor::create_actor(&store, CreateActorInput::new("Alice", "1970-01-01"))
        .await
        .unwrap()
        .id;
    let bob = actor::create_actor(&store, CreateActorInput::new("Bob", "1971-01-01"))
        .await
        .unwrap()
        .id;
    let film = movie::create_movie(
        &store,
        CreateMovieInput::new("Live Film", 2024)
            .rated(7.5)
            .with_genre(&genre_name)
            .with_actor(&alice)
            .with_actor(&bob),
    )
    .await
    .unwrap()
    .id;

    let view = movie::get_movie(&store, &film).await.unwrap();
    assert_eq!(view.released, 2024);
    assert!((view.rating - 7.5).abs() < 1e-9);
    assert_eq!(view.genres, vec![genre_name.clone()]);
    assert_eq!(view.actors, vec!["Alice".to_string(), "Bob".to_string()]);

    let for_alice = analytics::collaborations(&store, &alice).await.unwrap();
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].actor_id, bob);

    actor::delete_actor(&store, &alice).await.unwrap();
    let cast = movie::movie_cast(&store, &film).await.unwrap();
    assert_eq!(cast.len(), 1);
    assert!(actor::get_actor(&store, &alice).await.unwrap_err().is_not_found());

    movie::delete_movie(&store, &film).await.unwrap();
    actor::delete_actor(&store, &bob).await.unwrap();
    let genres = genre::list_genres(&store).await.unwrap();
    if let Some(leftover) = genres.iter().find(|g| g.name == genre_name) {
        genre::delete_genre(&store, &leftover.id).await.unwrap();
    }
}
