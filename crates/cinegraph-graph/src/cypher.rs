//! Cypher statements and value conversion for the Neo4j backend.
//!
//! Labels and relationship types come from closed enums and are interpolated;
//! everything else travels as a query parameter.

use cinegraph_core::graph::{Direction, Label, Properties, Relation};
use cinegraph_core::UniqueConstraint;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType};
use serde_json::Value;

/// Uniqueness constraint type names across Neo4j 4.4 and 5.x.
const UNIQUENESS_TYPES: &str = "['UNIQUENESS', 'NODE_PROPERTY_UNIQUENESS']";

/// Strip everything but alphanumerics and underscores from an identifier.
pub fn identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

pub fn get_node(label: Label) -> String {
    format!("MATCH (n:{label} {{id: $id}}) RETURN properties(n) AS props LIMIT 1")
}

pub fn nodes(label: Label) -> String {
    format!("MATCH (n:{label}) RETURN properties(n) AS props")
}

/// First label of `node` that is one of `$known`; nodes may carry extra labels.
fn known_label(node: &str) -> String {
    format!("[l IN labels({node}) WHERE l IN $known][0]")
}

pub fn locate() -> String {
    format!(
        "MATCH (n {{id: $id}}) WITH n, {} AS label WHERE label IS NOT NULL \
         RETURN label, properties(n) AS props LIMIT 1",
        known_label("n")
    )
}

/// One row per edge, so parallel edges repeat the neighbor.
pub fn neighbors(label: Label, relation: Relation, direction: Direction) -> String {
    let pattern = match direction {
        Direction::Outgoing => format!("-[:{relation}]->"),
        Direction::Incoming => format!("<-[:{relation}]-"),
    };
    format!(
        "MATCH (n:{label} {{id: $id}}){pattern}(m) \
         RETURN {} AS label, properties(m) AS props",
        known_label("m")
    )
}

pub fn create_node(label: Label) -> String {
    format!("CREATE (n:{label}) SET n = $props RETURN n.id AS id")
}

pub fn merge_node(label: Label, key: &str) -> String {
    let key = identifier(key);
    format!("MERGE (n:{label} {{{key}: $value}}) ON CREATE SET n += $props RETURN n.id AS id")
}

pub fn delete_node(label: Label) -> String {
    format!("MATCH (n:{label} {{id: $id}}) DETACH DELETE n RETURN count(*) AS deleted")
}

pub fn create_edge(from: Label, relation: Relation, to: Label) -> String {
    format!(
        "MATCH (a:{from} {{id: $from_id}}) MATCH (b:{to} {{id: $to_id}}) \
         CREATE (a)-[:{relation}]->(b) RETURN count(*) AS created"
    )
}

pub fn find_constraint() -> String {
    format!(
        "SHOW CONSTRAINTS YIELD type, labelsOrTypes, properties \
         WHERE type IN {UNIQUENESS_TYPES} AND labelsOrTypes = [$label] AND properties = [$property] \
         RETURN count(*) AS found"
    )
}

pub fn list_constraints() -> String {
    format!(
        "SHOW CONSTRAINTS YIELD type, labelsOrTypes, properties \
         WHERE type IN {UNIQUENESS_TYPES} AND size(properties) = 1 \
         RETURN labelsOrTypes[0] AS label, properties[0] AS property"
    )
}

pub fn create_constraint(constraint: &UniqueConstraint) -> String {
    let property = identifier(&constraint.property);
    format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{property} IS UNIQUE",
        identifier(&constraint.name()),
        constraint.label,
    )
}

/// The `$known` parameter: every label the film graph models.
pub fn known_labels() -> BoltType {
    let mut list = BoltList::new();
    for label in Label::ALL {
        list.push(BoltType::from(label.as_str()));
    }
    BoltType::List(list)
}

/// Convert a JSON value into a bolt parameter.
pub fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(map) => BoltType::Map(props_map(map)),
    }
}

/// Convert a property map into a bolt map parameter.
pub fn props_map(properties: &Properties) -> BoltMap {
    let mut map = BoltMap::new();
    for (key, value) in properties {
        map.put(BoltString::from(key.as_str()), to_bolt(value));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_neighbor_patterns() {
        let out = neighbors(Label::Actor, Relation::ActedIn, Direction::Outgoing);
        assert!(out.starts_with("MATCH (n:Actor {id: $id})-[:ACTED_IN]->(m)"));

        let incoming = neighbors(Label::Award, Relation::WonAward, Direction::Incoming);
        assert!(incoming.starts_with("MATCH (n:Award {id: $id})<-[:WON_AWARD]-(m)"));
    }

    #[test]
    fn test_node_label_ignores_extra_labels() {
        let out = neighbors(Label::Movie, Relation::HasGenre, Direction::Outgoing);
        assert!(out.contains("RETURN [l IN labels(m) WHERE l IN $known][0] AS label"));
        assert!(!out.contains("labels(m)[0]"));

        let found = locate();
        assert!(found.contains("[l IN labels(n) WHERE l IN $known][0] AS label"));
        assert!(found.contains("WHERE label IS NOT NULL"));

        match known_labels() {
            BoltType::List(list) => assert_eq!(list.value.len(), Label::ALL.len()),
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_key_is_sanitized() {
        let statement = merge_node(Label::Genre, "name}) DETACH DELETE n //");
        assert!(statement.starts_with("MERGE (n:Genre {nameDETACHDELETEn: $value})"));
    }

    #[test]
    fn test_constraint_statement() {
        let statement = create_constraint(&UniqueConstraint::new(Label::Genre, "name"));
        assert_eq!(
            statement,
            "CREATE CONSTRAINT Genre_name_unique IF NOT EXISTS FOR (n:Genre) REQUIRE n.name IS UNIQUE"
        );
    }

    #[test]
    fn test_edge_statement_uses_parameters() {
        let statement = create_edge(Label::Movie, Relation::HasGenre, Label::Genre);
        assert!(statement.contains("(a:Movie {id: $from_id})"));
        assert!(statement.contains("(b:Genre {id: $to_id})"));
        assert!(statement.contains("CREATE (a)-[:HAS_GENRE]->(b)"));
    }

    #[test]
    fn test_to_bolt_scalars() {
        assert!(matches!(to_bolt(&json!(1999)), BoltType::Integer(_)));
        assert!(matches!(to_bolt(&json!(8.7)), BoltType::Float(_)));
        assert!(matches!(to_bolt(&json!("Heat")), BoltType::String(_)));
        assert!(matches!(to_bolt(&json!(true)), BoltType::Boolean(_)));
        assert!(matches!(to_bolt(&Value::Null), BoltType::Null(_)));
        assert!(matches!(to_bolt(&json!(["a", "b"])), BoltType::List(_)));
    }

    #[test]
    fn test_props_map_keeps_every_key() {
        let props = json!({"id": "m1", "title": "Heat", "released": 1995});
        let map = props_map(props.as_object().unwrap());
        assert_eq!(map.value.len(), 3);
    }
}
