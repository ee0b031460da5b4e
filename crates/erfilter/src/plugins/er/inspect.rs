//! Entity and relationship listing
//!
//! Reports what an ER diagram declares using the same line classifier as
//! the filter, so names shown here are exactly the names exclusions match.

use serde::Serialize;

use super::line::LineKind;

/// A relationship line's two endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipRef {
    pub first: Option<String>,
    pub second: Option<String>,
}

/// Entities and relationships found in a diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErSummary {
    /// Entities declared by a block, first occurrence order, no duplicates
    pub entities: Vec<String>,
    pub relationships: Vec<RelationshipRef>,
}

impl ErSummary {
    /// Entities declared by a block but named by no relationship
    pub fn orphans(&self) -> Vec<&str> {
        self.entities
            .iter()
            .map(String::as_str)
            .filter(|entity| {
                !self.relationships.iter().any(|r| {
                    r.first.as_deref() == Some(*entity) || r.second.as_deref() == Some(*entity)
                })
            })
            .collect()
    }
}

/// List the entities and relationships of `text`
pub fn inspect(text: &str) -> ErSummary {
    let mut summary = ErSummary::default();

    for line in text.split('\n') {
        match LineKind::classify(line) {
            LineKind::BlockStart { entity } => {
                if !summary.entities.iter().any(|e| e == entity) {
                    summary.entities.push(entity.to_string());
                }
            }
            LineKind::Relationship { first, second } => {
                summary.relationships.push(RelationshipRef {
                    first: first.map(str::to_string),
                    second: second.map(str::to_string),
                });
            }
            _ => {}
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_lists_entities_in_order() {
        let text = "erDiagram\nB {\n}\nA {\n  int id\n}\nB {\n}\nA ||--o{ B : has";
        let summary = inspect(text);
        assert_eq!(summary.entities, vec!["B", "A"]);
        assert_eq!(
            summary.relationships,
            vec![RelationshipRef {
                first: Some("A".into()),
                second: Some("B".into())
            }]
        );
    }

    #[test]
    fn test_orphans() {
        let text = "erDiagram\nA {\n}\nB {\n}\nC {\n}\nA ||--|| B : r\nD ||";
        assert_eq!(inspect(text).orphans(), vec!["C"]);
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_string(&inspect("X ||")).unwrap();
        assert_eq!(
            json,
            r#"{"entities":[],"relationships":[{"first":"X","second":null}]}"#
        );
    }
}
