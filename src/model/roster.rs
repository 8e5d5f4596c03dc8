//! Entity records supplied for a print run

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Entity, EntityId};

/// Errors that can occur while loading entity records
#[derive(Debug, Error)]
pub enum RosterError {
    /// Error reading a roster file
    #[error("error reading roster file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },

    /// Records are not valid entity JSON
    #[error("invalid entity records: {0}")]
    InvalidRecords(#[from] serde_json::Error),
}

/// Entities by id
///
/// A repeated id replaces the earlier record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entities: BTreeMap<EntityId, Entity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from a JSON array of entity records
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let records: Vec<Entity> = serde_json::from_str(json)?;
        Ok(records.into_iter().collect())
    }

    /// Load a JSON array of entity records from a file
    pub fn from_file(path: &Path) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path).map_err(|e| RosterError::FileReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for Roster {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut roster = Self::new();
        for entity in iter {
            roster.insert(entity);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let roster = Roster::from_json(
            r#"[
                {"id": "E1", "attributes": {"name": "Ada", "guardian": {"name": "Byron"}}},
                {"id": "E2"}
            ]"#,
        )
        .unwrap();

        assert_eq!(roster.len(), 2);
        let ada = roster.get(&EntityId::new("E1")).unwrap();
        assert_eq!(ada.display_value("guardian.name").as_deref(), Some("Byron"));
        assert!(roster.get(&EntityId::new("E2")).unwrap().attributes.is_empty());
        assert!(roster.get(&EntityId::new("E3")).is_none());
    }

    #[test]
    fn test_repeated_id_replaces_record() {
        let roster: Roster = vec![
            Entity::new("E1").with_attribute("name", "Ada"),
            Entity::new("E1").with_attribute("name", "Grace"),
        ]
        .into_iter()
        .collect();
        assert_eq!(roster.len(), 1);
        assert_eq!(
            roster.get(&EntityId::new("E1")).unwrap().display_value("name").as_deref(),
            Some("Grace")
        );
    }

    #[test]
    fn test_invalid_records() {
        assert!(matches!(
            Roster::from_json(r#"{"id": "E1"}"#),
            Err(RosterError::InvalidRecords(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Roster::from_file(Path::new("/nonexistent/roster.json")),
            Err(RosterError::FileReadError { .. })
        ));
    }
}
