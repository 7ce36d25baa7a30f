//! Registry of the match groups of a reconciliation session

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Ordered collection of match groups with membership checks
///
/// Serialized as the plain list of groups; the entry index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<MatchGroup>", try_from = "Vec<MatchGroup>")]
pub struct MatchRegistry {
    groups: Vec<MatchGroup>,
    ids: HashSet<String>,
    /// Entry id to the id of the group that owns it
    owners: HashMap<String, String>,
}

impl MatchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group.
    ///
    /// Fails if the id is taken or if any member entry already belongs to another group.
    pub fn insert(&mut self, group: MatchGroup) -> ReconcileResult<()> {
        if self.ids.contains(&group.id) {
            return Err(ReconcileError::Registry(format!(
                "Match group '{}' already exists",
                group.id
            )));
        }
        if let Some(entry_id) = group
            .entry_ids()
            .find(|entry_id| self.owners.contains_key(*entry_id))
        {
            return Err(ReconcileError::Registry(format!(
                "Entry '{}' already belongs to another match group",
                entry_id
            )));
        }
        for entry_id in group.entry_ids() {
            self.owners.insert(entry_id.to_string(), group.id.clone());
        }
        self.ids.insert(group.id.clone());
        self.groups.push(group);
        Ok(())
    }

    /// Register several groups, stopping at the first rejected one
    pub fn extend(&mut self, groups: impl IntoIterator<Item = MatchGroup>) -> ReconcileResult<()> {
        for group in groups {
            self.insert(group)?;
        }
        Ok(())
    }

    /// Remove and return a group
    pub fn remove(&mut self, match_id: &str) -> Option<MatchGroup> {
        let index = self.groups.iter().position(|g| g.id == match_id)?;
        let group = self.groups.remove(index);
        self.ids.remove(&group.id);
        for entry_id in group.entry_ids() {
            self.owners.remove(entry_id);
        }
        Some(group)
    }

    pub fn get(&self, match_id: &str) -> Option<&MatchGroup> {
        self.groups.iter().find(|g| g.id == match_id)
    }

    /// Group owning the given entry, if any
    pub fn find_by_entry(&self, entry_id: &str) -> Option<&MatchGroup> {
        let match_id = self.owners.get(entry_id)?;
        self.get(match_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.ids.clear();
        self.owners.clear();
    }

    /// Groups whose side sums differ
    pub fn discrepancies(&self) -> impl Iterator<Item = &MatchGroup> {
        self.groups.iter().filter(|g| g.is_discrepancy)
    }

    pub fn count_by_type(&self, match_type: MatchType) -> usize {
        self.groups
            .iter()
            .filter(|g| g.match_type == match_type)
            .count()
    }
}

impl From<MatchRegistry> for Vec<MatchGroup> {
    fn from(registry: MatchRegistry) -> Self {
        registry.groups
    }
}

impl TryFrom<Vec<MatchGroup>> for MatchRegistry {
    type Error = ReconcileError;

    fn try_from(groups: Vec<MatchGroup>) -> ReconcileResult<Self> {
        let mut registry = MatchRegistry::new();
        registry.extend(groups)?;
        Ok(registry)
    }
}

impl<'a> IntoIterator for &'a MatchRegistry {
    type Item = &'a MatchGroup;
    type IntoIter = std::slice::Iter<'a, MatchGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn group(match_type: MatchType, bank: &[&str], other: &[&str], bank_sum: i32, other_sum: i32) -> MatchGroup {
        MatchGroup::new(
            match_type,
            bank.iter().map(|s| s.to_string()).collect(),
            other.iter().map(|s| s.to_string()).collect(),
            BigDecimal::from(bank_sum),
            BigDecimal::from(other_sum),
        )
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut registry = MatchRegistry::new();
        let g = group(MatchType::Auto, &["b1"], &["o1"], 5, 5);
        let id = g.id.clone();
        registry.insert(g).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_by_entry("o1").map(|g| g.id.as_str()), Some(id.as_str()));
        assert!(registry.find_by_entry("b2").is_none());

        let removed = registry.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(registry.is_empty());
        assert!(registry.remove(&id).is_none());
    }

    #[test]
    fn test_entry_cannot_join_two_groups() {
        let mut registry = MatchRegistry::new();
        registry
            .insert(group(MatchType::Auto, &["b1"], &["o1"], 5, 5))
            .unwrap();
        let err = registry
            .insert(group(MatchType::Manual, &["b2"], &["o1"], 5, 5))
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Registry(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = MatchRegistry::new();
        let g = group(MatchType::Auto, &["b1"], &["o1"], 5, 5);
        registry.insert(g.clone()).unwrap();
        assert!(registry.insert(g).is_err());
    }

    #[test]
    fn test_discrepancies_and_counts() {
        let mut registry = MatchRegistry::new();
        registry
            .extend([
                group(MatchType::Auto, &["b1"], &["o1"], 5, 5),
                group(MatchType::Manual, &["b2", "b3"], &["o2"], 50, 49),
                group(MatchType::Manual, &["b4"], &["o3", "o4"], 10, 10),
            ])
            .unwrap();

        assert_eq!(registry.count_by_type(MatchType::Auto), 1);
        assert_eq!(registry.count_by_type(MatchType::Manual), 2);
        let flagged: Vec<_> = registry.discrepancies().collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].bank_entry_ids, vec!["b2", "b3"]);
        assert_eq!((&registry).into_iter().count(), 3);
    }

    #[test]
    fn test_removed_entries_can_join_new_group() {
        let mut registry = MatchRegistry::new();
        let g = group(MatchType::Auto, &["b1"], &["o1"], 5, 5);
        let id = g.id.clone();
        registry.insert(g).unwrap();
        registry.remove(&id).unwrap();

        assert!(registry.find_by_entry("b1").is_none());
        registry
            .insert(group(MatchType::Manual, &["b1"], &["o1", "o2"], 5, 5))
            .unwrap();
        assert_eq!(registry.find_by_entry("o2").map(|g| g.match_type), Some(MatchType::Manual));

        registry.clear();
        assert!(registry.find_by_entry("b1").is_none());
    }

    #[test]
    fn test_serialized_as_group_list() {
        let mut registry = MatchRegistry::new();
        registry
            .insert(group(MatchType::Auto, &["b1"], &["o1"], 5, 5))
            .unwrap();
        let json = serde_json::to_value(&registry).unwrap();
        assert!(json.is_array());

        let restored: MatchRegistry = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restored, registry);
        assert!(restored.find_by_entry("o1").is_some());

        let doubled = serde_json::Value::Array(vec![json[0].clone(), json[0].clone()]);
        assert!(serde_json::from_value::<MatchRegistry>(doubled).is_err());
    }
}
