use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

pub type TableProperties = BTreeMap<String, String>;

pub const TABLE_TRANSACTIONAL: &str = "transactional";
pub const TABLE_TRANSACTIONAL_PROPERTIES: &str = "transactional_properties";
pub const INSERT_ONLY: &str = "insert_only";

/// True when the properties mark an insert-only (micromanaged) transactional table.
pub fn is_insert_only_table(props: &TableProperties) -> bool {
    props
        .get(TABLE_TRANSACTIONAL_PROPERTIES)
        .is_some_and(|v| v.eq_ignore_ascii_case(INSERT_ONLY))
}

pub fn is_transactional_table(props: &TableProperties) -> bool {
    props
        .get(TABLE_TRANSACTIONAL)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Destination table metadata, shared with the rest of the plan.
///
/// Properties sit behind a lock so that metadata refreshed after a load
/// descriptor was built is visible through every `Arc<TableDesc>` holder.
#[derive(Debug, Serialize, Deserialize)]
pub struct TableDesc {
    name: String,
    #[serde(default)]
    properties: RwLock<TableProperties>,
}

impl TableDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_properties(name, TableProperties::new())
    }

    pub fn with_properties(name: impl Into<String>, properties: TableProperties) -> Self {
        Self {
            name: name.into(),
            properties: RwLock::new(properties),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current properties.
    pub fn properties(&self) -> TableProperties {
        self.read().clone()
    }

    pub fn property(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().insert(key.into(), value.into());
    }

    pub fn remove_property(&self, key: &str) -> Option<String> {
        self.write().remove(key)
    }

    pub fn is_insert_only(&self) -> bool {
        is_insert_only_table(&self.read())
    }

    pub fn is_transactional(&self) -> bool {
        is_transactional_table(&self.read())
    }

    fn read(&self) -> RwLockReadGuard<'_, TableProperties> {
        self.properties.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableProperties> {
        self.properties.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clone for TableDesc {
    fn clone(&self) -> Self {
        Self::with_properties(self.name.clone(), self.properties())
    }
}

impl PartialEq for TableDesc {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.name == other.name && *self.read() == *other.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> TableProperties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_insert_only_detection() {
        assert!(is_insert_only_table(&props(&[
            ("transactional", "true"),
            ("transactional_properties", "INSERT_ONLY"),
        ])));
        assert!(!is_insert_only_table(&props(&[("transactional", "true")])));
        assert!(!is_insert_only_table(&props(&[(
            "transactional_properties",
            "default"
        )])));
        assert!(!is_insert_only_table(&TableProperties::new()));
    }

    #[test]
    fn test_transactional_detection() {
        assert!(is_transactional_table(&props(&[("transactional", "TRUE")])));
        assert!(!is_transactional_table(&props(&[("transactional", "false")])));
    }

    #[test]
    fn test_property_updates_visible() {
        let table = TableDesc::new("db.events");
        assert!(!table.is_insert_only());
        table.set_property(TABLE_TRANSACTIONAL_PROPERTIES, INSERT_ONLY);
        assert!(table.is_insert_only());
        assert_eq!(
            table.remove_property(TABLE_TRANSACTIONAL_PROPERTIES).as_deref(),
            Some(INSERT_ONLY)
        );
        assert!(!table.is_insert_only());
    }

    #[test]
    fn test_clone_detaches_properties() {
        let table = TableDesc::with_properties("t", props(&[("a", "1")]));
        let copy = table.clone();
        assert_eq!(table, copy);
        copy.set_property("a", "2");
        assert_eq!(table.property("a").as_deref(), Some("1"));
        assert_ne!(table, copy);
    }
}
