use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::core::LoadError;

pub const DEFAULT_PARTITION_NAME: &str = "__HIVE_DEFAULT_PARTITION__";
pub const DEFAULT_LIST_BUCKETING_DIR_NAME: &str = "HIVE_DEFAULT_LIST_BUCKETING_DIR_NAME";
pub const DEFAULT_MAX_PARTS_PER_NODE: usize = 1000;

/// Partition coordinates in the table's declared partition-column order.
///
/// A `None` value marks a dynamic column, resolved from the data at
/// execution time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(String, Option<String>)>",
    into = "Vec<(String, Option<String>)>"
)]
pub struct PartitionSpec {
    columns: Vec<(String, Option<String>)>,
}

impl PartitionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value. An existing column keeps its position.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) -> Option<Option<String>> {
        let column = column.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.columns.push((column, value));
                None
            }
        }
    }

    /// `None` if the column is absent, `Some(None)` if it is dynamic.
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|(name, _)| name == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn static_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    pub fn dynamic_columns(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
    }

    pub fn is_fully_static(&self) -> bool {
        self.columns.iter().all(|(_, value)| value.is_some())
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for PartitionSpec {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut spec = PartitionSpec::new();
        for (column, value) in iter {
            spec.insert(column, value);
        }
        spec
    }
}

impl TryFrom<Vec<(String, Option<String>)>> for PartitionSpec {
    type Error = LoadError;

    fn try_from(columns: Vec<(String, Option<String>)>) -> Result<Self, Self::Error> {
        let mut spec = PartitionSpec::new();
        for (column, value) in columns {
            if spec.contains(&column) {
                return Err(LoadError::InvalidDescriptor(format!(
                    "duplicate partition column '{column}'"
                )));
            }
            spec.columns.push((column, value));
        }
        Ok(spec)
    }
}

impl From<PartitionSpec> for Vec<(String, Option<String>)> {
    fn from(spec: PartitionSpec) -> Self {
        spec.columns
    }
}

/// Renders `ds=2024-01-14/hr`, a dynamic column shown by name only.
impl fmt::Display for PartitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match value {
                Some(value) => write!(f, "{name}={value}")?,
                None => f.write_str(name)?,
            }
        }
        Ok(())
    }
}

/// Which partition columns are dynamic and how to resolve them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicPartitionCtx {
    pub part_spec: Option<PartitionSpec>,
    pub num_dp_cols: usize,
    pub num_sp_cols: usize,
    /// Path prefix built from the leading static columns, e.g. `ds=1/`.
    pub sp_path: Option<String>,
    pub dp_names: Vec<String>,
    pub default_part_name: String,
    pub max_parts_per_node: usize,
}

impl DynamicPartitionCtx {
    pub fn from_spec(spec: PartitionSpec) -> Self {
        let dp_names: Vec<String> = spec.dynamic_columns().map(str::to_string).collect();
        let num_dp_cols = dp_names.len();
        let num_sp_cols = spec.len() - num_dp_cols;

        let mut sp_path = String::new();
        for (name, value) in spec.iter() {
            match value {
                Some(value) => {
                    let _ = write!(sp_path, "{name}={value}/");
                }
                None => break,
            }
        }

        Self {
            part_spec: Some(spec),
            num_dp_cols,
            num_sp_cols,
            sp_path: (!sp_path.is_empty()).then_some(sp_path),
            dp_names,
            default_part_name: DEFAULT_PARTITION_NAME.to_string(),
            max_parts_per_node: DEFAULT_MAX_PARTS_PER_NODE,
        }
    }

    pub fn with_default_part_name(mut self, name: impl Into<String>) -> Self {
        self.default_part_name = name.into();
        self
    }

    pub fn with_max_parts_per_node(mut self, max: usize) -> Self {
        self.max_parts_per_node = max;
        self
    }
}

impl Default for DynamicPartitionCtx {
    fn default() -> Self {
        Self {
            part_spec: None,
            num_dp_cols: 0,
            num_sp_cols: 0,
            sp_path: None,
            dp_names: Vec::new(),
            default_part_name: DEFAULT_PARTITION_NAME.to_string(),
            max_parts_per_node: DEFAULT_MAX_PARTS_PER_NODE,
        }
    }
}

/// Skewed-value layout of the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBucketingCtx {
    pub skewed_col_names: Vec<String>,
    pub skewed_col_values: Vec<Vec<String>>,
    pub stored_as_sub_dirs: bool,
    pub default_dir_name: String,
}

impl ListBucketingCtx {
    pub fn new(skewed_col_names: Vec<String>, skewed_col_values: Vec<Vec<String>>) -> Self {
        Self {
            skewed_col_names,
            skewed_col_values,
            stored_as_sub_dirs: true,
            default_dir_name: DEFAULT_LIST_BUCKETING_DIR_NAME.to_string(),
        }
    }

    pub fn is_skewed(&self) -> bool {
        self.stored_as_sub_dirs && !self.skewed_col_names.is_empty()
    }
}

impl Default for ListBucketingCtx {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
