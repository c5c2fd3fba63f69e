use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::LoadError;
use crate::plan::{
    AcidOperation, DEFAULT_MAX_PARTS_PER_NODE, DEFAULT_PARTITION_NAME, DynamicPartitionCtx,
    ListBucketingCtx, LoadTableDesc, LoadTableOptions, PartitionSpec, TableDesc,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartitionColumnConfig {
    pub name: String,
    /// Absent for a dynamic column.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ListBucketingConfig {
    pub skewed_columns: Vec<String>,
    #[serde(default)]
    pub skewed_values: Vec<Vec<String>>,
    #[serde(default = "ListBucketingConfig::default_stored_as_sub_dirs")]
    pub stored_as_sub_dirs: bool,
}

impl ListBucketingConfig {
    fn default_stored_as_sub_dirs() -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    pub source: PathBuf,
    pub table: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub partition: Vec<PartitionColumnConfig>,
    /// Route the partition spec through a dynamic-partition context.
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default = "LoadConfig::default_part_name")]
    pub default_part_name: String,
    #[serde(default = "LoadConfig::default_max_parts_per_node")]
    pub max_parts_per_node: usize,
    #[serde(default)]
    pub list_bucketing: Option<ListBucketingConfig>,
    #[serde(default = "LoadConfig::default_true")]
    pub replace: bool,
    #[serde(default = "LoadConfig::default_true")]
    pub inherit_table_specs: bool,
    #[serde(default)]
    pub write_type: AcidOperation,
    #[serde(default)]
    pub txn_id: Option<u64>,
    #[serde(default)]
    pub stmt_id: i32,
    #[serde(default)]
    pub intermediate: bool,
}

impl LoadConfig {
    fn default_true() -> bool {
        true
    }

    fn default_part_name() -> String {
        String::from(DEFAULT_PARTITION_NAME)
    }

    fn default_max_parts_per_node() -> usize {
        DEFAULT_MAX_PARTS_PER_NODE
    }

    pub fn partition_spec(&self) -> PartitionSpec {
        self.partition
            .iter()
            .map(|col| (col.name.as_str(), col.value.clone()))
            .collect()
    }

    pub fn to_descriptor(&self) -> Result<LoadTableDesc, LoadError> {
        let table = Arc::new(TableDesc::with_properties(
            self.table.clone(),
            self.properties.clone(),
        ));
        let mut options = LoadTableOptions::new(self.source.clone(), table)
            .replace(self.replace)
            .inherit_table_specs(self.inherit_table_specs)
            .write_type(self.write_type)
            .txn_id(self.txn_id)
            .stmt_id(self.stmt_id);

        if self.dynamic {
            let ctx = DynamicPartitionCtx::from_spec(self.partition_spec())
                .with_default_part_name(self.default_part_name.clone())
                .with_max_parts_per_node(self.max_parts_per_node);
            options = options.dp_ctx(Arc::new(ctx));
        } else {
            options = options.partition_spec(self.partition_spec());
        }

        if let Some(lb) = &self.list_bucketing {
            let mut ctx = ListBucketingCtx::new(lb.skewed_columns.clone(), lb.skewed_values.clone());
            ctx.stored_as_sub_dirs = lb.stored_as_sub_dirs;
            options = options.lb_ctx(Arc::new(ctx));
        }

        let mut desc = options.build()?;
        desc.set_intermediate_in_mm_write(self.intermediate);
        Ok(desc)
    }
}
