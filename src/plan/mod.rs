mod acid;
mod explain;
mod load;
mod partition;
mod table;

pub use acid::AcidOperation;
pub use explain::{ExplainLevel, explain_fields, explain_text};
pub use load::{LoadDesc, LoadTableDesc, LoadTableOptions, MmWriteState};
pub use partition::{
    DEFAULT_LIST_BUCKETING_DIR_NAME, DEFAULT_MAX_PARTS_PER_NODE, DEFAULT_PARTITION_NAME,
    DynamicPartitionCtx, ListBucketingCtx, PartitionSpec,
};
pub use table::{
    INSERT_ONLY, TABLE_TRANSACTIONAL, TABLE_TRANSACTIONAL_PROPERTIES, TableDesc, TableProperties,
    is_insert_only_table, is_transactional_table,
};
