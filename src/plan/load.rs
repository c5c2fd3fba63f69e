use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::LoadError;
use crate::plan::acid::AcidOperation;
use crate::plan::partition::{DynamicPartitionCtx, ListBucketingCtx, PartitionSpec};
use crate::plan::table::TableDesc;

/// Base of every load: where the data currently resides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LoadDescRepr")]
pub struct LoadDesc {
    source_path: PathBuf,
}

#[derive(Deserialize)]
struct LoadDescRepr {
    source_path: PathBuf,
}

impl TryFrom<LoadDescRepr> for LoadDesc {
    type Error = LoadError;

    fn try_from(repr: LoadDescRepr) -> Result<Self, Self::Error> {
        LoadDesc::new(repr.source_path)
    }
}

impl LoadDesc {
    pub fn new(source_path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let source_path = source_path.into();
        if source_path.as_os_str().is_empty() {
            return Err(LoadError::InvalidDescriptor(
                "source path must not be empty".to_string(),
            ));
        }
        Ok(Self { source_path })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// Commit state of a write into an insert-only transactional table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MmWriteState {
    #[default]
    Committed,
    /// Written but not committed; a later step finalizes the write id.
    Intermediate,
}

/// Everything a load descriptor can be built from.
///
/// Unset options take the defaults of a plain non-transactional overwrite:
/// replace, inherit table specs, `NotAcid`, no transaction, statement 0.
#[derive(Debug, Clone)]
pub struct LoadTableOptions {
    pub source_path: PathBuf,
    pub table: Arc<TableDesc>,
    /// Explicit static spec. Wins over the spec carried by `dp_ctx`.
    pub partition_spec: Option<PartitionSpec>,
    pub dp_ctx: Option<Arc<DynamicPartitionCtx>>,
    pub lb_ctx: Option<Arc<ListBucketingCtx>>,
    pub replace: bool,
    pub inherit_table_specs: bool,
    pub write_type: AcidOperation,
    pub txn_id: Option<u64>,
    pub stmt_id: i32,
}

impl LoadTableOptions {
    pub fn new(source_path: impl Into<PathBuf>, table: Arc<TableDesc>) -> Self {
        Self {
            source_path: source_path.into(),
            table,
            partition_spec: None,
            dp_ctx: None,
            lb_ctx: None,
            replace: true,
            inherit_table_specs: true,
            write_type: AcidOperation::NotAcid,
            txn_id: None,
            stmt_id: 0,
        }
    }

    pub fn partition_spec(mut self, spec: PartitionSpec) -> Self {
        self.partition_spec = Some(spec);
        self
    }

    pub fn dp_ctx(mut self, ctx: Arc<DynamicPartitionCtx>) -> Self {
        self.dp_ctx = Some(ctx);
        self
    }

    pub fn lb_ctx(mut self, ctx: Arc<ListBucketingCtx>) -> Self {
        self.lb_ctx = Some(ctx);
        self
    }

    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn inherit_table_specs(mut self, inherit: bool) -> Self {
        self.inherit_table_specs = inherit;
        self
    }

    pub fn write_type(mut self, write_type: AcidOperation) -> Self {
        self.write_type = write_type;
        self
    }

    pub fn txn_id(mut self, txn_id: Option<u64>) -> Self {
        self.txn_id = txn_id;
        self
    }

    pub fn stmt_id(mut self, stmt_id: i32) -> Self {
        self.stmt_id = stmt_id;
        self
    }

    pub fn build(self) -> Result<LoadTableDesc, LoadError> {
        LoadTableDesc::new(self)
    }
}

/// Tells the move stage how to load data into a table or partition.
///
/// The table and the partitioning contexts are shared with the plan; a clone
/// shares them too while copying every scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoadTableDescRepr")]
pub struct LoadTableDesc {
    #[serde(flatten)]
    load: LoadDesc,
    table: Arc<TableDesc>,
    partition_spec: PartitionSpec,
    dp_ctx: Option<Arc<DynamicPartitionCtx>>,
    lb_ctx: Option<Arc<ListBucketingCtx>>,
    replace: bool,
    inherit_table_specs: bool,
    write_type: AcidOperation,
    txn_id: Option<u64>,
    stmt_id: i32,
    mm_write: MmWriteState,
}

/// Wire form of `LoadTableDesc`, validated on the way in.
#[derive(Deserialize)]
struct LoadTableDescRepr {
    source_path: PathBuf,
    table: Arc<TableDesc>,
    partition_spec: PartitionSpec,
    dp_ctx: Option<Arc<DynamicPartitionCtx>>,
    lb_ctx: Option<Arc<ListBucketingCtx>>,
    replace: bool,
    inherit_table_specs: bool,
    write_type: AcidOperation,
    txn_id: Option<u64>,
    stmt_id: i32,
    mm_write: MmWriteState,
}

impl TryFrom<LoadTableDescRepr> for LoadTableDesc {
    type Error = LoadError;

    fn try_from(repr: LoadTableDescRepr) -> Result<Self, Self::Error> {
        let mut desc = LoadTableOptions::new(repr.source_path, repr.table)
            .partition_spec(repr.partition_spec)
            .replace(repr.replace)
            .inherit_table_specs(repr.inherit_table_specs)
            .write_type(repr.write_type)
            .txn_id(repr.txn_id)
            .stmt_id(repr.stmt_id)
            .build()?;
        desc.dp_ctx = repr.dp_ctx;
        desc.lb_ctx = repr.lb_ctx;
        desc.mm_write = repr.mm_write;
        Ok(desc)
    }
}

impl LoadTableDesc {
    pub fn new(options: LoadTableOptions) -> Result<Self, LoadError> {
        let LoadTableOptions {
            source_path,
            table,
            partition_spec,
            dp_ctx,
            lb_ctx,
            replace,
            inherit_table_specs,
            write_type,
            txn_id,
            stmt_id,
        } = options;

        let load = LoadDesc::new(source_path)?;
        if table.name().is_empty() {
            return Err(LoadError::InvalidDescriptor(
                "destination table name must not be empty".to_string(),
            ));
        }
        debug!(
            "creating load table descriptor from {} to {}",
            load.source_path().display(),
            table.name()
        );

        let partition_spec = partition_spec
            .or_else(|| dp_ctx.as_ref().and_then(|ctx| ctx.part_spec.clone()))
            .unwrap_or_default();

        let mut desc = Self::init(load, table, partition_spec, replace, write_type, txn_id);
        desc.dp_ctx = dp_ctx;
        desc.lb_ctx = lb_ctx;
        desc.inherit_table_specs = inherit_table_specs;
        desc.stmt_id = stmt_id;
        Ok(desc)
    }

    fn init(
        load: LoadDesc,
        table: Arc<TableDesc>,
        partition_spec: PartitionSpec,
        replace: bool,
        write_type: AcidOperation,
        txn_id: Option<u64>,
    ) -> Self {
        Self {
            load,
            table,
            partition_spec,
            dp_ctx: None,
            lb_ctx: None,
            replace,
            inherit_table_specs: true,
            write_type,
            txn_id,
            stmt_id: 0,
            mm_write: MmWriteState::Committed,
        }
    }

    pub fn full(
        source_path: impl Into<PathBuf>,
        table: Arc<TableDesc>,
        partition_spec: PartitionSpec,
        replace: bool,
        write_type: AcidOperation,
        txn_id: Option<u64>,
    ) -> Result<Self, LoadError> {
        LoadTableOptions::new(source_path, table)
            .partition_spec(partition_spec)
            .replace(replace)
            .write_type(write_type)
            .txn_id(txn_id)
            .build()
    }

    /// For loads outside the transactional write path, such as `LOAD DATA`.
    pub fn non_acid(
        source_path: impl Into<PathBuf>,
        table: Arc<TableDesc>,
        partition_spec: PartitionSpec,
        replace: bool,
        txn_id: Option<u64>,
    ) -> Result<Self, LoadError> {
        Self::full(
            source_path,
            table,
            partition_spec,
            replace,
            AcidOperation::NotAcid,
            txn_id,
        )
    }

    pub fn replacing(
        source_path: impl Into<PathBuf>,
        table: Arc<TableDesc>,
        partition_spec: PartitionSpec,
        write_type: AcidOperation,
        txn_id: Option<u64>,
    ) -> Result<Self, LoadError> {
        Self::full(source_path, table, partition_spec, true, write_type, txn_id)
    }

    /// For non-transactional DDL.
    pub fn ddl(
        source_path: impl Into<PathBuf>,
        table: Arc<TableDesc>,
        partition_spec: PartitionSpec,
        txn_id: Option<u64>,
    ) -> Result<Self, LoadError> {
        Self::full(
            source_path,
            table,
            partition_spec,
            true,
            AcidOperation::NotAcid,
            txn_id,
        )
    }

    /// Dynamic-partition load. The context's spec, if any, seeds the
    /// partition spec; otherwise it starts empty and is filled at execution.
    pub fn dynamic(
        source_path: impl Into<PathBuf>,
        table: Arc<TableDesc>,
        dp_ctx: Option<Arc<DynamicPartitionCtx>>,
        write_type: AcidOperation,
        replace: bool,
        txn_id: Option<u64>,
    ) -> Result<Self, LoadError> {
        let mut options = LoadTableOptions::new(source_path, table)
            .write_type(write_type)
            .replace(replace)
            .txn_id(txn_id);
        options.dp_ctx = dp_ctx;
        options.build()
    }

    pub fn source_path(&self) -> &Path {
        self.load.source_path()
    }

    pub fn table(&self) -> &Arc<TableDesc> {
        &self.table
    }

    pub fn set_table(&mut self, table: Arc<TableDesc>) {
        self.table = table;
    }

    pub fn partition_spec(&self) -> &PartitionSpec {
        &self.partition_spec
    }

    pub fn partition_spec_mut(&mut self) -> &mut PartitionSpec {
        &mut self.partition_spec
    }

    pub fn set_partition_spec(&mut self, spec: PartitionSpec) {
        self.partition_spec = spec;
    }

    pub fn replace(&self) -> bool {
        self.replace
    }

    pub fn set_replace(&mut self, replace: bool) {
        self.replace = replace;
    }

    /// Reads the live table properties; never cached.
    pub fn is_mm_table(&self) -> bool {
        self.table.is_insert_only()
    }

    pub fn dp_ctx(&self) -> Option<&Arc<DynamicPartitionCtx>> {
        self.dp_ctx.as_ref()
    }

    pub fn set_dp_ctx(&mut self, ctx: Option<Arc<DynamicPartitionCtx>>) {
        self.dp_ctx = ctx;
    }

    pub fn lb_ctx(&self) -> Option<&Arc<ListBucketingCtx>> {
        self.lb_ctx.as_ref()
    }

    pub fn set_lb_ctx(&mut self, ctx: Option<Arc<ListBucketingCtx>>) {
        self.lb_ctx = ctx;
    }

    pub fn inherit_table_specs(&self) -> bool {
        self.inherit_table_specs
    }

    pub fn set_inherit_table_specs(&mut self, inherit: bool) {
        self.inherit_table_specs = inherit;
    }

    pub fn write_type(&self) -> AcidOperation {
        self.write_type
    }

    pub fn set_write_type(&mut self, write_type: AcidOperation) {
        self.write_type = write_type;
    }

    pub fn txn_id(&self) -> Option<u64> {
        self.txn_id
    }

    pub fn set_txn_id(&mut self, txn_id: Option<u64>) {
        self.txn_id = txn_id;
    }

    pub fn stmt_id(&self) -> i32 {
        self.stmt_id
    }

    pub fn set_stmt_id(&mut self, stmt_id: i32) {
        self.stmt_id = stmt_id;
    }

    pub fn mm_write_state(&self) -> MmWriteState {
        self.mm_write
    }

    pub fn mark_intermediate(&mut self) {
        self.mm_write = MmWriteState::Intermediate;
    }

    pub fn mark_committed(&mut self) {
        self.mm_write = MmWriteState::Committed;
    }

    pub fn set_intermediate_in_mm_write(&mut self, intermediate: bool) {
        if intermediate {
            self.mark_intermediate();
        } else {
            self.mark_committed();
        }
    }

    pub fn is_commit_mm_write(&self) -> bool {
        self.mm_write == MmWriteState::Committed
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a shipped descriptor, enforcing the same preconditions as `new`.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let repr: LoadTableDescRepr = serde_json::from_str(json)?;
        LoadTableDesc::try_from(repr)
    }
}
