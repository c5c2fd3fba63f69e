use std::fs;

use tempfile::TempDir;

use tableload::conf::Config;
use tableload::plan::{AcidOperation, ExplainLevel, explain_text};

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("load.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_dynamic_insert_only_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [load]
        source = "/warehouse/.staging/-ext-10000"
        table = "db.events"
        write_type = "insert"
        txn_id = 42
        dynamic = true
        intermediate = true

        [load.properties]
        transactional = "true"
        transactional_properties = "insert_only"

        [[load.partition]]
        name = "ds"
        value = "2024-01-14"

        [[load.partition]]
        name = "hr"

        [load.list_bucketing]
        skewed_columns = ["key"]
        skewed_values = [["484"], ["238"]]
        "#,
    );

    let desc = Config::from_file(&path).unwrap().load.to_descriptor().unwrap();

    assert_eq!(desc.write_type(), AcidOperation::Insert);
    assert_eq!(desc.txn_id(), Some(42));
    assert!(desc.is_mm_table());
    assert!(!desc.is_commit_mm_write());
    assert_eq!(desc.partition_spec().to_string(), "ds=2024-01-14/hr");

    let ctx = desc.dp_ctx().unwrap();
    assert_eq!(ctx.num_dp_cols, 1);
    assert_eq!(ctx.sp_path.as_deref(), Some("ds=2024-01-14/"));
    assert!(desc.lb_ctx().unwrap().is_skewed());

    assert_eq!(
        explain_text(&desc, ExplainLevel::Extended),
        "table: db.events\npartition: ds=2024-01-14/hr\nreplace: true\nmicromanaged table: true\n"
    );
}

#[test]
fn test_static_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [load]
        source = "/tmp/stage1"
        table = "default.sales"
        replace = false

        [[load.partition]]
        name = "region"
        value = "eu"
        "#,
    );

    let desc = Config::from_file(&path).unwrap().load.to_descriptor().unwrap();
    assert!(!desc.replace());
    assert!(desc.dp_ctx().is_none());
    assert!(desc.lb_ctx().is_none());
    assert!(desc.is_commit_mm_write());
    assert_eq!(
        explain_text(&desc, ExplainLevel::User),
        "table: default.sales\n"
    );
}

#[test]
fn test_empty_source_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [load]
        source = ""
        table = "default.sales"
        "#,
    );
    let load = Config::from_file(&path).unwrap().load;
    assert!(load.to_descriptor().is_err());
}
