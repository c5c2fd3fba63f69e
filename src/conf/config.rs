use std::path::Path;

use crate::{
    conf::LoadConfig,
    core::LoadError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, Environment, builder::DefaultState};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `TABLELOAD_LOAD__REPLACE=false`.
pub const ENV_PREFIX: &str = "TABLELOAD";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub load: LoadConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, LoadError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml));
        Self::build(builder)
    }

    /// Reads a TOML file, then applies `TABLELOAD_*` environment overrides.
    pub fn from_file(path: &Path) -> Result<Config, LoadError> {
        if !path.is_file() {
            return Err(LoadError::IoError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let builder = CConfig::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, LoadError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        return Ok(config);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::conf::PartitionColumnConfig;
    use crate::plan::AcidOperation;

    #[test]
    fn load_minimal_toml() {
        let toml = r#"
        [load]
        source = "/tmp/stage1"
        table = "default.sales"
        "#;
        let conf = Config::from_str(toml).unwrap();
        assert_eq!(conf.load.source, PathBuf::from("/tmp/stage1"));
        assert_eq!(conf.load.table, "default.sales");
        assert!(conf.load.replace);
        assert!(conf.load.inherit_table_specs);
        assert_eq!(conf.load.write_type, AcidOperation::NotAcid);
        assert_eq!(conf.load.txn_id, None);
        assert_eq!(conf.load.stmt_id, 0);
        assert!(conf.load.partition.is_empty());
        assert!(!conf.load.dynamic);
    }

    #[test]
    fn load_transactional_toml() {
        let toml = r#"
        [load]
        source = "/warehouse/.staging"
        table = "db.events"
        replace = false
        write_type = "insert"
        txn_id = 17
        stmt_id = 2

        [load.properties]
        transactional = "true"
        transactional_properties = "insert_only"

        [[load.partition]]
        name = "ds"
        value = "2024-01-14"

        [[load.partition]]
        name = "hr"
        "#;
        let conf = Config::from_str(toml).unwrap();
        assert_eq!(conf.load.write_type, AcidOperation::Insert);
        assert_eq!(conf.load.txn_id, Some(17));
        assert_eq!(
            conf.load.partition,
            vec![
                PartitionColumnConfig {
                    name: "ds".to_string(),
                    value: Some("2024-01-14".to_string()),
                },
                PartitionColumnConfig {
                    name: "hr".to_string(),
                    value: None,
                },
            ]
        );
    }

    #[test]
    fn reject_unknown_field() {
        let toml = r#"
        [load]
        source = "/tmp/x"
        table = "t"
        overwrite = true
        "#;
        assert!(matches!(
            Config::from_str(toml),
            Err(ConfigParsingError(_))
        ));
    }

    #[test]
    fn missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/tableload.toml")).unwrap_err();
        assert!(matches!(err, LoadError::IoError(_)));
    }
}
