use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::LoadError;

/// Transactional classification of a table mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcidOperation {
    #[default]
    NotAcid,
    Insert,
    Update,
    Delete,
}

impl AcidOperation {
    pub fn is_acid(&self) -> bool {
        !matches!(self, AcidOperation::NotAcid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AcidOperation::NotAcid => "not_acid",
            AcidOperation::Insert => "insert",
            AcidOperation::Update => "update",
            AcidOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for AcidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AcidOperation {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "not_acid" => Ok(AcidOperation::NotAcid),
            "insert" => Ok(AcidOperation::Insert),
            "update" => Ok(AcidOperation::Update),
            "delete" => Ok(AcidOperation::Delete),
            other => Err(LoadError::ConfigParsingError(format!(
                "unknown write type '{other}'"
            ))),
        }
    }
}
