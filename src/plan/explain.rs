use std::fmt::Write;

use clap::ValueEnum;

use crate::plan::load::LoadTableDesc;

/// Verbosity of plan explain output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExplainLevel {
    User,
    #[default]
    Default,
    Extended,
}

struct ExplainField {
    name: &'static str,
    levels: &'static [ExplainLevel],
}

const ALL_LEVELS: &[ExplainLevel] = &[
    ExplainLevel::User,
    ExplainLevel::Default,
    ExplainLevel::Extended,
];
const PLAN_LEVELS: &[ExplainLevel] = &[ExplainLevel::Default, ExplainLevel::Extended];

const TABLE: ExplainField = ExplainField {
    name: "table",
    levels: ALL_LEVELS,
};
const PARTITION: ExplainField = ExplainField {
    name: "partition",
    levels: PLAN_LEVELS,
};
const REPLACE: ExplainField = ExplainField {
    name: "replace",
    levels: PLAN_LEVELS,
};
const MM_TABLE: ExplainField = ExplainField {
    name: "micromanaged table",
    levels: PLAN_LEVELS,
};

/// Explain-visible fields of the descriptor at `level`, in display order.
///
/// Empty partition specs and non-insert-only tables contribute nothing.
pub fn explain_fields(desc: &LoadTableDesc, level: ExplainLevel) -> Vec<(&'static str, String)> {
    let candidates = [
        (TABLE, Some(desc.table().name().to_string())),
        (
            PARTITION,
            (!desc.partition_spec().is_empty()).then(|| desc.partition_spec().to_string()),
        ),
        (REPLACE, Some(desc.replace().to_string())),
        (MM_TABLE, desc.is_mm_table().then(|| "true".to_string())),
    ];

    candidates
        .into_iter()
        .filter(|(field, _)| field.levels.contains(&level))
        .filter_map(|(field, value)| value.map(|v| (field.name, v)))
        .collect()
}

pub fn explain_text(desc: &LoadTableDesc, level: ExplainLevel) -> String {
    let mut out = String::new();
    for (name, value) in explain_fields(desc, level) {
        let _ = writeln!(out, "{name}: {value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::plan::table::{INSERT_ONLY, TABLE_TRANSACTIONAL_PROPERTIES, TableDesc};
    use crate::plan::{LoadTableOptions, PartitionSpec};

    fn desc() -> LoadTableDesc {
        let spec: PartitionSpec = [("ds", Some("2024-01-14".to_string())), ("hr", None)]
            .into_iter()
            .collect();
        LoadTableOptions::new("/tmp/stage1", Arc::new(TableDesc::new("default.clicks")))
            .partition_spec(spec)
            .replace(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_level_shows_table_only() {
        let fields = explain_fields(&desc(), ExplainLevel::User);
        assert_eq!(fields, vec![("table", "default.clicks".to_string())]);
    }

    #[test]
    fn test_default_level() {
        let text = explain_text(&desc(), ExplainLevel::Default);
        assert_eq!(
            text,
            "table: default.clicks\npartition: ds=2024-01-14/hr\nreplace: false\n"
        );
    }

    #[test]
    fn test_empty_partition_spec_omitted() {
        let d = LoadTableDesc::ddl(
            "/tmp/stage1",
            Arc::new(TableDesc::new("default.clicks")),
            PartitionSpec::new(),
            None,
        )
        .unwrap();
        for level in [ExplainLevel::Default, ExplainLevel::Extended] {
            let fields = explain_fields(&d, level);
            assert!(!fields.iter().any(|(name, _)| *name == "partition"));
            assert_eq!(
                fields,
                vec![
                    ("table", "default.clicks".to_string()),
                    ("replace", "true".to_string()),
                ]
            );
        }
    }

    #[test]
    fn test_mm_flag_only_when_insert_only() {
        let d = desc();
        d.table().set_property(TABLE_TRANSACTIONAL_PROPERTIES, INSERT_ONLY);
        let fields = explain_fields(&d, ExplainLevel::Extended);
        assert_eq!(fields.last(), Some(&("micromanaged table", "true".to_string())));
        assert!(
            !explain_fields(&d, ExplainLevel::User)
                .iter()
                .any(|(name, _)| *name == "micromanaged table")
        );
    }
}
