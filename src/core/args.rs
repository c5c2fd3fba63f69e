use clap::Parser;
use log::kv::{ToValue, Value};

use crate::plan::ExplainLevel;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,
    #[arg(short, long, value_enum, default_value_t = ExplainLevel::Default)]
    pub level: ExplainLevel,
    /// Print the descriptor as JSON instead of explain text.
    #[arg(long)]
    pub json: bool,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
