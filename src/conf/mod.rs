mod config;
mod load;

pub use config::{Config, ENV_PREFIX};
pub use load::{ListBucketingConfig, LoadConfig, PartitionColumnConfig};
