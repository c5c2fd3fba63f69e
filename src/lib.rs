pub mod conf;
pub mod core;
pub mod plan;
