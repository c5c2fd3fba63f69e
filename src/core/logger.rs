use env_logger::Env;

pub fn setup_logging() {
    // Repeated initialisation (tests, embedding binaries) keeps the first logger.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
