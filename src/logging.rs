/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`, and bridge `log::` macros into tracing. Returns
/// false when a global subscriber is already installed (tests and
/// embedding callers may race to set one; the first wins).
pub fn init_tracing(default_filter: &str) -> bool {
    let _ = tracing_log::LogTracer::init();
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// [`init_tracing`] at the info level the batch runs use.
pub fn init_tracing_from_env() -> bool {
    init_tracing("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_rejected() {
        init_tracing("debug");
        // Whoever won the first install, a repeat attempt must not
        // replace the live subscriber
        assert!(!init_tracing("debug"));
        assert!(!init_tracing_from_env());
        // Library logging still flows without panicking
        log::info!("subscriber install checked");
    }
}
