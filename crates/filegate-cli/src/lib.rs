/// Turn a reputation portal secret into a base URL.
///
/// The secret usually holds a bare hostname; an explicit scheme is kept as-is.
pub fn portal_base_url(portal: &str) -> String {
    let portal = portal.trim().trim_end_matches('/');
    if portal.starts_with("http://") || portal.starts_with("https://") {
        portal.to_string()
    } else {
        format!("https://{}", portal)
    }
}


/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
