use tracing_subscriber::EnvFilter;

/// Human output on a terminal, JSON lines otherwise. Always stderr: stdout belongs
/// to the popup renderer.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if atty::is(atty::Stream::Stdout) {
        builder.init();
    } else {
        builder.json().init();
    }
}
