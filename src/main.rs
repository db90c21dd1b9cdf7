use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(
            // The may_minihttp fork filters client disconnects itself;
            // warn+ is enough for actual issues.
            "may_minihttp::http_server=warn"
                .parse()
                .expect("valid directive"),
        );

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let json = std::env::var("TRELLIS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    trellis::cli::run_cli()
}
