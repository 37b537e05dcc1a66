use clap::Parser;
use nyarlathotep::cli::{extract_cmd, Cli};
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "nyarlathotep=debug"
    } else {
        "nyarlathotep=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the record; logs always go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    extract_cmd::run(&cli).await
}
