use clap::Parser;
use tracing_subscriber::EnvFilter;

use skein_cli::cli;
use skein_cli::format::print_error;

fn main() {
    let cli = cli::Cli::parse();

    let config = match cli::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string(), Some("run `skein init` to write a default config"));
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level. Logs go to stderr so --json output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(cli, &config) {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
