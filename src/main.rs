use arka::cli::{self, Commands};
use arka::config::env::load_dotenv;
use arka::errors::ReportError;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    load_dotenv();
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, 0) => "warn",
        (_, 0) => "info",
        (_, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => cli::generate::handle_generate(args, config, cli.quiet).await,
        Commands::Export(args) => cli::export::handle_export(args, config, cli.quiet).await,
        Commands::Serve(args) => cli::serve::handle_serve(args, config).await,
        Commands::Validate(args) => cli::handle_validate(args).await,
    };

    if let Err(e) = result {
        let message = if e.is_local() { e.to_string() } else { e.classify().message };
        eprintln!("{} {}", style("Error:").red().bold(), message);
        let exit_code = match &e {
            ReportError::Config(_) => 2,
            ReportError::Export { .. } => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
