//! rpcbench - batch-based JSON-RPC endpoint latency benchmark
//!
//! Probes every endpoint of a category in synchronized batches, drops the
//! warm-up batch and reports per-endpoint averages with the slowest and
//! fastest endpoint.

use clap::Parser;
use rpc_latency_bench::{
    app::App,
    cli::Cli,
    config::{load_config, EnvManager},
    error::{AppError, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();
    let detailed = cli.verbose || cli.debug;

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_color));
        if detailed {
            eprintln!();
            eprintln!("{}", e.user_friendly_message());
        }
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;
    let selection = cli.category_selection()?;

    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("Debug mode enabled");
    }

    let config = load_config(cli)?;
    let mut app = App::new(config)?;
    app.run(selection).await
}

/// Print follow-up hints for errors a user can fix
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Batches must be between 2 and 100, timeout between 1 and 60000 ms");
            eprintln!("  - Remote catalogs must use http:// or https://");
            eprintln!();
            eprint!("{}", EnvManager::display_env_help());
        }
        AppError::CatalogLoad(_) => {
            eprintln!();
            eprintln!("Catalog help:");
            eprintln!("  - Point --catalog at a JSON array of records with rpcn, type, network and address");
            eprintln!("  - For a remote catalog, check that the URL answers with HTTP 200");
        }
        AppError::Validation(_) => {
            eprintln!();
            eprintln!("Usage: rpcbench [centralized|distributed|secured|all] [OPTIONS]");
        }
        _ => {}
    }
}
