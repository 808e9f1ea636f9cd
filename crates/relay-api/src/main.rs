//! chat-relay entry point.
//!
//! Binary name: `chat-relay`
//!
//! Loads `.env`, parses CLI arguments, then either prints shell completions
//! or starts the HTTP relay.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use relay_infra::config::{API_KEY_VAR, RelayConfig, load_dotenv};
use relay_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `.env` values also feed the clap env fallbacks.
    let dotenv_path = load_dotenv();

    let cli = Cli::parse();
    let filter = cli.log_filter();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "chat-relay", &mut std::io::stdout());
        }

        Commands::Serve { host, port, .. } => {
            init_tracing(filter, cli.otel).context("failed to initialize tracing")?;
            if let Some(path) = dotenv_path {
                tracing::debug!(path = %path.display(), "loaded environment file");
            }

            let result = serve(&host, port).await;
            shutdown_tracing();
            result?;
        }
    }

    Ok(())
}

/// Resolve configuration, bind, and serve until Ctrl+C or SIGTERM.
async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    let config = RelayConfig::from_env();
    print_credential_status(&config);

    let state = AppState::from_config(&config);
    let router = http::router::build_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        model = %config.model,
        base_url = %config.base_url,
        origins = ?config.allowed_origins,
        "chat-relay listening"
    );
    println!(
        "  {} chat-relay listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{local_addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Tell the operator whether the upstream credential was found.
fn print_credential_status(config: &RelayConfig) {
    println!();
    if config.has_api_key() {
        println!("  {} OpenAI API key found", console::style("✓").green());
    } else {
        tracing::warn!("{API_KEY_VAR} is not set; /chat and /generate-title will answer 500");
        println!(
            "  {} {} not found in environment variables",
            console::style("⚠").yellow().bold(),
            API_KEY_VAR
        );
        println!("    Create a .env file with your OpenAI API key:");
        println!("    {}", console::style(format!("{API_KEY_VAR}=your_api_key_here")).dim());
    }
    println!();
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining in-flight requests");
}
