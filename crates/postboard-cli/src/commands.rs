use anyhow::Context;
use colored::Colorize;
use postboard_server::{PostboardServer, ServerConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.verbose).await,
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

/// Resolve the effective configuration: file first, then flag overrides.
pub fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    Ok(config)
}

fn init_tracing(config: &ServerConfig, verbose: bool) {
    let default = if verbose { "debug" } else { config.log_filter.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn cmd_serve(args: ServeArgs, verbose: bool) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    init_tracing(&config, verbose);
    tracing::info!(bind = %config.bind_addr, "starting postboard with in-memory stores");
    PostboardServer::in_memory(config).serve().await?;
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = ServerConfig::load(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    println!("{} {} is valid", "✓".green().bold(), args.path.display().to_string().bold());
    print!("{}", config.to_toml_string()?);
    Ok(())
}
