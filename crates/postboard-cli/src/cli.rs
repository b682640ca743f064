use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "postboard",
    about = "Posts and comments over a REST resource API",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Parse a configuration file and print the effective settings
    CheckConfig(CheckConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind, overriding the configuration file
    #[arg(long)]
    pub bind: Option<String>,
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["postboard", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
            assert!(args.config.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "postboard", "serve", "--bind", "0.0.0.0:8080", "--config", "postboard.toml",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
            assert_eq!(args.config, Some(PathBuf::from("postboard.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_check_config() {
        let cli = Cli::try_parse_from(["postboard", "check-config", "a.toml"]).unwrap();
        if let Command::CheckConfig(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("a.toml"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn check_config_requires_path() {
        assert!(Cli::try_parse_from(["postboard", "check-config"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["postboard", "--verbose", "serve"]).unwrap();
        assert!(cli.verbose);
    }
}
