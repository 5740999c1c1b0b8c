//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Asset pipeline CLI: filters, bundles and serves front-end assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: assetpipe.toml)
    #[arg(short = 'C', long, global = true, default_value = "assetpipe.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print source locations and filter output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Dump all assets to the filesystem
    #[command(visible_alias = "d", alias = "assetic:dump")]
    Dump {
        /// Switch debug mode off
        #[arg(long)]
        no_debug: bool,
    },

    /// Serve assets over HTTP, filtering them on request
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Switch debug mode off
        #[arg(long)]
        no_debug: bool,
    },

    /// List asset names and their URLs
    #[command(visible_alias = "l")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_alias() {
        let cli = Cli::try_parse_from(["assetpipe", "assetic:dump", "--no-debug"]).unwrap();
        assert!(matches!(cli.command, Commands::Dump { no_debug: true }));
        assert_eq!(cli.config, PathBuf::from("assetpipe.toml"));
    }

    #[test]
    fn test_serve_options() {
        let cli = Cli::try_parse_from(["assetpipe", "-v", "serve", "-p", "8080", "-C", "conf.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("conf.toml"));
        let Commands::Serve { port, interface, no_debug } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(port, Some(8080));
        assert_eq!(interface, None);
        assert!(!no_debug);
    }
}
