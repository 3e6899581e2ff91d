// CLI module - command-line argument parsing and handlers
//
// Provides subcommands for configuration management:
// - config --show: Display effective configuration
// - config --path: Print the config file location
// - config --reset: Regenerate config file with defaults
//
// Top-level flags pick the message feed: --replay <file> or --demo.

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// chatterm - terminal chat viewer
#[derive(Parser, Debug)]
#[command(name = "chatterm")]
#[command(version = VERSION)]
#[command(about = "Terminal chat viewer with threads and short channel ids", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Replay a JSON Lines transcript instead of connecting to a feed
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Run the scripted demo conversation
    #[arg(long)]
    pub demo: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    /// Flags win over env vars and the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.replay {
            config.replay = Some(path.clone());
        }
        if self.demo {
            config.demo_mode = true;
        }
    }
}

/// Handle CLI subcommands. Returns true if a command was handled (exit after).
pub fn handle_cli(cli: &Cli) -> bool {
    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else {
                // No flag provided, show help
                println!("Usage: chatterm config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            true
        }
        None => false, // No subcommand, run the viewer
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());
    println!();
    println!("# Runtime (env only)");
    println!("# tui = {}", config.enable_tui);
    println!("# demo = {}", config.demo_mode);
    if let Some(replay) = &config.replay {
        println!("# replay = {:?}", replay.display().to_string());
    }

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    // Write the default config (using Config's single source of truth)
    if let Err(e) = Config::default().save() {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_flags_override_config() {
        let cli = Cli::parse_from(["chatterm", "--replay", "log.jsonl", "--demo"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.replay, Some(PathBuf::from("log.jsonl")));
        assert!(config.demo_mode);
        assert!(!handle_cli(&cli));
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = Cli::parse_from(["chatterm", "config", "--path"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                path: true,
                show: false,
                reset: false
            })
        ));
    }
}
