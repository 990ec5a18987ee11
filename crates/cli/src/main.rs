use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use accounts_cli::config::AppConfig;
use accounts_cli::{logging, serve};
use accounts_domain::IdentityDeriver;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Company accounts filing API.
#[derive(Parser)]
#[command(name = "accounts", version, about = "Company accounts filing API")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the store key of a resource under a parent
    DeriveId {
        /// Parent id, usually the company-account id
        parent_id: String,
        /// Resource name, e.g. small-full or current-period
        resource_name: String,
    },

    /// Print the effective configuration with secrets redacted
    CheckConfig {
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut config = load_config(config.as_deref());
            if let Some(port) = port {
                config.server.port = port;
            }
            logging::init(config.server.log_format);

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to create tokio runtime: {}", e);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(config)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::DeriveId {
            parent_id,
            resource_name,
        } => cmd_derive_id(&parent_id, &resource_name, cli.output),
        Commands::CheckConfig { config } => cmd_check_config(config.as_deref(), cli.output),
    }
}

fn load_config(path: Option<&Path>) -> AppConfig {
    match AppConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_derive_id(parent_id: &str, resource_name: &str, output: OutputFormat) {
    if parent_id.is_empty() || resource_name.is_empty() {
        eprintln!("error: parent id and resource name must not be empty");
        process::exit(2);
    }
    let id = IdentityDeriver::new().derive(parent_id, resource_name);
    match output {
        OutputFormat::Text => println!("{}", id),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "parent_id": parent_id,
                "resource_name": resource_name,
                "id": id,
            })
        ),
    }
}

fn cmd_check_config(path: Option<&Path>, output: OutputFormat) {
    let config = load_config(path).redacted();
    let rendered = match output {
        OutputFormat::Text => toml::to_string_pretty(&config).map_err(|e| e.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(&config).map_err(|e| e.to_string()),
    };
    match rendered {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("error: cannot render configuration: {}", e);
            process::exit(1);
        }
    }
}
