//! fax-gateway: Fax.Plus tool gateway binary
//!
//! Exposes the fax tools to agent frameworks from the command line.
//!
//! Usage:
//!   fax-gateway --list               - Print tool definitions as JSON
//!   fax-gateway <tool> '<json>'      - Invoke a tool with a JSON argument
//!   fax-gateway --help               - Show help

use fax_core::{Config, ToolManager};
use fax_plus::register_fax_tools;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Print tool definitions
    List,
    /// Invoke a single tool
    Invoke { tool: String, input: String },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = parse_args(&args)?;

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("fax-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    tracing::debug!(account = %config.faxplus.account_id, base_url = %config.faxplus.base_url, "Configuration loaded");

    let mut manager = ToolManager::new();
    register_fax_tools(&mut manager, &config.faxplus)
        .map_err(|e| anyhow::anyhow!("Failed to register fax tools: {}", e))?;
    tracing::info!("Registered {} tools", manager.len());

    match mode {
        RunMode::List => {
            println!("{}", serde_json::to_string_pretty(&manager.definitions())?);
        }
        RunMode::Invoke { tool, input } => {
            let result = manager
                .execute_str(&tool, &input)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("{}", result.output);
        }
        _ => {}
    }

    Ok(())
}

/// Parse command line arguments (program name excluded)
fn parse_args(args: &[String]) -> anyhow::Result<RunMode> {
    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => Ok(RunMode::Help),
        Some("--version") | Some("-v") => Ok(RunMode::Version),
        Some("--list") | Some("-l") => Ok(RunMode::List),
        Some(tool) if tool.starts_with('-') => anyhow::bail!("Unknown option: {}", tool),
        Some(tool) => Ok(RunMode::Invoke {
            tool: tool.to_string(),
            input: args.get(1).cloned().unwrap_or_else(|| "{}".to_string()),
        }),
    }
}

/// Print help message
fn print_help() {
    println!("fax-gateway - Fax.Plus tools for agent frameworks");
    println!();
    println!("Usage:");
    println!("  fax-gateway --list              Print tool definitions as JSON");
    println!("  fax-gateway <tool> '<json>'     Invoke a tool (faxplus, faxplus_status, faxplus_history)");
    println!("  fax-gateway --help              Show this help message");
    println!("  fax-gateway --version           Show version");
    println!();
    println!("Environment Variables:");
    println!("  FAXPLUS_API_KEY           Fax.Plus personal access token (required)");
    println!("  FAXPLUS_ACCOUNT_ID        Account ID, e.g. 'self' (required)");
    println!("  FAXPLUS_BASE_URL          API endpoint (default: https://restapi.fax.plus/v3)");
    println!("  FAXPLUS_TIMEOUT_SECS      HTTP timeout (default: none)");
    println!("  FAXPLUS_MAX_FILE_SIZE_MB  Largest document accepted (default: 20)");
    println!();
    println!("Settings may also be placed in ./fax-gateway.toml under [faxplus].");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_modes() {
        assert_eq!(parse_args(&args(&[])).unwrap(), RunMode::Help);
        assert_eq!(parse_args(&args(&["-v"])).unwrap(), RunMode::Version);
        assert_eq!(parse_args(&args(&["--list"])).unwrap(), RunMode::List);
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_parse_args_invoke() {
        let mode = parse_args(&args(&["faxplus_status", r#"{"fax_id":"123"}"#])).unwrap();
        assert_eq!(
            mode,
            RunMode::Invoke {
                tool: "faxplus_status".to_string(),
                input: r#"{"fax_id":"123"}"#.to_string(),
            }
        );

        // 引数省略時は空オブジェクト
        let mode = parse_args(&args(&["faxplus_history"])).unwrap();
        assert_eq!(
            mode,
            RunMode::Invoke {
                tool: "faxplus_history".to_string(),
                input: "{}".to_string(),
            }
        );
    }
}
