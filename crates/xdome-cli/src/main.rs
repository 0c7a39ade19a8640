//! # xDome CLI
//!
//! Run connector operations from the command line.
//!
//! Configuration comes from the JSON file named by `XDOME_CONFIG`, or from
//! the `XDOME_*` environment variables when it is unset.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use xdome_core::Params;
use xdome_operations::{check_health, dispatch, ConnectorConfig, ConnectorError, Operation};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => print_help(),
        "operations" => {
            for op in Operation::ALL {
                println!("{op}");
            }
        }
        "health" => {
            let config = load_config()?;
            match check_health(&config).await {
                Ok(true) => println!("xDome connector available"),
                Ok(false) => {
                    eprintln!("xDome returned an empty response");
                    std::process::exit(1);
                }
                Err(err) => fail(&err),
            }
        }
        name => {
            if name.parse::<Operation>().is_err() {
                eprintln!("Unknown command: {name}");
                print_help();
                std::process::exit(1);
            }
            let params = read_params(args.get(2).map(String::as_str))?;
            let config = load_config()?;
            tracing::debug!(operation = name, params = params.len(), "Dispatching operation");

            match dispatch(&config, name, &params).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(err) => fail(&err),
            }
        }
    }

    Ok(())
}

fn load_config() -> Result<ConnectorConfig> {
    match std::env::var("XDOME_CONFIG") {
        Ok(path) => ConnectorConfig::from_file(Path::new(&path))
            .with_context(|| format!("Failed to load config from {path}")),
        Err(_) => ConnectorConfig::from_env().context("Failed to load config from environment"),
    }
}

/// Parse operation parameters from an argument, `-` for stdin, or nothing.
fn read_params(arg: Option<&str>) -> Result<Params> {
    let text = match arg {
        None => return Ok(Params::new()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read parameters from stdin")?;
            buf
        }
        Some(inline) => inline.to_string(),
    };

    match serde_json::from_str::<Value>(&text).context("Parameters must be JSON")? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => bail!("Parameters must be a JSON object, got {other}"),
    }
}

fn fail(err: &ConnectorError) -> ! {
    let rendered = serde_json::to_string(&err.detail).unwrap_or_else(|_| err.to_string());
    eprintln!("{rendered}");
    std::process::exit(1);
}

fn print_help() {
    println!(
        r#"xDome connector CLI

USAGE:
    xdome <COMMAND> [PARAMS]

COMMANDS:
    health                  Check connectivity and credentials
    operations              List available operations
    <operation> [json|-]    Run an operation with JSON parameters (- reads stdin)
    help                    Show this help message

CONFIGURATION:
    XDOME_CONFIG            Path to a JSON config file
    XDOME_SERVER_URL        Server URL (scheme optional)
    XDOME_API_KEY           API key
    XDOME_VERIFY_SSL        Verify TLS certificates (default true)
    XDOME_TIMEOUT_SECS      Request timeout in seconds (default 30)
    XDOME_UTC_TIMESTAMPS    Render epoch filters in real UTC (default false)

EXAMPLES:
    xdome get_devices '{{"device_type": "PLC, HMI", "purdue_level": ["Level 1"]}}'
    xdome get_alerts '{{"fields": {{"limit": 10}}, "before_detected_time": 1700000000}}'
    xdome execute_generic_claroty_api '{{"endpoint": "/api/v1/sites", "parameters": {{}}}}'
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_default_to_empty() {
        assert!(read_params(None).unwrap().is_empty());
        assert!(read_params(Some("null")).unwrap().is_empty());
    }

    #[test]
    fn params_parse_objects() {
        let params = read_params(Some(r#"{"limit": 3}"#)).unwrap();
        assert_eq!(params.get("limit"), Some(&json!(3)));
    }

    #[test]
    fn params_reject_non_objects() {
        assert!(read_params(Some("[1, 2]")).is_err());
        assert!(read_params(Some("not json")).is_err());
    }
}
