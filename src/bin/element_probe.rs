//! Element command probe
//!
//! Runs one element command against a scripted scenario and prints the result
//! together with the protocol calls it issued. Useful for checking how a
//! command behaves for a given set of session capabilities.

use anyhow::Context;
use clap::Parser;
use element_commands::Session;
use element_commands::scripted::{Scenario, ScriptedBackend};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "element-probe")]
#[command(version)]
#[command(about = "Run an element command against a scripted scenario", long_about = None)]
struct Cli {
    /// Scenario JSON file (settings, capabilities, elements, responses)
    #[arg(long, short = 's', value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Command to run
    #[arg(long, short = 'c', default_value = "is_visible")]
    command: String,

    /// List the registered commands and exit
    #[arg(long)]
    list: bool,

    /// Command arguments; each is parsed as JSON, anything else is taken as a string
    args: Vec<String>,
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list {
        let session = Session::with_backend(Default::default(), Arc::new(ScriptedBackend::new()));
        for name in session.command_registry().names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let path = cli.scenario.context("--scenario is required unless --list is given")?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario: Scenario =
        serde_json::from_str(&raw).with_context(|| format!("Invalid scenario {}", path.display()))?;

    let backend = Arc::new(ScriptedBackend::from_scenario(&scenario));
    let mut session = Session::with_backend(scenario.settings.clone(), backend.clone());
    if let Some(capabilities) = &scenario.capabilities {
        session.establish(capabilities);
    }

    let args: Vec<Value> = cli.args.iter().map(|arg| parse_arg(arg)).collect();
    eprintln!("Command: {} {}", cli.command, Value::Array(args.clone()));

    let outcome = session.execute_command(&cli.command, &args).await;

    for (action, action_args) in backend.calls() {
        eprintln!("Protocol action: {} {}", action, Value::Array(action_args));
    }

    let result = outcome?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
