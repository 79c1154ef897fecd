//! `clipnote` - CLI for the clipboard-to-document forwarder.
//!
//! This binary wires the clipboard source, classifier, and delivery client
//! together and provides the health-check and heading-preparation utilities.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing::info;

use clipnote::cli::{Cli, Command, ConfigCommand, HealthcheckCommand};
use clipnote::delivery::DeliveryError;
use clipnote::watcher::{Sample, SampleError, Watcher};
use clipnote::{init_logging, Classifier, Config, DeliveryClient};
use clipnote_clipboard::ClipboardSource;

/// Adapts the clipboard crate to the watcher's sampling seam.
#[derive(Debug, Default)]
struct ClipboardSampler {
    source: ClipboardSource,
}

impl Sample for ClipboardSampler {
    fn sample(&mut self) -> Result<Option<String>, SampleError> {
        self.source
            .read_text()
            .map_err(|e| SampleError(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Watch => handle_watch(cli.config).await,
        Command::Healthcheck(cmd) => handle_healthcheck(cli.config, &cmd).await,
        Command::Prepare => handle_prepare(cli.config).await,
        Command::Config(cmd) => handle_config(cli.config, cmd),
    }
}

/// Load the configuration and refuse to continue on any diagnostic.
fn load_valid_config(config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = Config::load_from(config_path)?;

    let diagnostics = config.validate();
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            eprintln!(" - {diagnostic}");
        }
        return Err(anyhow!(
            "config validation failed ({} problem(s))",
            diagnostics.len()
        ));
    }
    Ok(config)
}

async fn handle_watch(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_valid_config(config_path)?;

    let client = DeliveryClient::new(&config.endpoint_url, config.delivery_timeout())?;
    let classifier = Classifier::new(config.unknown_tag_policy, config.tag_map.clone());
    let mut watcher = Watcher::new(
        ClipboardSampler::default(),
        classifier,
        config.poll_interval(),
    );

    let handle = watcher.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            handle.stop();
        }
    });

    info!("clipboard watcher started");
    if let Some(doc_url) = &config.doc_url {
        info!(doc = %doc_url, "target document");
    }

    watcher.run(&client, &config.sender).await;
    Ok(())
}

async fn handle_healthcheck(
    config_path: Option<PathBuf>,
    cmd: &HealthcheckCommand,
) -> anyhow::Result<()> {
    println!("[healthcheck] loading config...");
    let config = Config::load_from(config_path)?;

    let diagnostics = config.validate();
    if !diagnostics.is_empty() {
        println!("[fail] config validation failed:");
        for diagnostic in &diagnostics {
            println!(" - {diagnostic}");
        }
        return Err(anyhow!("config validation failed"));
    }
    println!("[pass] config validation");

    if !cmd.probe {
        println!("[info] skipping network probe (run with --probe to verify endpoint access)");
        return Ok(());
    }

    println!("[healthcheck] posting probe to {}", config.endpoint_url);
    match clipnote::healthcheck::probe(&config).await {
        Ok(payload) => {
            println!(
                "[pass] endpoint POST succeeded; probe sent to section '{}'",
                payload.section
            );
            Ok(())
        }
        Err(e) => Err(anyhow!("endpoint POST failed: {e}")),
    }
}

async fn handle_prepare(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load_from(config_path)?;
    let sections = clipnote::headings::section_titles(&config.tag_map)?;

    println!("[prepare] ensuring these headings exist:");
    for section in &sections {
        println!(" - {section}");
    }

    let client = DeliveryClient::new(&config.endpoint_url, config.delivery_timeout())?;
    match client.ensure_sections(&sections).await {
        Ok(()) => {
            println!("[pass] headings ensured successfully");
            Ok(())
        }
        Err(DeliveryError::Rejected { body, .. })
            if body.contains(clipnote::headings::OUTDATED_DEPLOYMENT_MARKER) =>
        {
            Err(anyhow!(
                "endpoint deployment is outdated for ensure_sections; redeploy the latest script and retry"
            ))
        }
        Err(e) => Err(anyhow!("could not ensure headings: {e}")),
    }
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("Endpoint:      {}", config.endpoint_url);
                if let Some(doc_url) = &config.doc_url {
                    println!("Document:      {doc_url}");
                }
                println!("Sender:        {}", config.sender);
                println!("Poll interval: {}s", config.poll_interval_seconds);
                println!("Unknown tags:  {}", config.unknown_tag_policy);
                println!();
                println!("[Tags]");
                for (tag, section) in &config.tag_map {
                    println!("  {tag:<12} -> {section}");
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.or(config_path);
            match Config::load_from(path) {
                Ok(config) => {
                    let diagnostics = config.validate();
                    if !diagnostics.is_empty() {
                        for diagnostic in &diagnostics {
                            println!(" - {diagnostic}");
                        }
                        return Err(anyhow!(
                            "config validation failed ({} problem(s))",
                            diagnostics.len()
                        ));
                    }
                    println!("Configuration is valid.");
                }
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}
