use clap::Parser;
use colored::*;
use stimattrs::commands::config::ConfigAction;
use stimattrs::commands::render::OutputFormat;
use stimattrs::commands::{check, config, render, CmdMessage, CmdResult, MessageLevel};
use stimattrs::config::StimattrsConfig;
use stimattrs::error::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands, Format};

const LOG_ENV: &str = "STIMATTRS_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "stimattrs=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match cli.command {
        Commands::Render { manifest, format } => handle_render(&config_dir, &manifest, format),
        Commands::Check { manifest } => handle_check(&config_dir, &manifest),
        Commands::Config { key, value } => handle_config(&config_dir, key, value),
    }
}

fn handle_render(config_dir: &Path, manifest: &Path, format: Format) -> Result<()> {
    let config = StimattrsConfig::load(config_dir)?;
    let format = match format {
        Format::Html => OutputFormat::Html,
        Format::Json => OutputFormat::Json,
    };

    let result = render::run(manifest, &config, format)?;
    if let Some(rendered) = &result.rendered {
        println!("{}", rendered);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_check(config_dir: &Path, manifest: &Path) -> Result<()> {
    let config = StimattrsConfig::load(config_dir)?;
    let result = check::run(manifest, &config)?;
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

fn handle_config(config_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = config::run(config_dir, action)?;
    if let (Some(config), true) = (&result.config, result.messages.is_empty()) {
        for key in StimattrsConfig::keys() {
            let value = config.get(key).unwrap_or_default();
            println!("{}: {}", key.bold(), value);
        }
    }
    print_messages(&result.messages);
    exit_on_errors(&result);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

fn exit_on_errors(result: &CmdResult) {
    if result
        .messages
        .iter()
        .any(|m| m.level == MessageLevel::Error)
    {
        std::process::exit(1);
    }
}
