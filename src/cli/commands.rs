//! Subcommand dispatch

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::Session;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.verbose {
        settings.verbose = true;
    }
    debug!(?settings, "settings loaded");

    match &cli.command {
        None | Some(Commands::Shell) => run_shell(settings),
        Some(Commands::Run { script }) => run_script(settings, script),
        Some(Commands::Config { command }) => run_config(command, &settings, cli.config.as_deref()),
        Some(Commands::Completion { .. }) => Ok(()),
    }
}

#[instrument(skip(settings))]
fn run_shell(settings: Settings) -> CliResult<()> {
    let mut container = ServiceContainer::new(settings);
    let mut session = Session::new(&mut container, io::stdout().lock());
    session.interact(io::stdin().lock())?;
    Ok(())
}

#[instrument(skip(settings))]
fn run_script(settings: Settings, script: &Path) -> CliResult<()> {
    if !script.is_file() {
        return Err(CliError::InvalidArgs(format!(
            "script not found: {}",
            script.display()
        )));
    }
    let file = File::open(script)
        .map_err(|e| InfraError::io(format!("open {}", script.display()), e))?;

    let mut container = ServiceContainer::new(settings);
    let mut session = Session::new(&mut container, io::stdout().lock());
    session.replay(BufReader::new(file))?;
    Ok(())
}

fn run_config(command: &ConfigCommands, settings: &Settings, explicit: Option<&Path>) -> CliResult<()> {
    let mut out = io::stdout().lock();
    let written = match command {
        ConfigCommands::Show => output::info(&mut out, &settings.to_toml()?),
        ConfigCommands::Template => output::info(&mut out, &Settings::template()),
        ConfigCommands::Path => write_config_paths(&mut out, explicit),
    };
    written.map_err(|e| InfraError::io("write config output", e))?;
    Ok(())
}

fn write_config_paths(out: &mut impl Write, explicit: Option<&Path>) -> io::Result<()> {
    let global = global_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no config directory)".into());
    output::header(out, "Config files")?;
    output::detail(out, &format!("global:   {global}"))?;
    if let Some(path) = explicit {
        output::detail(out, &format!("explicit: {}", path.display()))?;
    }
    Ok(())
}
