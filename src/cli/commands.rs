//! Command dispatch

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError, IoResultExt, ParaphraseRequest, ParaphraseResponse, ParaphraseService,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, TreeInput};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Paraphrase {
            input,
            limit,
            seed,
            compact,
        }) => _paraphrase(cli, input, *limit, *seed, *compact),
        Some(Commands::Batch { file, limit, seed }) => _batch(cli, file, *limit, *seed),
        Some(Commands::Spans { input }) => _spans(cli, input),
        Some(Commands::Show { input }) => _show(cli, input),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage("no command given, see --help".into())),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

fn read_stdin() -> CliResult<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| CliError::io("read stdin", e))?;
    Ok(buf)
}

fn read_source(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        return read_stdin();
    }
    Ok(fs::read_to_string(path).with_path_context("read tree", path)?)
}

fn read_input(input: &TreeInput) -> CliResult<String> {
    match (&input.tree, &input.file) {
        (Some(tree), _) => Ok(tree.clone()),
        (None, Some(path)) => read_source(path),
        (None, None) => read_stdin(),
    }
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> CliResult<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| {
        ApplicationError::OperationFailed {
            context: "serialize response".into(),
            source: Box::new(e),
        }
        .into()
    })
}

#[instrument(skip(cli, input))]
fn _paraphrase(
    cli: &Cli,
    input: &TreeInput,
    limit: Option<usize>,
    seed: Option<u64>,
    compact: bool,
) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    if seed.is_some() {
        settings.seed = seed;
    }
    let text = read_input(input)?;
    let service = ParaphraseService::new(&settings);
    let response = service.handle(&ParaphraseRequest::new(text, limit))?;
    output::info(&to_json(&response, compact)?);
    Ok(())
}

/// Every non-empty line is an independent request with its own RNG. All lines are
/// processed before anything is printed, so a bad line yields no partial output.
#[instrument(skip(cli))]
fn _batch(cli: &Cli, file: &Path, limit: Option<usize>, seed: Option<u64>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let base_seed = seed.or(settings.seed);
    let content = read_source(file)?;
    let service = ParaphraseService::new(&settings);

    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();
    debug!(lines = lines.len(), "batch input");

    let responses: Vec<(usize, Result<ParaphraseResponse, ApplicationError>)> = lines
        .par_iter()
        .map(|&(i, line)| {
            let request = ParaphraseRequest::new(line, limit);
            let line_seed = base_seed.map(|s| s.wrapping_add(i as u64));
            (i, service.handle_with_seed(&request, line_seed))
        })
        .collect();

    let mut out = Vec::with_capacity(responses.len());
    for (i, response) in responses {
        let response = response.map_err(|e| {
            ApplicationError::InvalidRequest(format!("line {}: {}", i + 1, e))
        })?;
        out.push(to_json(&response, true)?);
    }
    for line in out {
        output::info(&line);
    }
    Ok(())
}

#[instrument(skip(cli, input))]
fn _spans(cli: &Cli, input: &TreeInput) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let text = read_input(input)?;
    let spans = ParaphraseService::new(&settings).spans(&text)?;
    if spans.is_empty() {
        output::warning("no coordination spans found");
        return Ok(());
    }
    for span in spans {
        let variants = span
            .variants
            .map(|v| v.to_string())
            .unwrap_or_else(|| "too many".into());
        output::header(&format!("span {} ({} variants)", span.position, variants));
        output::info(&span.subtree.to_tree_string());
    }
    Ok(())
}

#[instrument(skip(cli, input))]
fn _show(cli: &Cli, input: &TreeInput) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let text = read_input(input)?;
    let tree = ParaphraseService::new(&settings).parse(&text)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::action("global", &path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
