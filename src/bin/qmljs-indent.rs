//! Command-line interface for qmljs-indent
//! Re-indents QML and JavaScript files, or shows what the engine sees.
//!
//! Usage:
//!   qmljs-indent reindent `<path>` [--write]   - Print (or write back) the re-indented file
//!   qmljs-indent check `<path>`                - Exit with status 1 if any line would change
//!   qmljs-indent states `<path>`               - Dump per-line indent and end states as JSON
//!
//! Every subcommand accepts --config `<file>`, --tab-size `<n>` and --indent-size `<n>`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use qmljs_indent::{
    BlockStore, IndentConfig, IndentError, Indenter, LexerState, Loader, StateTag, TextBuffer,
};
use serde::Serialize;
use std::path::Path;

fn main() {
    let matches = Command::new("qmljs-indent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Incremental auto-indentation for QML and JavaScript")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_config_args(Command::new("reindent").about("Re-indent a file")).arg(
                Arg::new("write")
                    .long("write")
                    .short('w')
                    .help("Write the result back instead of printing it")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(with_config_args(
            Command::new("check").about("Check whether a file is correctly indented"),
        ))
        .subcommand(with_config_args(
            Command::new("states").about("Print per-line indentation and automaton states"),
        ))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("reindent", sub)) => handle_reindent_command(sub),
        Some(("check", sub)) => handle_check_command(sub),
        Some(("states", sub)) => handle_states_command(sub),
        _ => unreachable!(),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn with_config_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("path")
                .help("Path to the QML or JavaScript file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("tab-size")
                .long("tab-size")
                .help("Width of a tab character")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("indent-size")
                .long("indent-size")
                .help("Columns per indentation level")
                .value_parser(clap::value_parser!(u32)),
        )
}

fn load_config(matches: &ArgMatches) -> Result<IndentConfig, IndentError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(&tab_size) = matches.get_one::<u32>("tab-size") {
        loader = loader.set_override("formatting.tab_size", i64::from(tab_size))?;
    }
    if let Some(&indent_size) = matches.get_one::<u32>("indent-size") {
        loader = loader.set_override("formatting.indent_size", i64::from(indent_size))?;
    }
    loader.build()
}

/// Read the file and the configuration for a subcommand.
fn prepare(matches: &ArgMatches) -> Result<(String, String, Indenter), IndentError> {
    let path = matches
        .get_one::<String>("path")
        .cloned()
        .ok_or_else(|| IndentError::InvalidSetting("a file path is required".to_string()))?;
    let config = load_config(matches)?;
    let source = std::fs::read_to_string(&path).map_err(|e| IndentError::io(&path, e))?;
    Ok((path, source, Indenter::new(&config)))
}

/// Handle the reindent command
fn handle_reindent_command(matches: &ArgMatches) -> Result<i32, IndentError> {
    let (path, source, mut indenter) = prepare(matches)?;
    let output = indenter.reindent_text(&source);
    if matches.get_flag("write") {
        if output != source {
            std::fs::write(&path, &output).map_err(|e| IndentError::io(&path, e))?;
        }
    } else {
        print!("{}", output);
    }
    Ok(0)
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) -> Result<i32, IndentError> {
    let (path, source, mut indenter) = prepare(matches)?;
    let mut buffer = TextBuffer::from_text(&source);
    let changed = indenter.reindent(&mut buffer);
    if changed == 0 {
        return Ok(0);
    }
    eprintln!(
        "{}: {} line(s) not correctly indented",
        Path::new(&path).display(),
        changed
    );
    Ok(1)
}

#[derive(Debug, Serialize)]
struct LineReport {
    line: usize,
    indent: i32,
    end_state: Vec<StateTag>,
    lexer_state: Option<LexerState>,
}

/// Handle the states command
fn handle_states_command(matches: &ArgMatches) -> Result<i32, IndentError> {
    let (_, source, mut indenter) = prepare(matches)?;
    let mut buffer = TextBuffer::from_text(&source);
    let lines: Vec<_> = buffer.lines().collect();

    let mut reports = Vec::with_capacity(lines.len());
    for (index, &line) in lines.iter().enumerate() {
        let indent = indenter.indent_line(&mut buffer, line);
        indenter
            .formatter_mut()
            .update_state_until(&mut buffer, line);
        let end_state = buffer
            .load_block_data(line)
            .map(|data| data.end_state.tags())
            .unwrap_or_default();
        reports.push(LineReport {
            line: index + 1,
            indent,
            end_state,
            lexer_state: buffer.load_lexer_state(line),
        });
    }

    let json = serde_json::to_string_pretty(&reports)?;
    println!("{}", json);
    Ok(0)
}
