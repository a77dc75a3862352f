use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use mylua::annotation;
use mylua::errors::ParseError;
use mylua::options::{ParserOptions, DEFAULT_MAX_ERRORS};
use mylua::source::LuaSource;
use mylua::ParseOutput;
use std::fs;
use tracing::{debug, info_span};

pub mod logging;

const VERSION: &'static str = env!("CARGO_PKG_VERSION");

pub struct Config {
    pub source_path: String,

    /// What to do with the parsed file.
    pub target: Target,

    pub max_errors: usize,

    /// A flag for integration tests: this allows to better capture output. There is
    /// no way to set it through command-line.
    pub plaintext_errors: bool,

    pub verbose: bool,
}

/// Expected result of running the tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    /// Only report syntax errors.
    Check,

    /// Print the syntax tree as an s-expression.
    Ast,

    /// Print comment blocks along with the tokens of their annotations.
    Comments,
}

impl Config {
    pub fn new() -> Config {
        let source = || {
            Arg::with_name("SOURCE")
                .help("Path to the Lua source file")
                .required(true)
                .index(1)
        };

        let matches = App::new("mylua")
            .version(VERSION)
            .about("Syntax checker and inspection tools for Lua 5.4")
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(
                Arg::with_name("max-errors")
                    .long("--max-errors")
                    .takes_value(true)
                    .help("Number of errors after which parsing is aborted")
                    .global(true),
            )
            .arg(
                Arg::with_name("verbose")
                    .short("v")
                    .long("--verbose")
                    .help("Log parser activity to stderr")
                    .global(true),
            )
            .subcommand(
                SubCommand::with_name("check")
                    .about("Reports syntax errors in the file")
                    .arg(source()),
            )
            .subcommand(
                SubCommand::with_name("tools")
                    .about("Various tools most useful for developers of Lua tooling")
                    .subcommand(
                        SubCommand::with_name("ast")
                            .about("Displays the syntax tree obtained from the parser")
                            .arg(source()),
                    )
                    .subcommand(
                        SubCommand::with_name("comments")
                            .about("Displays comment blocks and annotation tokens")
                            .arg(source()),
                    ),
            )
            .get_matches();

        let config_from_leaf_matches = |matches: &ArgMatches, target| Config {
            source_path: matches.value_of("SOURCE").unwrap().to_string(),
            target,
            max_errors: matches
                .value_of("max-errors")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_MAX_ERRORS),
            plaintext_errors: false,
            verbose: matches.is_present("verbose"),
        };

        match matches.subcommand() {
            ("check", Some(matches)) => config_from_leaf_matches(matches, Target::Check),
            ("tools", Some(matches)) => match matches.subcommand() {
                ("ast", Some(matches)) => config_from_leaf_matches(matches, Target::Ast),
                ("comments", Some(matches)) => {
                    config_from_leaf_matches(matches, Target::Comments)
                }
                _ => unreachable!(),
            },
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum RunResult {
    Ok,
    SyntaxError,
    IoError,
}

/// Parses the file and performs the requested action.
pub fn run(config: Config) -> RunResult {
    let span = info_span!("run", path = config.source_path.as_str());
    let _enter = span.enter();

    let chunk = match fs::read(&config.source_path) {
        Ok(chunk) => chunk,
        Err(error) => {
            eprintln!("Error while reading the source file:\n{}", error);
            return RunResult::IoError;
        }
    };

    let options = ParserOptions {
        max_errors: config.max_errors,
    };
    let output = mylua::parse_source_with_options(&chunk, &config.source_path, options);
    debug!(errors = output.errors.len(), "parse finished");

    match config.target {
        Target::Check => {}
        Target::Ast => {
            if let Some(ref chunk) = output.chunk {
                println!("{}", chunk.to_sexp().pretty_print(100));
            }
        }
        Target::Comments => print_comments(&output),
    }

    if output.errors.is_empty() {
        RunResult::Ok
    } else {
        report_parse_errors(&output.source, &output.errors, config.plaintext_errors);
        RunResult::SyntaxError
    }
}

fn print_comments(output: &ParseOutput) {
    for (last_line, block) in output.comments.iter() {
        println!("lines {}-{}:", block.first_line() + 1, last_line + 1);
        for line in &block.lines {
            match annotation::tokenize_comment(line) {
                Some(tokens) => {
                    let tokens: Vec<String> = tokens
                        .iter()
                        .map(|token| format!("{}[{}]", token.text, token.location))
                        .collect();
                    println!("  @ {}", tokens.join(" "));
                }
                None => println!("  {}", line.text),
            }
        }
    }
}

fn report_parse_errors(source: &LuaSource, errors: &[ParseError], plaintext_stdout: bool) {
    if !plaintext_stdout {
        let mut files = SimpleFiles::new();
        let file_id = files.add(source.name(), source.text());

        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();

        for error in errors {
            let result = codespan_reporting::term::emit(
                &mut writer.lock(),
                &config,
                &files,
                &error.to_codespan(file_id, source),
            );
            if let Err(emit_error) = result {
                eprintln!("{}", error);
                debug!(%emit_error, "could not render diagnostic");
            }
        }
    } else {
        for error in errors {
            println!("{}", error);
        }
    }
}
