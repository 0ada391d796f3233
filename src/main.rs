//! minijson CLI.
//!
//! Tokenizes, parses and queries JSON files, and runs conformance corpora.
//! Failures print the error on stderr and exit with the error's numeric code.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minijson::json::{parse_file, Lexer, Limits, Token};
use minijson::{CorpusRunner, ErrorCode, JsonResult};

#[derive(Parser)]
#[command(name = "minijson")]
#[command(about = "Small JSON reader: tokenize, parse and query documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    limits: LimitArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct LimitArgs {
    /// Start from the lenient limits (1 MiB input, depth 512, bare roots allowed)
    #[arg(long, global = true)]
    lenient: bool,

    /// Maximum input size in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Maximum container nesting depth
    #[arg(long, global = true, value_name = "DEPTH")]
    max_depth: Option<u64>,

    /// Accept a bare scalar as the document root
    #[arg(long, global = true)]
    allow_bare_root: bool,
}

impl LimitArgs {
    fn limits(&self) -> Limits {
        let mut limits = if self.lenient {
            Limits::lenient()
        } else {
            Limits::strict()
        };
        if let Some(size) = self.max_size {
            limits = limits.with_max_input_size(size);
        }
        if let Some(depth) = self.max_depth {
            limits = limits.with_max_nesting_depth(depth);
        }
        if self.allow_bare_root {
            limits = limits.with_bare_root(true);
        }
        limits
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a file, one token per line
    Tokens {
        /// Input file
        file: PathBuf,

        /// Print JSON lines instead of `kind offset len`
        #[arg(long)]
        json: bool,
    },

    /// Parse a file and print the shape of its root
    Parse {
        /// Input file
        file: PathBuf,
    },

    /// Parse a file and print the value at a path such as `clubs[0]`
    Get {
        /// Input file
        file: PathBuf,

        /// Lookup path; empty for the root
        path: String,
    },

    /// Run a conformance corpus
    Corpus {
        /// Corpus file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

/// Token line for `tokens --json`.
#[derive(Serialize)]
struct TokenLine<'a> {
    #[serde(flatten)]
    token: Token,
    text: Option<&'a str>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let limits = cli.limits.limits();

    let result = match cli.command {
        Some(Commands::Tokens { file, json }) => print_tokens(&file, limits, json),
        Some(Commands::Parse { file }) => {
            parse_file(&file, limits).map(|root| println!("{root}"))
        }
        Some(Commands::Get { file, path }) => get_value(&file, &path, limits),
        Some(Commands::Corpus { file }) => return run_corpus(&file),
        Some(Commands::Version) => {
            println!("minijson v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("minijson v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error E{}: {}", e.code(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn print_tokens(file: &Path, limits: Limits, json: bool) -> JsonResult<()> {
    let mut lexer = Lexer::from_path(file, limits)?;
    let tokens = lexer.tokenize_all();
    let source = lexer.source();

    for token in &tokens {
        if json {
            let line = TokenLine {
                token: *token,
                text: token.text(source),
            };
            let encoded =
                serde_json::to_string(&line).map_err(|e| ErrorCode::Io(e.to_string()))?;
            println!("{encoded}");
        } else {
            println!("{:?} {} {}", token.kind, token.offset, token.len);
        }
    }
    Ok(())
}

fn get_value(file: &Path, path: &str, limits: Limits) -> JsonResult<()> {
    let root = parse_file(file, limits)?;
    match root.lookup(path)? {
        Some(value) => println!("{value:?}"),
        None => println!("(not found)"),
    }
    root.destroy();
    Ok(())
}

fn run_corpus(file: &Path) -> ExitCode {
    let runner = match CorpusRunner::load(file) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        vectors = runner.vector_count(),
        version = %runner.manifest().format_version,
        "loaded corpus"
    );

    let results = runner.run_all();
    for (id, result) in results.problems() {
        println!("FAIL {id}: {result:?}");
    }
    println!("{}", results.summary());

    if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Process exit status for an error. Codes that do not fit a byte map to 1.
fn exit_code(error: &ErrorCode) -> u8 {
    u8::try_from(error.code()).unwrap_or(1)
}
