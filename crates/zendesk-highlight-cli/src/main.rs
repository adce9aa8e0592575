//! zd-highlight: dump highlighting tokens for Zendesk XML templates
//!
//! ```text
//! zd-highlight template.xml
//! zd-highlight --format json --mode xml < page.xml
//! zd-highlight --list-modes
//! ```

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zendesk_highlight::{zendesk, ConfigError, ModeRegistry, Token};

#[derive(Parser, Debug)]
#[command(name = "zd-highlight")]
#[command(about = "Print the highlighting tokens of Zendesk XML templates")]
#[command(version)]
struct Args {
    /// Files to tokenize (stdin when omitted)
    files: Vec<PathBuf>,

    /// Highlighting mode
    #[arg(short, long, default_value = zendesk::MODE_NAME)]
    mode: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log level (debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// List available modes and exit
    #[arg(long)]
    list_modes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// offset, scope and quoted text separated by tabs
    Text,
    /// one JSON object per token
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to build modes: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown mode '{name}' (available: {available})")]
    UnknownMode { name: String, available: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("failed to encode token: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_logging(log_level: &str) {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

fn write_tokens<W: Write>(out: &mut W, tokens: &[Token<'_>], format: Format) -> Result<(), CliError> {
    for token in tokens {
        match format {
            Format::Text => writeln!(out, "{}\t{}\t{:?}", token.offset, token.kind, token.text)?,
            Format::Json => {
                serde_json::to_writer(&mut *out, token)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let registry = ModeRegistry::with_builtin()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.list_modes {
        for name in registry.names() {
            writeln!(out, "{name}")?;
        }
        out.flush()?;
        return Ok(());
    }

    let mode = registry
        .get(&args.mode)
        .ok_or_else(|| CliError::UnknownMode {
            name: args.mode.clone(),
            available: registry.names().join(", "),
        })?;
    let tokenizer = mode.tokenizer();
    info!(mode = %mode.name(), "Using mode");

    let inputs: Vec<Option<&PathBuf>> = if args.files.is_empty() {
        vec![None]
    } else {
        args.files.iter().map(Some).collect()
    };

    for path in inputs {
        let text = read_input(path)?;
        let tokens = tokenizer.tokenize(&text);
        debug!(
            input = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "<stdin>".into()),
            bytes = text.len(),
            tokens = tokens.len(),
            "Tokenized input"
        );
        write_tokens(&mut out, &tokens, args.format)?;
    }

    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("zd-highlight: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zendesk_highlight::Tokenizer;

    fn render(input: &str, format: Format) -> String {
        let tokenizer = Tokenizer::new(zendesk::grammar().unwrap());
        let tokens = tokenizer.tokenize(input);
        let mut out = Vec::new();
        write_tokens(&mut out, &tokens, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_output() {
        assert_eq!(
            render("{{ ticket.id }}", Format::Text),
            "0\tvariable\t\"{{\"\n\
             2\ttext\t\" \"\n\
             3\tticket\t\"ticket.id\"\n\
             12\ttext\t\" \"\n\
             13\tvariable\t\"}}\"\n"
        );
    }

    #[test]
    fn test_json_output() {
        let output = render("{{true}}", Format::Json);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1]["type"], "constant.language.boolean");
        assert_eq!(lines[1]["value"], "true");
        assert_eq!(lines[1]["offset"], 2);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["zd-highlight"]);
        assert_eq!(args.mode, "zendesk_xml");
        assert_eq!(args.format, Format::Text);
        assert!(args.files.is_empty());
        assert!(!args.list_modes);
    }

    #[test]
    fn test_unknown_mode_error() {
        let args = Args::parse_from(["zd-highlight", "--mode", "html", "missing.xml"]);
        let err = run(args).unwrap_err();
        assert!(matches!(err, CliError::UnknownMode { ref name, .. } if name == "html"));
        assert!(err.to_string().contains("xml, zendesk_xml"));
    }
}
