//! Command line front end for the editor session.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use log::{error, warn};
use thiserror::Error;

use fabrix_editor::chat::ChatError;
use fabrix_editor::config::{Config, ConfigError};
use fabrix_editor::language::lexer::Source;
use fabrix_editor::types::errors::SchemaError;
use fabrix_editor::types::printer::print_schema;
use fabrix_editor::{DispatchError, EditorSession, FetcherParams, OperationResult, SchemaStatus};

#[derive(Parser)]
#[command(name = "fabrix-editor", version, about = "Load, check and run GraphQL queries against an endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// GraphQL endpoint, overriding FABRIX_GRAPHQL_ENDPOINT_URL.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Extra request header, may be repeated.
    #[arg(long = "header", value_name = "NAME:VALUE", global = true, value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Token for the chat assistant.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_token: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the endpoint's schema, view directives included, as SDL.
    Schema,
    /// Parse a query file and validate it against the schema.
    Check { file: PathBuf },
    /// Run an operation from a query file and print the response.
    Run {
        file: PathBuf,
        #[arg(long)]
        operation_name: Option<String>,
        /// Variables as a JSON object.
        #[arg(long)]
        variables: Option<String>,
    },
    /// Ask the assistant about the schema.
    Chat { prompt: String },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Schema(Arc<SchemaError>),
    #[error("schema was not loaded")]
    NoSchema,
    #[error("invalid variables: {0}")]
    Variables(#[source] serde_json::Error),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

fn parse_header(value: &str) -> Result<(String, String), String> {
    match value.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.trim().to_string())),
        _ => Err(format!("expected NAME:VALUE, got {:?}", value)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            1
        }
    };
    process::exit(code);
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let mut config = Config::from_env()?;
    if let Some(ref url) = cli.url {
        config.set_endpoint_url(url)?;
    }

    let session = EditorSession::new(config);
    for (name, value) in &cli.headers {
        session.set_additional_header(name, value);
    }
    if let Some(ref token) = cli.openai_token {
        session.set_openai_token(token);
    }

    match cli.command {
        Command::Schema => {
            session.load_schema().await;
            match session.schema_status() {
                SchemaStatus::Success { schema, .. } => {
                    println!("{}", print_schema(&schema));
                    Ok(0)
                }
                SchemaStatus::Failed { error, .. } => Err(CliError::Schema(error)),
                SchemaStatus::Ready => Err(CliError::NoSchema),
            }
        }
        Command::Check { file } => {
            let text = read(&file)?;
            session.load_schema().await;
            if let Some(error) = session.schema_status().error() {
                warn!("validating without a schema: {}", error);
            }

            session.commit_query(&text);
            println!("{}", session.preview().render());

            let source = Source::new(&session.editor_query());
            let diagnostics = session.diagnostics();
            for diagnostic in &diagnostics {
                match diagnostic.line_column(&source) {
                    Some((line, column)) => eprintln!("{}:{}:{}: {}", file.display(), line, column, diagnostic),
                    None => eprintln!("{}: {}", file.display(), diagnostic),
                }
            }
            Ok(if session.error().is_some() || !diagnostics.is_empty() { 1 } else { 0 })
        }
        Command::Run {
            file,
            operation_name,
            variables,
        } => {
            let params = FetcherParams {
                query: read(&file)?,
                variables: match variables {
                    Some(ref json) => Some(serde_json::from_str(json).map_err(CliError::Variables)?),
                    None => None,
                },
                operation_name: operation_name,
            };
            session.dispatch_params(params).await?;
            match session.response() {
                Some(result) => {
                    println!("{}", result.to_json());
                    Ok(if let OperationResult::Error(_) = result { 1 } else { 0 })
                }
                None => {
                    println!("null");
                    Ok(0)
                }
            }
        }
        Command::Chat { prompt } => {
            session.load_schema().await;
            let reply = session.ask(&prompt).await?;
            println!("{}", reply);
            Ok(0)
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source: source,
    })
}
