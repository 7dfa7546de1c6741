//! PREFLOW command-line front end
//!
//! Reads a network in edge-list format, computes a maximum flow and prints
//! the flow value followed by one `start end` line per arc carrying flow.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{debug, info};

use preflow_core::algorithm::{
    EdmondsKarp, FlowError, MaxFlowAlgorithm, Network, NodeId, PushRelabel, PushRelabelConfig,
};

const USAGE: &str = "usage: preflow <graph-file> [source] [sink] \
[--algorithm push-relabel|edmonds-karp] [--config <json-file>] [--json]";

/// Command-line errors
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}\n{USAGE}")]
    Usage(String),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Cannot read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cannot encode flow summary: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
struct Options {
    graph: PathBuf,
    source: NodeId,
    sink: NodeId,
    algorithm: MaxFlowAlgorithm,
    config: Option<PathBuf>,
    json: bool,
}

/// Returns `None` when help was requested
fn parse_args<I>(args: I) -> Result<Option<Options>, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut algorithm = MaxFlowAlgorithm::default();
    let mut config = None;
    let mut json = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--json" => json = true,
            "--algorithm" => {
                let name = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--algorithm needs a value".into()))?;
                algorithm = match name.as_str() {
                    "push-relabel" => MaxFlowAlgorithm::PushRelabelHighestLabel,
                    "edmonds-karp" => MaxFlowAlgorithm::EdmondsKarp,
                    other => return Err(CliError::Usage(format!("unknown algorithm '{}'", other))),
                };
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a file".into()))?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option '{}'", flag)))
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let graph = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage("missing graph file".into()))?;
    let source = parse_node(positional.next(), "source", 0)?;
    let sink = parse_node(positional.next(), "sink", 1)?;
    if let Some(extra) = positional.next() {
        return Err(CliError::Usage(format!("unexpected argument '{}'", extra)));
    }

    Ok(Some(Options {
        graph,
        source,
        sink,
        algorithm,
        config,
        json,
    }))
}

fn parse_node(arg: Option<String>, what: &str, default: usize) -> Result<NodeId, CliError> {
    match arg {
        None => Ok(NodeId(default)),
        Some(text) => text
            .parse::<usize>()
            .map(NodeId)
            .map_err(|_| CliError::Usage(format!("invalid {} '{}'", what, text))),
    }
}

fn load_config(path: &PathBuf) -> Result<PushRelabelConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ConfigIo {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: path.clone(),
        source,
    })
}

fn run(options: &Options) -> Result<String, CliError> {
    let network = Network::from_file(&options.graph)?;
    info!(
        "loaded {} with {} nodes and {} arcs",
        options.graph.display(),
        network.num_nodes(),
        network.edges().len()
    );

    let flow = match options.algorithm {
        MaxFlowAlgorithm::PushRelabelHighestLabel => {
            let config = match &options.config {
                Some(path) => load_config(path)?,
                None => PushRelabelConfig::default(),
            };
            debug!("push-relabel config: {:?}", config);
            PushRelabel::with_config(config).run(&network, options.source, options.sink)?
        }
        MaxFlowAlgorithm::EdmondsKarp => {
            EdmondsKarp::new().run(&network, options.source, options.sink)?
        }
    };

    if options.json {
        let mut text = serde_json::to_string_pretty(&flow.summary())?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(flow.to_string())
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("{:?}", options);

    // output is assembled completely before printing, so failures leave no partial result
    match run(&options) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
