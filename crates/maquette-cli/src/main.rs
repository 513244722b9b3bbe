use maquette::{Engine, NodeKind, SceneDocument};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Maquette(maquette::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Maquette(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<maquette::Error> for CliError {
    fn from(value: maquette::Error) -> Self {
        Self::Maquette(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Validate,
    Inspect,
    Reprocess,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    out: Option<String>,
}

const USAGE: &str = "usage: maquette-cli <validate|inspect|reprocess> [file] [--pretty] [--out <file>]\n\
Reads the scene document from [file] or stdin.";

fn parse_args() -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut raw = std::env::args().skip(1);
    let Some(command) = raw.next() else {
        return Err(CliError::Usage(USAGE));
    };
    args.command = match command.as_str() {
        "validate" => Command::Validate,
        "inspect" => Command::Inspect,
        "reprocess" => Command::Reprocess,
        _ => return Err(CliError::Usage(USAGE)),
    };

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--pretty" => args.pretty = true,
            "--out" => {
                args.out = Some(raw.next().ok_or(CliError::Usage("--out requires a path"))?);
            }
            _ if arg.starts_with("--") => return Err(CliError::Usage(USAGE)),
            _ => {
                if args.input.is_some() {
                    return Err(CliError::Usage(USAGE));
                }
                args.input = Some(arg);
            }
        }
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(out: Option<&str>, content: &str) -> Result<(), CliError> {
    match out {
        Some(path) => std::fs::write(path, content)?,
        None => println!("{content}"),
    }
    Ok(())
}

#[derive(Serialize)]
struct InspectOut {
    sites: usize,
    nodes: usize,
    by_kind: Vec<(String, usize)>,
    zones: usize,
    views: usize,
    groups: usize,
}

fn run() -> Result<(), CliError> {
    let args = parse_args()?;
    let raw = read_input(args.input.as_deref())?;
    let document = SceneDocument::from_json(&raw).map_err(CliError::Maquette)?;

    let mut engine = Engine::new();
    engine.load_document(&document)?;

    match args.command {
        Command::Validate => {
            let summary = serde_json::json!({
                "valid": true,
                "nodes": engine.graph().len(),
            });
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&summary)?
            } else {
                summary.to_string()
            };
            write_output(args.out.as_deref(), &rendered)?;
        }
        Command::Inspect => {
            let mut by_kind: Vec<(String, usize)> = Vec::new();
            for kind in NodeKind::ALL {
                let count = engine.nodes_of_kind(kind).len();
                if count > 0 {
                    by_kind.push((kind.to_string(), count));
                }
            }
            let out = InspectOut {
                sites: engine.graph().roots().len(),
                nodes: engine.graph().len(),
                by_kind,
                zones: document.zones.len(),
                views: document.views.len(),
                groups: document.groups.len(),
            };
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&out)?
            } else {
                serde_json::to_string(&out)?
            };
            write_output(args.out.as_deref(), &rendered)?;
        }
        Command::Reprocess => {
            let saved = engine.save_document().to_json(args.pretty)?;
            write_output(args.out.as_deref(), &saved)?;
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
