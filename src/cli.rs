use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub plan: PathBuf,
    pub config: Option<PathBuf>,
    pub document_out: Option<PathBuf>,
    pub run: bool,
    pub charts_out: Option<PathBuf>,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Help,
    Build(CliOptions),
}

pub fn parse_args() -> Result<CliCommand, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliCommand, String> {
    let mut i = 0usize;
    let mut plan = None;
    let mut config = None;
    let mut document_out = None;
    let mut run = false;
    let mut charts_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--plan" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --plan (expected a TOML file path)")?;
                if plan.replace(PathBuf::from(path)).is_some() {
                    return Err("--plan provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--document-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --document-out (expected a file path)")?;
                if document_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--document-out provided more than once".to_string());
                }
            }
            "--charts-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --charts-out (expected a file path)")?;
                if charts_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--charts-out provided more than once".to_string());
                }
            }
            "--run" => run = true,
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let plan = plan.ok_or_else(|| "missing required argument --plan".to_string())?;
    if charts_out.is_some() && !run {
        return Err("--charts-out requires --run".to_string());
    }

    Ok(CliCommand::Build(CliOptions {
        plan,
        config,
        document_out,
        run,
        charts_out,
    }))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("mgrid-builder: assemble a microgrid system and serialize it for simulation");
    eprintln!();
    eprintln!("Usage: mgrid-builder --plan <path> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --plan <path>            System plan (TOML)");
    eprintln!("  --config <path>          Builder settings (TOML)");
    eprintln!("  --document-out <path>    Write the system document here instead of stdout");
    eprintln!("  --run                    Run the document through the configured engine");
    eprintln!("  --charts-out <path>      Export result and input-profile charts to CSV");
    eprintln!("  --help                   Show this help message");
}
