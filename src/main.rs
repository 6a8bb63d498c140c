//! mgrid-builder entry point: plan in, system document (and optionally results) out.

use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

use mgrid_builder::assembly::Assembler;
use mgrid_builder::cli::{self, CliCommand, CliOptions};
use mgrid_builder::config::BuilderConfig;
use mgrid_builder::gateway::SimulationGateway;
use mgrid_builder::io::export::export_charts;
use mgrid_builder::plan::SystemPlan;
use mgrid_builder::projection::Chart;
use mgrid_builder::store::MemoryStore;
use mgrid_builder::telemetry;

fn load_config(path: Option<&Path>) -> Result<BuilderConfig, String> {
    let config = match path {
        Some(p) => BuilderConfig::from_toml_file(p).map_err(|e| e.to_string())?,
        None => BuilderConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(lines.join("\n"));
    }
    Ok(config)
}

fn execute(opts: &CliOptions) -> Result<(), String> {
    let config = load_config(opts.config.as_deref())?;
    telemetry::init_tracing(&config.logging.filter);

    let plan = SystemPlan::from_toml_file(&opts.plan).map_err(|e| e.to_string())?;
    let base_dir = opts.plan.parent().unwrap_or_else(|| Path::new("."));

    let mut assembler =
        Assembler::from_config(MemoryStore::new(), &config).map_err(|e| e.to_string())?;
    let system = plan
        .apply(&mut assembler, base_dir)
        .map_err(|e| e.to_string())?;

    let document = assembler
        .build_document(system)
        .and_then(|d| d.to_json_pretty())
        .map_err(|e| e.to_string())?;
    match &opts.document_out {
        Some(path) => {
            fs::write(path, &document)
                .map_err(|e| format!("failed to write \"{}\": {e}", path.display()))?;
            eprintln!("System document written to {}", path.display());
        }
        None => println!("{document}"),
    }

    if !opts.run {
        return Ok(());
    }

    let Some(command) = config.command_gateway() else {
        return Err("--run needs [gateway] command in the config".to_string());
    };
    let gateway: Arc<dyn SimulationGateway> = Arc::new(command);
    let result = assembler
        .run(system, &gateway)
        .map_err(|e| e.to_string())?;

    let charts = [Chart::demand(&result), Chart::state_of_charge(&result)];
    for chart in &charts {
        for s in &chart.series {
            eprintln!("{} ({}): {} points", s.name, chart.y_title, s.series.len());
        }
    }

    if let Some(path) = &opts.charts_out {
        let mut charts = charts.to_vec();
        charts.extend(assembler.input_charts(system).map_err(|e| e.to_string())?);
        let rows = export_charts(&charts, path)
            .map_err(|e| format!("failed to write CSV: {e}"))?;
        eprintln!("{rows} chart rows written to {}", path.display());
    }
    Ok(())
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(CliCommand::Help) => {
            cli::print_usage();
            return;
        }
        Ok(CliCommand::Build(opts)) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = execute(&opts) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
