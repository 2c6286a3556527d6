use scopebench::bench::{BenchPlan, default_templates};
use scopebench::config::BenchConfig;
use scopebench::scope::{NamespaceInventory, SamplingMode, select_namespaces};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scopebench=info,warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Err("missing command".into());
    }
    match args[1].as_str() {
        "sample" => cmd_sample(&args[2..]),
        "plan" => cmd_plan(&args[2..]),
        other => {
            print_usage();
            Err(format!("unknown top-level command: {other}"))
        }
    }
}

fn cmd_sample(args: &[String]) -> Result<(), String> {
    let inventory = load_inventory(args)?;
    let sizes = match parse_flag_value(args, "--sizes") {
        Some(raw) => parse_sizes(&raw)?,
        None => BenchConfig::default().scope_sizes,
    };
    let mode = match parse_flag_value(args, "--mode") {
        Some(raw) => SamplingMode::parse(&raw).ok_or_else(|| format!("unknown --mode: {raw}"))?,
        None => SamplingMode::Ordered,
    };

    let samples = select_namespaces(&inventory, &sizes, mode);
    for (requested, sample) in sizes.iter().zip(&samples) {
        let entries: Vec<String> = sample
            .iter()
            .map(|e| format!("{}/{}", e.cluster_id, e.namespace))
            .collect();
        println!("{mode}\t{requested}\t{}\t{}", sample.len(), entries.join(","));
    }
    Ok(())
}

fn cmd_plan(args: &[String]) -> Result<(), String> {
    let inventory = load_inventory(args)?;
    let config = match parse_flag_value(args, "--config") {
        Some(path) => BenchConfig::load(Path::new(&path)).map_err(|e| format!("config: {e}"))?,
        None => BenchConfig::default(),
    };
    info!(
        clusters = inventory.cluster_count(),
        namespaces = inventory.namespace_count(),
        "loaded namespace inventory"
    );

    let plan = BenchPlan::build(&config, &default_templates(), &inventory)
        .map_err(|e| format!("build plan: {e}"))?;
    for trial in &plan.trials {
        println!("{}\t{}\t{}", trial.template, trial.scope, trial.statement);
    }
    Ok(())
}

fn load_inventory(args: &[String]) -> Result<NamespaceInventory, String> {
    let path = parse_flag_value(args, "--inventory").ok_or("--inventory is required")?;
    let source = std::fs::read_to_string(&path).map_err(|e| format!("read {path}: {e}"))?;
    serde_json::from_str(&source).map_err(|e| format!("decode {path}: {e}"))
}

fn parse_sizes(raw: &str) -> Result<Vec<usize>, String> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid --sizes entry '{part}': {e}"))
        })
        .collect()
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    for idx in 0..args.len() {
        if args[idx] == flag {
            return args.get(idx + 1).cloned();
        }
    }
    None
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!(
        "  scopebench sample --inventory <inventory.json> [--sizes 10,20,50] [--mode ordered|random]"
    );
    eprintln!("  scopebench plan --inventory <inventory.json> [--config <config.json>]");
}
