use anyhow::Result;
use clap::Parser;
use std::path::Path;

// Import from yogakaraka-core
use yogakaraka_core::processor::summary_lines;
use yogakaraka_core::{Chart, EngineConfig, Stats, YogaDetector};

// Import CLI utilities
use yogakaraka::{load_chart, render, save_output, OutputFormat};

#[derive(Parser)]
#[command(name = "yogakaraka")]
#[command(about = "Detect classical yogas and doshas in a natal chart")]
struct Args {
    /// Path to the chart file (JSON, or YAML by extension)
    #[arg(short = 'i', long)]
    chart: Option<String>,

    /// Path to custom engine config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Path to a specification catalog (YAML) to report against
    #[arg(long)]
    catalog: Option<String>,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: results, report, or full
    #[arg(short = 'f', long, default_value = "results")]
    format: String,

    /// Keep cancelled yogas in the results even if the config drops them
    #[arg(long)]
    include_cancelled: bool,

    /// List every registered rule and exit
    #[arg(long)]
    list_rules: bool,

    /// Report registry coverage against the catalog and exit
    #[arg(long)]
    coverage: bool,

    /// Enable per-stage profiling
    #[arg(long)]
    profile: bool,

    /// Evaluate rules on the calling thread instead of the rayon pool
    #[arg(long)]
    sequential: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("🪷 Yogakaraka Yoga Detector");

    // Load config and apply CLI overrides
    let mut config = match &args.config {
        Some(path) => {
            let config = EngineConfig::load_from_file(path)?;
            println!("📋 Loaded config from: {path}");
            config
        }
        None => {
            println!("📋 Using default config");
            EngineConfig::default()
        }
    };
    if args.catalog.is_some() {
        config.catalog_path = args.catalog.clone();
    }
    if args.include_cancelled {
        config.engine.include_cancelled = true;
    }
    if args.sequential {
        config.engine.parallel = false;
    }

    log::debug!(
        "engine settings: parallel={}, include_cancelled={}, catalog={:?}",
        config.engine.parallel,
        config.engine.include_cancelled,
        config.catalog_path
    );

    let format: OutputFormat = args.format.parse()?;
    let detector = YogaDetector::with_config(config)?;

    if args.list_rules {
        list_rules(&detector);
        return Ok(());
    }

    if args.coverage {
        let stats = detector.registry_coverage();
        print_stats(&stats);
        let rendered = serde_json::to_string_pretty(&stats)?;
        save_output(&rendered, args.output.as_deref())?;
        return Ok(());
    }

    let Some(chart_path) = args.chart.as_deref() else {
        eprintln!("❌ No chart given. Use --chart <file>, or --list-rules / --coverage");
        std::process::exit(2);
    };

    if !Path::new(chart_path).exists() {
        eprintln!("⚠️  Chart file not found at: {chart_path}");
        std::process::exit(1);
    }

    println!("📄 Reading chart: {chart_path}");
    let input = load_chart(chart_path)?;
    let chart = match Chart::new(input) {
        Ok(chart) => chart,
        Err(e) => {
            eprintln!("❌ Malformed chart: {e}");
            std::process::exit(1);
        }
    };

    let run = detector.run(&chart, args.profile);
    let active = run.results.iter().filter(|r| r.is_active()).count();
    println!("✅ Detection complete");
    println!("📊 Results:");
    println!("   - Rules evaluated: {}", run.rules_evaluated);
    println!("   - Raw detections: {}", run.raw_count);
    println!("   - Yogas: {} ({} active, {} cancelled)", run.results.len(), active, run.results.len() - active);

    for result in &run.results {
        let marker = if result.cancelled { "✗" } else { "✓" };
        println!(
            "   {marker} [{}] {} ({})",
            result.category, result.canonical_name, result.strength
        );
    }

    if args.profile {
        println!("\n📊 Performance Summary:");
        for line in summary_lines(&run.timings) {
            println!("   {line}");
        }
    }

    let stats = detector.report(&run.results);
    if format != OutputFormat::Results {
        print_stats(&stats);
    }

    let fingerprint = detector.fingerprint(&chart)?;
    let rendered = render(format, &run.results, &stats, &fingerprint)?;
    save_output(&rendered, args.output.as_deref())?;

    Ok(())
}

fn list_rules(detector: &YogaDetector) {
    let registry = detector.registry();
    println!("\n📋 Registered rules ({}):", registry.len());
    for rule in registry.rules() {
        println!("  {:<40} {:<20} {}", rule.id, rule.family.key(), rule.canonical_name);
    }
}

fn print_stats(stats: &Stats) {
    println!("\n📈 Coverage against catalog {}:", stats.catalog_version);
    for category in &stats.categories {
        println!(
            "   {:.<25} {}/{}",
            category.category.label(),
            category.implemented_count,
            category.total_in_spec
        );
    }
    println!("   {:.<25} {}/{}", "Total", stats.implemented_total(), stats.spec_total());
    if !stats.unrecognized.is_empty() {
        println!("⚠️  {} names not in catalog:", stats.unrecognized.len());
        for warning in &stats.unrecognized {
            println!("   - {}", warning.canonical_name);
        }
    }
}
