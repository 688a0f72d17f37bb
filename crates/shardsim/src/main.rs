//! Shardsim: build synthetic search cluster topologies for placement tests.

use anyhow::{Context, Result};
use clap::Parser;
use shardsim_builders::TopologyConfig;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod report;

use cli::{BuildArgs, Cli, Commands, LogFormat, OutputFormat};
use report::Report;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Build(args) => run_build(&args),
        Commands::Version => {
            println!("shardsim {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_build(args: &BuildArgs) -> Result<()> {
    print!("{}", render_build(args)?);
    Ok(())
}

fn render_build(args: &BuildArgs) -> Result<String> {
    let config = TopologyConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load topology from {}", args.config.display()))?;
    debug!(path = %args.config.display(), "Loaded topology");

    let builder = config.into_cluster_builder().context("Failed to initialize topology")?;
    let cluster = builder.build().context("Failed to build cluster")?;
    info!(
        live_nodes = cluster.live_nodes().len(),
        collections = cluster.collections().len(),
        "Cluster built"
    );

    let mut report = Report::new(&cluster);
    if args.attributes {
        report = report.with_attributes(&builder.build_attribute_values());
    }

    match args.format {
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize cluster")?;
            Ok(format!("{json}\n"))
        }
        OutputFormat::Text => Ok(report.to_string()),
    }
}

fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {level}"))?;

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt_layer.json()).init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        }
    }

    Ok(())
}
