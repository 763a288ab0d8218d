mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::pipeline::Options;

#[derive(Parser)]
#[command(
    name = "kelsen",
    version,
    about = "Transpile legal schemas into Kelsen rule-language source"
)]
struct Cli {
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Schema configuration document
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "KELSEN_CONFIG",
        default_value = "schema_config.json"
    )]
    config: PathBuf,

    /// Legal-context document; adds corpus-derived assets and annotations
    #[arg(short = 'x', long, value_name = "PATH", env = "KELSEN_CONTEXT")]
    context: Option<PathBuf>,

    /// Program run as `PROGRAM OUTPUT` once the output file is written
    #[arg(long, value_name = "PROGRAM", requires = "output")]
    validator: Option<String>,

    /// Do not synthesize automated norms
    #[arg(long)]
    skip_enrichment: bool,

    /// Schema source file
    input: PathBuf,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();
    tracing::info!("kelsen v{}", env!("CARGO_PKG_VERSION"));

    let stats = pipeline::run(&Options {
        config: &cli.config,
        context: cli.context.as_deref(),
        input: &cli.input,
        output: cli.output.as_deref(),
        validator: cli.validator.as_deref(),
        skip_enrichment: cli.skip_enrichment,
    })?;

    tracing::info!(
        norms = stats.norms,
        generated = stats.generated,
        issues = stats.issues,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "done"
    );
    Ok(())
}
