//! Transpile pipeline: load documents, parse, validate, enrich, generate.

use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::Context;
use kelsen_codegen::{generate, generate_with_context};
use kelsen_config::{SchemaConfig, apply_automated_norms, validate_schema};
use kelsen_context::LegalContext;
use kelsen_core::parse_schema;
use tracing::{info, warn};

pub struct Options<'a> {
    pub config: &'a Path,
    pub context: Option<&'a Path>,
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub validator: Option<&'a str>,
    pub skip_enrichment: bool,
}

#[derive(Debug, Default)]
pub struct RunStats {
    /// Norms in the schema after enrichment.
    pub norms: usize,
    /// Norms added by enrichment.
    pub generated: usize,
    /// Validation warnings.
    pub issues: usize,
    pub elapsed: Duration,
}

/// Run the whole pipeline and write the result.
pub fn run(opts: &Options<'_>) -> anyhow::Result<RunStats> {
    let start = Instant::now();

    let config = SchemaConfig::load(opts.config)
        .with_context(|| format!("loading configuration {}", opts.config.display()))?;
    let context = opts
        .context
        .map(|path| {
            LegalContext::load(path)
                .with_context(|| format!("loading legal context {}", path.display()))
        })
        .transpose()?;
    let source = std::fs::read_to_string(opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    let (code, mut stats) = transpile(&source, &config, context.as_ref(), opts.skip_enrichment)
        .with_context(|| format!("transpiling {}", opts.input.display()))?;

    match opts.output {
        Some(path) => {
            std::fs::write(path, &code).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = code.len(), "wrote Kelsen source");
            if let Some(program) = opts.validator {
                run_validator(program, path);
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(code.as_bytes())
                .and_then(|()| stdout.flush())
                .context("writing to stdout")?;
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// Parse, validate, enrich and generate from schema source text.
pub fn transpile(
    source: &str,
    config: &SchemaConfig,
    context: Option<&LegalContext>,
    skip_enrichment: bool,
) -> anyhow::Result<(String, RunStats)> {
    let mut schema = parse_schema(source).context("parsing schema")?;
    let mut stats = RunStats::default();

    for issue in validate_schema(config, &schema) {
        warn!(%issue, "schema validation");
        stats.issues += 1;
    }

    if skip_enrichment {
        info!("enrichment skipped");
    } else {
        stats.generated = apply_automated_norms(&mut schema, &config.automated_norms)
            .context("enriching schema")?
            .total();
    }
    stats.norms = schema.norms().len();

    let code = match context {
        Some(ctx) => generate_with_context(&schema, ctx),
        None => generate(&schema),
    }
    .context("generating Kelsen source")?;

    Ok((code, stats))
}

/// Run `program output`. Failures are reported, never fatal: the output
/// has already been written.
fn run_validator(program: &str, output: &Path) {
    match Command::new(program).arg(output).status() {
        Ok(status) if status.success() => info!(program, "validator accepted output"),
        Ok(status) => warn!(program, %status, "validator rejected output"),
        Err(e) => warn!(program, error = %e, "could not run validator"),
    }
}
