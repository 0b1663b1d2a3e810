//! `apisynth` command-line entry point

mod cli;
mod summary;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use apisynth_composition::{ConflictResolver, FixedResolver, PromptResolver};
use apisynth_core::{ConflictPolicy, EndpointCatalog, SynthConfig, SynthesisEngine};
use tracing_subscriber::EnvFilter;

use crate::cli::{build_command, GenerateArgs, LogFormat};

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    let result = match matches.subcommand() {
        Some(("generate", args)) => GenerateArgs::from_matches(args).and_then(|args| {
            init_tracing(args.log_format);
            generate(&args)
        }),
        _ => Err(anyhow::anyhow!("unknown command")),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so stdout carries only the summary
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Run `generate`; `Ok(false)` when some group failed
fn generate(args: &GenerateArgs) -> anyhow::Result<bool> {
    let config = match &args.config {
        Some(path) => SynthConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SynthConfig::default(),
    };
    let config = args.apply(config);
    config.validate().context("invalid configuration")?;
    tracing::debug!(?config, "effective configuration");

    let catalog = EndpointCatalog::from_path(&args.spec)
        .with_context(|| format!("loading API description {}", args.spec.display()))?;

    let engine = SynthesisEngine::new(config);
    let report = match engine.config().on_conflict {
        ConflictPolicy::Prompt => {
            let mut resolver = PromptResolver::new(io::stdin().lock(), io::stderr());
            run(&engine, &catalog, &mut resolver)
        }
        ConflictPolicy::Accept => run(&engine, &catalog, &mut FixedResolver::accept_all()),
        ConflictPolicy::Decline => run(&engine, &catalog, &mut FixedResolver::decline_all()),
    };

    print!("{}", summary::render_summary(&report).context("rendering summary")?);
    Ok(report.is_success())
}

fn run(
    engine: &SynthesisEngine,
    catalog: &EndpointCatalog,
    resolver: &mut dyn ConflictResolver,
) -> apisynth_core::RunReport {
    engine.run(catalog, resolver)
}
