//! Command-line definition and flag handling

use std::path::PathBuf;

use apisynth_core::{ConflictPolicy, SynthConfig};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Flags of the `generate` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GenerateArgs {
    pub(crate) spec: PathBuf,
    pub(crate) config: Option<PathBuf>,
    pub(crate) out: Option<PathBuf>,
    pub(crate) package: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) on_conflict: Option<ConflictPolicy>,
    pub(crate) dry_run: bool,
    pub(crate) log_format: LogFormat,
}

pub(crate) fn build_command() -> Command {
    Command::new("apisynth")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Synthesize and incrementally merge API test classes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Generate test classes from an OpenAPI/Swagger document")
                .arg(
                    Arg::new("spec")
                        .long("spec")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Local OpenAPI 3 or Swagger 2 document (JSON or YAML)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Test-source root (default: src/test/java)"),
                )
                .arg(
                    Arg::new("package")
                        .long("package")
                        .help("Java package of generated classes (default: org.example)"),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .help("Base URL for new classes (default: the document's server)"),
                )
                .arg(
                    Arg::new("on-conflict")
                        .long("on-conflict")
                        .value_parser(["prompt", "accept", "decline"])
                        .help("How to answer name collisions with a changed body"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Plan and report without writing"),
                )
                .arg(
                    Arg::new("log-format")
                        .long("log-format")
                        .default_value("text")
                        .value_parser(["text", "json"])
                        .help("Log output format"),
                ),
        )
}

impl GenerateArgs {
    pub(crate) fn from_matches(args: &ArgMatches) -> anyhow::Result<Self> {
        let spec = args
            .get_one::<PathBuf>("spec")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("--spec is required"))?;
        let on_conflict = args
            .get_one::<String>("on-conflict")
            .map(|s| s.parse::<ConflictPolicy>())
            .transpose()?;
        let log_format = match args.get_one::<String>("log-format").map(String::as_str) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            spec,
            config: args.get_one::<PathBuf>("config").cloned(),
            out: args.get_one::<PathBuf>("out").cloned(),
            package: args.get_one::<String>("package").cloned(),
            base_url: args.get_one::<String>("base-url").cloned(),
            on_conflict,
            dry_run: args.get_flag("dry-run"),
            log_format,
        })
    }

    /// Layer flags over a loaded config; flags win
    pub(crate) fn apply(&self, mut config: SynthConfig) -> SynthConfig {
        if let Some(out) = &self.out {
            config = config.with_test_source_dir(out);
        }
        if let Some(package) = &self.package {
            config = config.with_package_name(package);
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(policy) = self.on_conflict {
            config = config.with_conflict_policy(policy);
        }
        if self.dry_run {
            config = config.with_dry_run(true);
        }
        config
    }
}
