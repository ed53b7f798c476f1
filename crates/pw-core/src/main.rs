//! pw-core: analyze wheel-compressed prime archives.
//!
//! Commands:
//! - analyze: decode an archive and compute its statistics report
//! - decode: list the primes stored in an archive
//! - show: render a saved report without its archive
//! - encode: build an archive from an ascending list of primes
//! - schema: print JSON Schemas for persisted types
//! - config show: print the resolved settings
//!
//! Without a command, the configured default archive is analyzed; if none is
//! configured a short hint is printed.

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use pw_archive::{compute_sha256, ArchiveError, ArchiveReader, ArchiveWriter, DecodeOptions};
use pw_common::{
    format_error_human, Error, OutputFormat, StructuredError, SCHEMA_VERSION, WHEEL_BASE_OFFSET,
    WHEEL_MODULUS,
};
use pw_core::exit_codes::ExitCode;
use pw_core::logging::config::ENV_LOG_FORMAT;
use pw_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use pw_core::output::{DecodeOutput, EncodeOutput};
use pw_core::schema::{
    available_schemas, generate_all_schemas, generate_schema, unknown_schema_error,
};
use pw_core::settings::{ResolvedSettings, SettingsError, SettingsOverrides, ENV_ARCHIVE};
use pw_report::{
    default_report_file_name, group_digits, load_report_with, render, save_report, ReportConfig,
    ReportError, StatisticsEngine, StatisticsReport,
};
use std::fmt::Write as _;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, error_span, info, warn};

// ============================================================================
// CLI definition
// ============================================================================

/// Prime Wheel archive analyzer
#[derive(Parser)]
#[command(name = "pw-core", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (TOML); falls back to PW_CONFIG, then the XDG config dir
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Default archive; falls back to PW_ARCHIVE, then the settings file
    #[arg(long, global = true, value_name = "FILE")]
    archive: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an archive and compute its statistics report
    Analyze(AnalyzeArgs),

    /// Decode an archive and list its primes
    Decode(DecodeArgs),

    /// Render a saved report
    Show(ShowArgs),

    /// Build an archive from a JSON array of ascending primes
    Encode(EncodeArgs),

    /// Print JSON Schemas for persisted and emitted types
    Schema(SchemaArgs),

    /// Settings management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug, Default)]
struct AnalyzeArgs {
    /// Archive to analyze (defaults to the configured archive)
    archive: Option<PathBuf>,

    /// Save the report to this path
    #[arg(long, value_name = "PATH", conflicts_with = "save")]
    out: Option<PathBuf>,

    /// Save the report as stats_<archive>.json in the current directory
    #[arg(long)]
    save: bool,

    /// Reject offsets off the wheel residues or out of order
    #[arg(long)]
    strict: bool,

    /// Title for rendered output
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Archive to decode (defaults to the configured archive)
    archive: Option<PathBuf>,

    /// Print at most N primes
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Reject offsets off the wheel residues or out of order
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Saved report (JSON)
    report: PathBuf,

    /// Title for rendered output
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// JSON array of ascending primes
    #[arg(long, value_name = "FILE")]
    primes: PathBuf,

    /// Archive to write
    #[arg(long, value_name = "ARCHIVE")]
    out: PathBuf,

    /// Wheel reference; derived from the first prime when omitted
    #[arg(long)]
    reference: Option<u128>,

    /// Pad with trailing empty buckets up to N buckets
    #[arg(long, value_name = "N")]
    buckets: Option<usize>,

    /// Store the reference as a one-element list
    #[arg(long)]
    wrapped_reference: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name (see --list)
    name: Option<String>,

    /// List available schema types
    #[arg(long, conflicts_with = "name")]
    list: bool,

    /// Print every schema keyed by type name
    #[arg(long, conflicts_with_all = ["name", "list"])]
    all: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved settings and where they came from
    Show,
}

// ============================================================================
// Errors
// ============================================================================

/// A failed command: the error to report and the exit code to use.
#[derive(Debug)]
struct CliError {
    error: Error,
    exit: ExitCode,
}

impl CliError {
    fn with_exit(error: impl Into<Error>, exit: ExitCode) -> Self {
        CliError {
            error: error.into(),
            exit,
        }
    }

    fn args(message: impl Into<String>) -> Self {
        CliError::with_exit(Error::Config(message.into()), ExitCode::ArgsError)
    }
}

impl From<Error> for CliError {
    fn from(error: Error) -> Self {
        let exit = ExitCode::for_error(&error);
        CliError { error, exit }
    }
}

impl From<ArchiveError> for CliError {
    fn from(err: ArchiveError) -> Self {
        Error::from(err).into()
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        Error::from(err).into()
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Error::from(err).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err).into()
    }
}

type CmdResult = Result<ExitCode, CliError>;

// ============================================================================
// Entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests are not errors
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = LogLevel::from_flags(cli.global.verbose, cli.global.quiet);
    let mut log_config = LogConfig::from_env(cli_level, None);
    // JSON payloads get JSONL logs unless the format is set explicitly
    if std::env::var_os(ENV_LOG_FORMAT).is_none() && cli.global.format.is_machine() {
        log_config = log_config.with_format(LogFormat::Jsonl);
    }
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = error_span!("run", run_id = %run_id, command = command_name(&cli.command));
    let _guard = span.enter();

    let global = &cli.global;
    let result = match &cli.command {
        None => run_default(global),
        Some(Commands::Analyze(args)) => run_analyze(global, args),
        Some(Commands::Decode(args)) => run_decode(global, args),
        Some(Commands::Show(args)) => run_show(global, args),
        Some(Commands::Encode(args)) => run_encode(global, args),
        Some(Commands::Schema(args)) => run_schema(global, args),
        Some(Commands::Config(args)) => match args.command {
            ConfigCommands::Show => run_config_show(global),
        },
        Some(Commands::Version) => {
            print_version(global);
            Ok(ExitCode::Clean)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(global, &err),
    };
    debug!(exit = %exit_code, "Finished");

    std::process::exit(exit_code.as_i32());
}

fn command_name(command: &Option<Commands>) -> &'static str {
    match command {
        None => "default",
        Some(Commands::Analyze(_)) => "analyze",
        Some(Commands::Decode(_)) => "decode",
        Some(Commands::Show(_)) => "show",
        Some(Commands::Encode(_)) => "encode",
        Some(Commands::Schema(_)) => "schema",
        Some(Commands::Config(_)) => "config",
        Some(Commands::Version) => "version",
    }
}

// ============================================================================
// Command implementations
// ============================================================================

fn resolve_settings(
    global: &GlobalOpts,
    archive: Option<&Path>,
    strict: bool,
) -> Result<ResolvedSettings, CliError> {
    let overrides = SettingsOverrides {
        config_path: global.config.clone(),
        archive: archive.map(Path::to_path_buf).or_else(|| global.archive.clone()),
        strict_wheel: strict,
    };
    Ok(ResolvedSettings::resolve(&overrides)?)
}

fn no_archive_error() -> CliError {
    CliError::args(format!(
        "no archive given; pass ARCHIVE, --archive, set {} or default_archive in the settings file",
        ENV_ARCHIVE
    ))
}

/// No command: analyze the configured archive, or explain how to pick one.
fn run_default(global: &GlobalOpts) -> CmdResult {
    let resolved = resolve_settings(global, None, false)?;
    if resolved.settings.default_archive.is_some() {
        return run_analyze(global, &AnalyzeArgs::default());
    }

    info!("No archive configured; nothing to analyze");
    let hint = format!(
        "pass an archive with 'pw-core analyze <ARCHIVE>', --archive or {}",
        ENV_ARCHIVE
    );
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "mode": "consult",
                "message": "no archive configured",
                "hint": hint,
            });
            emit(&serde_json::to_string_pretty(&response).map_err(Error::Json)?);
        }
        OutputFormat::Summary => emit(&format!("no archive configured; {}", hint)),
        OutputFormat::Md => emit(&format!(
            "# pw-core\n\nNo archive configured.\n\nTo analyze one, {}.\nSaved reports open with 'pw-core show <REPORT>'.\n",
            hint
        )),
    }
    Ok(ExitCode::Clean)
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> CmdResult {
    let resolved = resolve_settings(global, args.archive.as_deref(), args.strict)?;
    let settings = &resolved.settings;
    let path = settings
        .default_archive
        .clone()
        .ok_or_else(no_archive_error)?;
    let _span = error_span!("archive", archive = %path.display()).entered();

    let reader = ArchiveReader::open(&path)?;
    let mut config = ReportConfig::new().with_limits(settings.sample_limits);
    if let Some(title) = &args.title {
        config = config.with_title(title.clone());
    }
    let engine = StatisticsEngine::new(config);
    let options = DecodeOptions {
        strict_wheel: settings.strict_wheel,
    };
    let report = engine.generate_from_reader(&reader, options)?;

    let target = match (&args.out, args.save) {
        (Some(out), _) => Some(out.clone()),
        (None, true) => Some(PathBuf::from(default_report_file_name(
            reader.source().stem.as_deref(),
            Utc::now(),
        ))),
        (None, false) => None,
    };
    if let Some(target) = &target {
        save_report(&report, target)?;
        if !global.format.is_machine() {
            eprintln!("Report saved to {}", target.display());
        }
    }

    emit(&render(&report, global.format, engine.config().title.as_deref())?);
    Ok(report_outcome(&report))
}

/// Empty reports are valid but get their own exit code.
fn report_outcome(report: &StatisticsReport) -> ExitCode {
    if report.is_empty {
        warn!(
            start = %report.parameters.start,
            end = %report.parameters.end,
            "Archive lists no primes in its interval"
        );
        ExitCode::EmptyDataset
    } else {
        ExitCode::Clean
    }
}

fn run_decode(global: &GlobalOpts, args: &DecodeArgs) -> CmdResult {
    let resolved = resolve_settings(global, args.archive.as_deref(), args.strict)?;
    let path = resolved
        .settings
        .default_archive
        .clone()
        .ok_or_else(no_archive_error)?;
    let _span = error_span!("archive", archive = %path.display()).entered();

    let reader = ArchiveReader::open(&path)?;
    let decoded = reader.decode(DecodeOptions {
        strict_wheel: resolved.settings.strict_wheel,
    })?;
    let output = DecodeOutput::new(
        reader.source().clone(),
        decoded.interval,
        decoded.primes.as_slice(),
        args.limit,
    );

    match global.format {
        OutputFormat::Json => {
            emit(&serde_json::to_string_pretty(&output).map_err(Error::Json)?);
        }
        OutputFormat::Summary => emit(&decode_summary(&output)),
        OutputFormat::Md => emit(&decode_markdown(&output)),
    }

    if output.count == 0 {
        warn!(interval = %output.interval, "Archive lists no primes in its interval");
        Ok(ExitCode::EmptyDataset)
    } else {
        Ok(ExitCode::Clean)
    }
}

fn decode_summary(output: &DecodeOutput) -> String {
    let interval = &output.interval;
    match (output.primes.first(), output.primes.last()) {
        (Some(first), Some(last)) if output.count > 0 => format!(
            "[{} .. {}] {} primes, first {}, last shown {}",
            group_digits(interval.start),
            group_digits(interval.end),
            group_digits(u128::from(output.count)),
            group_digits(*first),
            group_digits(*last)
        ),
        _ => format!(
            "[{} .. {}] {} primes",
            group_digits(interval.start),
            group_digits(interval.end),
            output.count
        ),
    }
}

fn decode_markdown(output: &DecodeOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Decoded archive: {}", output.source.id);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Interval: {} .. {}",
        group_digits(output.interval.start),
        group_digits(output.interval.end)
    );
    let _ = writeln!(
        out,
        "Primes: {} (showing {})",
        group_digits(u128::from(output.count)),
        output.primes.len()
    );
    let _ = writeln!(out, "Source SHA-256: {}", output.source.sha256);
    if output.primes.is_empty() {
        return out;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "| # | Value |");
    let _ = writeln!(out, "|---:|---:|");
    for (index, value) in output.primes.iter().enumerate() {
        let _ = writeln!(out, "| {} | {} |", index + 1, group_digits(*value));
    }
    out
}

fn run_show(global: &GlobalOpts, args: &ShowArgs) -> CmdResult {
    let resolved = resolve_settings(global, None, false)?;
    let report = load_report_with(&args.report, &resolved.settings.sample_limits)?;
    emit(&render(&report, global.format, args.title.as_deref())?);
    Ok(report_outcome(&report))
}

fn run_encode(global: &GlobalOpts, args: &EncodeArgs) -> CmdResult {
    let data = std::fs::read(&args.primes)?;
    let primes: Vec<u128> = serde_json::from_slice(&data)
        .map_err(|e| CliError::with_exit(Error::Json(e), ExitCode::ArgsError))?;

    let reference = match (args.reference, primes.first()) {
        (Some(reference), _) => reference,
        (None, Some(&first)) => first.saturating_sub(WHEEL_BASE_OFFSET) / WHEEL_MODULUS,
        (None, None) => {
            return Err(CliError::args(
                "no primes to encode; pass --reference to write an empty archive",
            ))
        }
    };

    let mut writer = ArchiveWriter::new(reference).map_err(encode_error)?;
    if args.wrapped_reference {
        writer = writer.with_wrapped_reference();
    }
    for &prime in &primes {
        writer.push(prime).map_err(encode_error)?;
    }
    if let Some(buckets) = args.buckets {
        writer.pad_to(buckets).map_err(encode_error)?;
    }
    let (bytes, archive) = writer.write_to_vec().map_err(encode_error)?;
    std::fs::write(&args.out, &bytes)?;
    info!(path = %args.out.display(), primes = primes.len(), "Archive written");

    let interval = archive.interval().map_err(ArchiveError::from)?;
    let output = EncodeOutput {
        schema_version: SCHEMA_VERSION.to_string(),
        path: args.out.display().to_string(),
        reference,
        interval,
        bucket_count: archive.bucket_count() as u64,
        prime_count: primes.len() as u64,
        sha256: compute_sha256(&bytes),
    };

    match global.format {
        OutputFormat::Json => {
            emit(&serde_json::to_string_pretty(&output).map_err(Error::Json)?);
        }
        _ => emit(&format!(
            "Wrote {} primes in {} buckets to {} (interval {} .. {})",
            group_digits(u128::from(output.prime_count)),
            output.bucket_count,
            output.path,
            group_digits(interval.start),
            group_digits(interval.end)
        )),
    }
    Ok(ExitCode::Clean)
}

/// Values the writer refuses are bad input, not a bad archive.
fn encode_error(err: ArchiveError) -> CliError {
    match err {
        e @ ArchiveError::Encode { .. } => {
            CliError::with_exit(Error::Config(e.to_string()), ExitCode::ArgsError)
        }
        other => other.into(),
    }
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> CmdResult {
    let to_text = |value: &serde_json::Value| -> Result<String, CliError> {
        let text = if args.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        };
        Ok(text.map_err(Error::Json)?)
    };

    if args.all {
        let all = serde_json::to_value(generate_all_schemas()).map_err(Error::Json)?;
        emit(&to_text(&all)?);
        return Ok(ExitCode::Clean);
    }

    let name = match (&args.name, args.list) {
        (Some(name), false) => name,
        _ => {
            match global.format {
                OutputFormat::Json => {
                    let list: Vec<_> = available_schemas()
                        .into_iter()
                        .map(|(name, description)| {
                            serde_json::json!({ "name": name, "description": description })
                        })
                        .collect();
                    emit(&to_text(&serde_json::Value::Array(list))?);
                }
                _ => {
                    let mut out = String::new();
                    for (name, description) in available_schemas() {
                        let _ = writeln!(out, "{:<22} {}", name, description);
                    }
                    emit(&out);
                }
            }
            return Ok(ExitCode::Clean);
        }
    };

    match generate_schema(name) {
        Some(schema) => {
            emit(&to_text(&schema)?);
            Ok(ExitCode::Clean)
        }
        None => {
            let err = unknown_schema_error(name);
            match global.format {
                OutputFormat::Json => eprintln!("{}", err.to_json()),
                _ => eprintln!("unknown schema type '{}'; see 'pw-core schema --list'", name),
            }
            Ok(ExitCode::ArgsError)
        }
    }
}

fn run_config_show(global: &GlobalOpts) -> CmdResult {
    let resolved = resolve_settings(global, None, false)?;
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": Utc::now().to_rfc3339(),
                "config_path": resolved.config_path.as_ref().map(|p| p.display().to_string()),
                "config_source": resolved.config_source,
                "archive_source": resolved.archive_source,
                "settings": resolved.settings,
            });
            emit(&serde_json::to_string_pretty(&response).map_err(Error::Json)?);
        }
        OutputFormat::Summary => emit(&format!(
            "settings from {}; strict_wheel={} limits gaps={} pairs={} primes={}; archive {}",
            resolved.config_source,
            resolved.settings.strict_wheel,
            resolved.settings.sample_limits.gaps,
            resolved.settings.sample_limits.pairs_per_kind,
            resolved.settings.sample_limits.primes,
            resolved
                .settings
                .default_archive
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        )),
        OutputFormat::Md => {
            let toml = resolved
                .settings
                .to_toml()
                .map_err(|e| Error::Config(e.to_string()))?;
            let mut out = String::new();
            let _ = writeln!(out, "# pw-core settings");
            let _ = writeln!(out);
            match &resolved.config_path {
                Some(path) => {
                    let _ = writeln!(out, "Source: {} ({})", path.display(), resolved.config_source);
                }
                None => {
                    let _ = writeln!(out, "Source: {}", resolved.config_source);
                }
            }
            if let Some(source) = resolved.archive_source {
                let _ = writeln!(out, "Archive from: {}", source);
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "```toml");
            let _ = write!(out, "{}", toml);
            let _ = writeln!(out, "```");
            emit(&out);
        }
    }
    Ok(ExitCode::Clean)
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "pw_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            emit(&version_info.to_string());
        }
        _ => {
            emit(&format!(
                "pw-core {}\nschema version: {}",
                env!("CARGO_PKG_VERSION"),
                SCHEMA_VERSION
            ));
        }
    }
}

// ============================================================================
// Output helpers
// ============================================================================

/// Print a payload to stdout, ending with exactly one newline.
fn emit(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

fn output_error(global: &GlobalOpts, err: &CliError) -> ExitCode {
    debug!(code = err.error.code(), exit = %err.exit, error = %err.error, "Command failed");
    match global.format {
        OutputFormat::Json => {
            let structured =
                StructuredError::from(&err.error).with_context("exit_code", err.exit.code_name());
            eprintln!("{}", structured.to_json());
        }
        _ => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(&err.error, use_color));
        }
    }
    err.exit
}
