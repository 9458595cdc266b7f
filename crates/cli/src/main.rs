mod prompt;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use json_adapter::JsonExporter;
use linkscan_core::ports::LinkExporter;
use linkscan_core::{LinkExtractionService, ProviderRegistry, ScanConfig, ScanStats};
use sqlite_adapter::SqliteExporter;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompt::{confirm_write, needs_confirmation};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// SQLite3 database
    Sql,
    /// Compact JSON
    Json,
    /// Indented JSON
    PrettyJson,
}

impl OutputFormat {
    fn default_output(self) -> PathBuf {
        match self {
            OutputFormat::Sql => PathBuf::from("./images.db"),
            OutputFormat::Json | OutputFormat::PrettyJson => PathBuf::from("./images.json"),
        }
    }

    fn exporter(self, out_file: PathBuf) -> Box<dyn LinkExporter> {
        match self {
            OutputFormat::Sql => Box::new(SqliteExporter::new(out_file)),
            OutputFormat::Json => Box::new(JsonExporter::new(out_file, false)),
            OutputFormat::PrettyJson => Box::new(JsonExporter::new(out_file, true)),
        }
    }
}

/// Get image links from Twitch chat logs created by Chatterino
#[derive(Parser, Debug)]
#[command(name = "imglinks")]
#[command(about = "Get image links from Twitch chat logs created by Chatterino")]
#[command(after_help = "When saving 1000 or more image links there is a confirmation prompt.")]
struct Cli {
    /// The directory of Chatterino logs, should contain the platform folder
    #[arg(short = 'l', long = "logs-dir", default_value = ".", env = "IMGLINKS_LOGS_DIR")]
    logs_dir: PathBuf,

    /// When prompted for anything, assume yes
    #[arg(short = 'y', long = "yes")]
    skip_prompt: bool,

    /// Output file format
    #[arg(short = 'f', long = "format", value_enum, ignore_case = true, default_value_t = OutputFormat::Sql)]
    format: OutputFormat,

    /// The file to store the output in. Default './images.db' or './images.json'
    #[arg(short = 'o', long = "output")]
    out_file: Option<PathBuf>,

    /// One or more channels to get links from, `name*` matches by prefix
    #[arg(short = 'c', long = "channels", required = true, num_args = 1.., value_name = "CHANNEL")]
    channels: Vec<String>,

    /// Platform folder inside the logs directory
    #[arg(long, default_value = "Twitch")]
    platform: String,

    /// JSON file with extra image hosts to recognise
    #[arg(long, value_name = "FILE")]
    providers: Option<PathBuf>,

    /// Log debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_registry(providers: Option<&Path>) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::builtin();
    if let Some(path) = providers {
        let specs = ProviderRegistry::load_specs(path)?;
        info!("Loaded {} extra providers from {}", specs.len(), path.display());
        registry = registry.with_providers(specs)?;
    }

    info!("Recognised image hosts: {}", registry.tags().join(", "));
    Ok(registry)
}

/// One line naming the requested channels that had no logs
fn unmatched_summary(stats: &ScanStats) -> Option<String> {
    if stats.unmatched_patterns.is_empty() {
        return None;
    }
    Some(format!(
        "No logs found for {} of the requested channels: {}",
        stats.unmatched_patterns.len(),
        stats.unmatched_patterns.join(", ")
    ))
}

/// Scans, asks for confirmation when needed, then writes the output.
/// Declining the prompt is not an error.
fn run(cli: Cli, input: &mut impl BufRead, prompt_out: &mut impl Write) -> Result<()> {
    let registry = build_registry(cli.providers.as_deref()).context("invalid provider registry")?;
    let out_file = cli.out_file.unwrap_or_else(|| cli.format.default_output());

    // Instantiate the core business service with its output adapter
    let config = ScanConfig {
        logs_dir: cli.logs_dir,
        platform: cli.platform,
    };
    let service = LinkExtractionService::new(config, registry, cli.format.exporter(out_file));

    let (bundle, stats) = service
        .collect_links(&cli.channels, Local::now().naive_local())
        .context("failed to scan logs")?;
    if let Some(summary) = unmatched_summary(&stats) {
        warn!("{}", summary);
    }
    info!("Total number of links: {}", bundle.total);

    let exporter = service.exporter();
    if needs_confirmation(bundle.total, cli.skip_prompt) {
        let confirmed = confirm_write(
            input,
            prompt_out,
            bundle.total,
            &exporter.describe(),
            exporter.output_path(),
        )
        .context("failed to read confirmation")?;
        if !confirmed {
            warn!("Aborting.");
            return Ok(());
        }
    }

    let saved = service
        .save_links(&bundle)
        .with_context(|| format!("failed to save links to {}", exporter.output_path().display()))?;
    info!(
        "Saved {} as {} to {}",
        saved,
        exporter.describe(),
        exporter.output_path().display()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdin = io::stdin();
    match run(cli, &mut stdin.lock(), &mut io::stdout()) {
        Ok(()) => {}
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn logs_with_links(count: usize) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let channel = dir.path().join("Twitch").join("Channels").join("foo");
        fs::create_dir_all(&channel).unwrap();
        let content: String = (0..count)
            .map(|i| format!("[10:00:00]  user{i}: look https://i.imgur.com/img{i}.png\n"))
            .collect();
        fs::write(channel.join("foo-2021-05-26.log"), content).unwrap();
        dir
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("imglinks").chain(args.iter().copied())).unwrap()
    }

    fn run_with_answers(cli: Cli, answers: &str) -> (Result<()>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = run(cli, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&["-c", "foo", "Bar*"]);
        assert_eq!(cli.format, OutputFormat::Sql);
        assert_eq!(cli.channels, vec!["foo", "Bar*"]);
        assert!(!cli.skip_prompt);
        assert_eq!(cli.platform, "Twitch");
        assert_eq!(cli.format.default_output(), PathBuf::from("./images.db"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(cli(&["-f", "pretty-json", "-c", "x"]).format, OutputFormat::PrettyJson);
        assert_eq!(cli(&["-f", "JSON", "-c", "x"]).format, OutputFormat::Json);
        assert_eq!(
            OutputFormat::Json.default_output(),
            PathBuf::from("./images.json")
        );
    }

    #[test]
    fn test_channels_required_and_format_checked() {
        assert!(Cli::try_parse_from(["imglinks"]).is_err());
        assert!(Cli::try_parse_from(["imglinks", "-f", "csv", "-c", "x"]).is_err());
    }

    #[test]
    fn test_writes_json_without_prompt_below_threshold() {
        let logs = logs_with_links(3);
        let out = logs.path().join("out.json");
        let cli = cli(&[
            "-l", logs.path().to_str().unwrap(),
            "-f", "json",
            "-o", out.to_str().unwrap(),
            "-c", "foo",
        ]);

        let (result, prompt) = run_with_answers(cli, "");
        result.unwrap();
        assert!(prompt.is_empty());
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("{\"total\":3,"));
    }

    #[test]
    fn test_declined_prompt_writes_nothing() {
        let logs = logs_with_links(1000);
        let out = logs.path().join("images.db");
        let cli = cli(&["-l", logs.path().to_str().unwrap(), "-o", out.to_str().unwrap(), "-c", "foo"]);

        let (result, prompt) = run_with_answers(cli, "n\n");
        result.unwrap();
        assert!(prompt.contains("Write all 1000 links as an SQLite3 database"));
        assert!(!out.exists());
    }

    #[test]
    fn test_confirmed_prompt_writes() {
        let logs = logs_with_links(1000);
        let out = logs.path().join("images.json");
        let cli = cli(&[
            "-l", logs.path().to_str().unwrap(),
            "-f", "pretty-json",
            "-o", out.to_str().unwrap(),
            "-c", "foo",
        ]);

        let (result, _) = run_with_answers(cli, "\n");
        result.unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_yes_flag_skips_prompt() {
        let logs = logs_with_links(1000);
        let out = logs.path().join("images.db");
        let cli = cli(&["-l", logs.path().to_str().unwrap(), "-y", "-o", out.to_str().unwrap(), "-c", "foo"]);

        let (result, prompt) = run_with_answers(cli, "");
        result.unwrap();
        assert!(prompt.is_empty());
        assert!(out.exists());
    }

    #[test]
    fn test_zero_links_still_succeeds() {
        let logs = logs_with_links(0);
        let out = logs.path().join("images.json");
        let cli = cli(&[
            "-l", logs.path().to_str().unwrap(),
            "-f", "json",
            "-o", out.to_str().unwrap(),
            "-c", "nobody",
        ]);

        let (result, _) = run_with_answers(cli, "");
        result.unwrap();
        assert!(fs::read_to_string(&out).unwrap().starts_with("{\"total\":0,"));
    }

    #[test]
    fn test_missing_logs_dir_is_an_error() {
        let logs = tempfile::tempdir().unwrap();
        let out = logs.path().join("images.json");
        let missing = logs.path().join("missing");
        let cli = cli(&["-l", missing.to_str().unwrap(), "-o", out.to_str().unwrap(), "-c", "foo"]);

        let (result, _) = run_with_answers(cli, "");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("does not exist"));
        assert!(!out.exists());
    }

    #[test]
    fn test_unmatched_summary() {
        let mut stats = ScanStats::default();
        assert_eq!(unmatched_summary(&stats), None);

        stats.unmatched_patterns = vec!["nobody".into(), "zz*".into()];
        assert_eq!(
            unmatched_summary(&stats).as_deref(),
            Some("No logs found for 2 of the requested channels: nobody, zz*")
        );
    }

    #[test]
    fn test_extra_providers_extend_builtin_tags() {
        let dir = tempfile::tempdir().unwrap();
        let providers = dir.path().join("providers.json");
        fs::write(&providers, r#"[{"tag": "prnt.sc", "hosts": ["prnt.sc"]}]"#).unwrap();

        let registry = build_registry(Some(&providers)).unwrap();
        assert_eq!(registry.tags(), vec!["imgur.com", "gyazo.com", "nuuls.com", "prnt.sc"]);
        assert_eq!(build_registry(None).unwrap().tags().len(), 3);
    }

    #[test]
    fn test_extra_providers_file() {
        let logs = tempfile::tempdir().unwrap();
        let channel = logs.path().join("Twitch").join("Channels").join("foo");
        fs::create_dir_all(&channel).unwrap();
        fs::write(channel.join("foo-2021-05-26.log"), "[10:00:00]  u: https://prnt.sc/abc\n").unwrap();
        let providers = logs.path().join("providers.json");
        fs::write(&providers, r#"[{"tag": "prnt.sc", "hosts": ["prnt.sc"]}]"#).unwrap();
        let out = logs.path().join("images.json");

        let cli = cli(&[
            "-l", logs.path().to_str().unwrap(),
            "-f", "json",
            "-o", out.to_str().unwrap(),
            "--providers", providers.to_str().unwrap(),
            "-c", "foo",
        ]);
        let (result, _) = run_with_answers(cli, "");
        result.unwrap();
        assert!(fs::read_to_string(&out).unwrap().contains("\"type\":\"prnt.sc\""));
    }
}
