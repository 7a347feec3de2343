use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use easy_translate::{
    GoogleTranslator, ProxySettings, Target, TranslateOptions, Translation, TranslatorConfig,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "easy-translate")]
#[command(version, about = "Translate short text with Google Translate")]
#[command(long_about = "Translate text or a text file (up to 5000 characters) into one or more languages using the Google Translate web page. No API key required.")]
struct Cli {
    /// Text to translate
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    text: Option<String>,

    /// Translate the content of this UTF-8 file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Target language code; repeat or comma-separate for several (e.g. -t tr -t fr)
    #[arg(short, long = "target")]
    targets: Vec<String>,

    /// Source language code (defaults to auto-detection)
    #[arg(short, long)]
    source: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Proxy for http requests
    #[arg(long)]
    http_proxy: Option<String>,

    /// Proxy for https requests
    #[arg(long)]
    https_proxy: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Write the raw page of unparseable responses to this file
    #[arg(long)]
    dump_errors: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// `-t tr` is a single target; `-t tr -t fr` or `-t tr,fr` fan out.
fn build_target(args: &[String]) -> Option<Target> {
    let codes: Vec<String> = args
        .iter()
        .flat_map(|a| a.split(','))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();

    match codes.len() {
        0 => None,
        1 if args.len() == 1 && !args[0].contains(',') => Some(Target::Single(codes[0].clone())),
        _ => Some(Target::Multi(codes)),
    }
}

fn build_options(cli: &Cli) -> Result<TranslateOptions> {
    let mut options = TranslateOptions::new();

    if let Some(target) = build_target(&cli.targets) {
        options = options.target(target);
    }
    if let Some(ref source) = cli.source {
        options = options.source_language(source.clone());
    }
    if let Some(secs) = cli.timeout {
        let timeout = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("Invalid timeout: {}", secs))?;
        options = options.timeout(timeout);
    }

    let mut proxies = ProxySettings::new();
    proxies.http = cli.http_proxy.clone();
    proxies.https = cli.https_proxy.clone();
    if !proxies.is_empty() {
        options = options.proxies(proxies);
    }

    Ok(options)
}

fn dump_raw_pages(path: &Path, translation: &Translation) -> Result<()> {
    let pages: Vec<String> = translation
        .failures()
        .into_iter()
        .filter_map(|(target, e)| e.raw_body().map(|b| format!("<!-- target: {} -->\n{}", target, b)))
        .collect();

    if !pages.is_empty() {
        std::fs::write(path, pages.join("\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Raw responses written to {}", path.display());
    }
    Ok(())
}

fn print_translation(translation: &Translation, json: bool) -> Result<()> {
    if json {
        let value = match translation {
            Translation::Single(text) => serde_json::json!({ "translation": text }),
            Translation::Multi(outcomes) => {
                let entries: Vec<serde_json::Value> = outcomes
                    .iter()
                    .map(|o| match &o.result {
                        Ok(text) => serde_json::json!({
                            "target": o.target,
                            "translation": text,
                            "duration_ms": o.duration_ms,
                        }),
                        Err(e) => serde_json::json!({
                            "target": o.target,
                            "error": e.to_string(),
                            "duration_ms": o.duration_ms,
                        }),
                    })
                    .collect();
                serde_json::json!({ "translations": entries })
            }
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match translation {
        Translation::Single(text) => println!("{}", text),
        Translation::Multi(outcomes) => {
            for outcome in outcomes {
                match &outcome.result {
                    Ok(text) => println!("{}: {}", style(&outcome.target).cyan().bold(), text),
                    Err(e) => println!(
                        "{}: {} {}",
                        style(&outcome.target).cyan().bold(),
                        style("error").red(),
                        e
                    ),
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = TranslatorConfig::load().context("Failed to load configuration")?;
    let options = build_options(&cli)?;
    let effective = config.resolve(&options);

    info!("Source:   {}", effective.source_language);
    info!("Target:   {}", effective.target);

    let translator = GoogleTranslator::new(config)
        .context("Configuration validation failed")?
        .with_progress(effective.target.is_multi() && !cli.json);

    let result = match cli.file {
        Some(ref path) => translator.translate_file(path, &options).await,
        None => {
            let text = cli.text.as_deref().unwrap_or_default();
            translator.translate(text, &options).await
        }
    };

    let translation = match result {
        Ok(translation) => translation,
        Err(e) => {
            if let (Some(path), Some(body)) = (&cli.dump_errors, e.raw_body()) {
                std::fs::write(path, body)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Raw response written to {}", path.display());
            }
            return Err(e).context("Translation failed");
        }
    };

    if let Some(ref path) = cli.dump_errors {
        dump_raw_pages(path, &translation)?;
    }

    print_translation(&translation, cli.json)?;

    let outcomes = translation.outcomes();
    if !outcomes.is_empty() && outcomes.iter().all(|o| !o.is_ok()) {
        anyhow::bail!("All {} translations failed", outcomes.len());
    }
    if !translation.failures().is_empty() {
        warn!("{} of {} translations failed", translation.failures().len(), outcomes.len());
    }

    Ok(())
}
