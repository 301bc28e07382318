use anyhow::{Context, bail};
use async_trait::async_trait;
use clap::ArgMatches;
use colored::Colorize;
use gramscope_core::data::Dataset;
use gramscope_core::error::BoxError;
use gramscope_core::model::OutputRecord;
use gramscope_core::queue::ProfileEnqueuer;
use gramscope_core::traits::{EmitMeta, OutputSink};
use gramscope_core::{DetailsScraper, PageRequest, PageType, ScrapeConfig};
use gramscope_scanner::{ConnectionFetcher, QueryClient};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_DATA_DIR: &str = "~/.config/gramscope/";
pub const DATASET_FILE: &str = "gramscope.db";
pub const CONFIG_FILE: &str = "config.json";

const BANNER: &str = r#"
   ╔═══════════════════════════════════════════════╗
   ║   ┏━╸┏━┓┏━┓┏┳┓┏━┓┏━╸┏━┓┏━┓┏━╸                 ║
   ║   ┃╺┓┣┳┛┣━┫┃┃┃┗━┓┃  ┃ ┃┣━┛┣╸                  ║
   ║   ┗━┛╹┗╸╹ ╹╹ ╹┗━┛┗━╸┗━┛╹  ┗━╸                 ║
   ║       page payloads in, flat records out      ║
   ╚═══════════════════════════════════════════════╝
"#;

pub fn print_banner() {
    eprintln!("{}", BANNER.bright_magenta());
    eprintln!("  v{}\n", env!("CARGO_PKG_VERSION").dimmed());
}

fn print_divider() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

/// Expand `~` in a user-supplied directory.
pub fn resolve_data_dir(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn default_dataset_path() -> PathBuf {
    resolve_data_dir(DEFAULT_DATA_DIR).join(DATASET_FILE)
}

/// Read a saved page's shared data (`window._sharedData` dumped as JSON).
pub fn load_payload(path: &Path) -> anyhow::Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Payload {} is not valid JSON", path.display()))
}

/// Flag values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub include_has_stories: bool,
    pub following_max: Option<usize>,
    pub followed_by_max: Option<usize>,
    pub likers_max: Option<usize>,
}

impl ConfigOverrides {
    fn from_args(args: &ArgMatches) -> Self {
        Self {
            include_has_stories: args.get_flag("include-has-stories"),
            following_max: args.get_one::<usize>("following-max").copied(),
            followed_by_max: args.get_one::<usize>("followed-by-max").copied(),
            likers_max: args.get_one::<usize>("likers-max").copied(),
        }
    }
}

pub fn build_config(file: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<ScrapeConfig> {
    let mut config = match file {
        Some(path) => ScrapeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScrapeConfig::default(),
    };

    if overrides.include_has_stories {
        config.include_has_stories = true;
    }
    if let Some(max) = overrides.following_max {
        config.following_max = max;
    }
    if let Some(max) = overrides.followed_by_max {
        config.followed_by_max = max;
    }
    if let Some(max) = overrides.likers_max {
        config.likers_max = max;
    }

    Ok(config)
}

/// Writes each record as one line of JSON.
pub struct JsonLinesSink<W> {
    out: Mutex<W>,
}

impl JsonLinesSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> OutputSink for JsonLinesSink<W> {
    async fn emit(&self, record: &OutputRecord, _meta: &EmitMeta) -> Result<(), BoxError> {
        let line = serde_json::to_string(record)?;
        let mut out = self.out.lock().map_err(|e| e.to_string())?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub records: Vec<OutputRecord>,
    pub failures: Vec<(PathBuf, String)>,
}

/// Run the dispatcher over every saved payload. A failing page is recorded
/// and skipped; the remaining files are still processed.
pub async fn extract_pages(
    inputs: &[PathBuf],
    page_type: &str,
    url: Option<&str>,
    scraper: &DetailsScraper<'_>,
    sink: &dyn OutputSink,
    progress: &ProgressBar,
) -> ExtractSummary {
    let mut summary = ExtractSummary::default();

    for input in inputs {
        progress.set_message(input.display().to_string());
        let page_url = url
            .map(str::to_string)
            .unwrap_or_else(|| input.display().to_string());
        let page = PageRequest::new(&page_url, page_type);

        let result = match load_payload(input) {
            Ok(data) => scraper
                .scrape_details(&page, &data, sink)
                .await
                .with_context(|| format!("Failed to extract {}", input.display())),
            Err(e) => Err(e),
        };

        match result {
            Ok(record) => {
                debug!("Extracted {} record from {}", record.kind(), input.display());
                summary.records.push(record);
            }
            Err(e) => {
                warn!("{:#}", e);
                summary.failures.push((input.clone(), format!("{:#}", e)));
            }
        }
        progress.inc(1);
    }

    summary
}

/// Add each username as a profile request. Returns how many were new.
pub async fn enqueue_profiles(dataset: &Dataset, usernames: &[String]) -> anyhow::Result<usize> {
    let enqueuer = ProfileEnqueuer::new(dataset);
    let mut added = 0;
    for username in usernames {
        if enqueuer.add_profile(username).await? {
            added += 1;
        } else {
            debug!("{} already queued", username);
        }
    }
    Ok(added)
}

#[derive(Debug, PartialEq)]
pub struct InitReport {
    pub dataset: PathBuf,
    pub config: PathBuf,
    pub dataset_created: bool,
    pub config_written: bool,
}

/// Create the data directory with a fresh dataset and a default config file.
/// Existing files are kept unless `force` is set.
pub fn init_data_dir(dir: &Path, force: bool) -> anyhow::Result<InitReport> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let dataset = dir.join(DATASET_FILE);
    let config = dir.join(CONFIG_FILE);

    if force && Dataset::exists(&dataset) {
        Dataset::drop(&dataset)
            .with_context(|| format!("Failed to remove {}", dataset.display()))?;
    }
    let dataset_created = !Dataset::exists(&dataset);
    Dataset::new(&dataset)?;

    let config_written = force || !config.exists();
    if config_written {
        let defaults = serde_json::to_string_pretty(&ScrapeConfig::default())?;
        fs::write(&config, defaults)
            .with_context(|| format!("Failed to write {}", config.display()))?;
    }

    Ok(InitReport {
        dataset,
        config,
        dataset_created,
        config_written,
    })
}

pub fn handle_init(args: &ArgMatches) -> anyhow::Result<()> {
    print_divider();
    eprintln!("{}", "  GRAMSCOPE INITIALIZATION".bright_white().bold());
    print_divider();

    let path = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DATA_DIR);
    let force = args.get_flag("force");
    let dir = resolve_data_dir(path);

    let report = init_data_dir(&dir, force)?;

    let status = |fresh: bool| {
        if fresh {
            "created".green().bold()
        } else {
            "kept".yellow().bold()
        }
    };
    eprintln!(
        "{} Dataset: {} ({})",
        "✓".green().bold(),
        report.dataset.display().to_string().bright_white(),
        status(report.dataset_created)
    );
    eprintln!(
        "{} Config: {} ({})",
        "✓".green().bold(),
        report.config.display().to_string().bright_white(),
        status(report.config_written)
    );
    if !force && !(report.dataset_created && report.config_written) {
        eprintln!("{} Use --force to overwrite existing files", "ℹ".blue());
    }
    Ok(())
}

pub async fn handle_extract(args: &ArgMatches) -> anyhow::Result<()> {
    let page_type = args
        .get_one::<String>("page-type")
        .context("--page-type is required")?;
    // reject bad types before touching the network or the dataset
    let parsed: PageType = page_type.parse()?;

    let inputs: Vec<PathBuf> = args
        .get_many::<PathBuf>("input")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    if inputs.is_empty() {
        bail!("No input payloads given");
    }

    let config_path = match args.get_one::<PathBuf>("config") {
        Some(path) => Some(path.clone()),
        None => {
            let default = resolve_data_dir(DEFAULT_DATA_DIR).join(CONFIG_FILE);
            default.exists().then_some(default)
        }
    };
    let config = build_config(config_path.as_deref(), &ConfigOverrides::from_args(args))?;
    debug!("Using config {:?}", config);

    let mut client = QueryClient::new()?;
    if let Some(session_id) = args.get_one::<String>("session-id") {
        client = client.with_session_id(session_id.clone());
    }
    let connections = ConnectionFetcher::new(client.clone());
    let scraper = DetailsScraper::new(&connections, &client).with_config(config);

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let url = args.get_one::<String>("url").map(String::as_str);
    let summary = match args.get_one::<PathBuf>("dataset") {
        Some(path) => {
            let dataset = Dataset::new(&resolve_data_dir(&path.to_string_lossy()))?;
            let summary = extract_pages(&inputs, parsed.as_str(), url, &scraper, &dataset, &progress).await;
            if let Some(url) = url
                && !summary.records.is_empty()
            {
                dataset.mark_handled(url)?;
            }
            summary
        }
        None => {
            let sink = JsonLinesSink::stdout();
            extract_pages(&inputs, parsed.as_str(), url, &scraper, &sink, &progress).await
        }
    };
    progress.finish_and_clear();

    eprintln!(
        "{} {} {} record(s) extracted",
        "✓".green().bold(),
        summary.records.len().to_string().cyan(),
        parsed.as_str().to_lowercase()
    );
    for (path, reason) in &summary.failures {
        eprintln!("{} {}: {}", "✗".red().bold(), path.display(), reason);
    }

    if summary.records.is_empty() {
        bail!("No pages could be extracted");
    }
    Ok(())
}

fn open_dataset(args: &ArgMatches) -> anyhow::Result<Dataset> {
    let path = args
        .get_one::<PathBuf>("dataset")
        .map(|p| resolve_data_dir(&p.to_string_lossy()))
        .unwrap_or_else(default_dataset_path);
    if !Dataset::exists(&path) {
        bail!(
            "No dataset at {}. Run `gramscope init` first",
            path.display()
        );
    }
    Ok(Dataset::new(&path)?)
}

pub async fn handle_enqueue(args: &ArgMatches) -> anyhow::Result<()> {
    let usernames: Vec<String> = args
        .get_many::<String>("USERNAME")
        .map(|names| names.cloned().collect())
        .unwrap_or_default();
    let dataset = open_dataset(args)?;

    let added = enqueue_profiles(&dataset, &usernames).await?;
    eprintln!(
        "{} {} of {} profile(s) queued",
        "✓".green().bold(),
        added.to_string().cyan(),
        usernames.len()
    );
    Ok(())
}

pub fn handle_queue(args: &ArgMatches) -> anyhow::Result<()> {
    let dataset = open_dataset(args)?;
    let pending = dataset.pending_requests()?;

    if pending.is_empty() {
        eprintln!("{} Queue is empty", "ℹ".blue());
        return Ok(());
    }
    for request in &pending {
        println!("{:<8} {}", request.page_type.as_str().yellow(), request.url);
    }
    eprintln!("{} pending request(s)", pending.len().to_string().cyan());
    Ok(())
}
