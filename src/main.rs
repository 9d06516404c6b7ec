use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use raifeed::http::{DEFAULT_REFERER, DEFAULT_USER_AGENT};
use raifeed::{
    ClientConfig, FeedIdentity, FeedOptions, NoopReporter, ProgressEvent, ProgressReporter,
    ReqwestClient, SharedProgressReporter, generate_feed,
};

// Emoji with fallback for terminals without Unicode support
static RADIO: Emoji<'_, '_> = Emoji("📻 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "[>] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Generate a podcast RSS feed from a RaiPlay Sound program page
#[derive(Parser, Debug)]
#[command(name = "raifeed")]
#[command(about = "Generate a podcast RSS feed from a RaiPlay Sound program page")]
#[command(version)]
struct Args {
    /// Program page URL, e.g. https://www.raiplaysound.it/programmi/ilruggitodelconiglio
    url: String,

    /// Output folder for the generated feed
    #[arg(short, long, default_value = ".")]
    folder: PathBuf,

    /// Leave out episodes whose audio cannot be resolved instead of failing
    #[arg(long)]
    skip_unresolved: bool,

    /// Contact email announced as the feed owner
    #[arg(long)]
    owner_email: Option<String>,

    /// Feed author and owner name
    #[arg(long, default_value = "RaiPlaySound")]
    author: String,

    /// Feed language code
    #[arg(long, default_value = "it-it")]
    language: String,

    /// Prefix for episode GUIDs
    #[arg(long, default_value = "raiplay-feed-")]
    guid_prefix: String,

    /// User-Agent presented to the provider
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Referer presented to the provider
    #[arg(long, default_value = DEFAULT_REFERER)]
    referer: String,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging on stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {wide_msg}")
                .unwrap(),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingProgram { url } => {
                self.bar
                    .set_message(format!("{SEARCH}Fetching program: {}", url.cyan()));
            }

            ProgressEvent::ProgramParsed {
                program_title,
                total_cards,
                episodes,
            } => {
                self.bar.println(format!(
                    "{HEADPHONES}{} • {} cards, {} with audio",
                    program_title.bold().green(),
                    total_cards.to_string().cyan(),
                    episodes.to_string().yellow()
                ));
                self.bar.set_style(
                    ProgressStyle::default_bar()
                        .template(&format!(
                            "  {LINK}[{{bar:30.cyan/blue}}] {{pos}}/{{len}} {{wide_msg}}"
                        ))
                        .unwrap()
                        .progress_chars("█▓░"),
                );
                self.bar.set_length(episodes as u64);
                self.bar.set_position(0);
            }

            ProgressEvent::ResolvingEpisode {
                episode_title,
                episode_index,
                ..
            } => {
                self.bar.set_position(episode_index as u64);
                self.bar.set_message(truncate_title(&episode_title, 40));
            }

            ProgressEvent::EpisodeResolved { .. } => {
                self.bar.inc(1);
            }

            ProgressEvent::EpisodeSkipped {
                episode_title,
                error,
            } => {
                self.bar.inc(1);
                self.bar.println(format!(
                    "  {FAILURE}{} - {}",
                    truncate_title(&episode_title, 30).red(),
                    error.red()
                ));
            }

            ProgressEvent::WritingFeed { path } => {
                self.bar
                    .set_message(format!("Writing {}", path.display().to_string().cyan()));
            }

            ProgressEvent::FeedCompleted {
                episode_count,
                skipped_count,
                ..
            } => {
                self.bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} episodes, {} skipped",
                    "Feed written:".bold().green(),
                    episode_count.to_string().green().bold(),
                    if skipped_count > 0 {
                        skipped_count.to_string().red().bold()
                    } else {
                        skipped_count.to_string().green()
                    }
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "raifeed=debug" } else { "raifeed=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            RADIO,
            "raifeed".bold().magenta(),
            "- RaiPlay Sound podcast feeds".dimmed()
        );
    }

    let client = ReqwestClient::new(&ClientConfig {
        user_agent: args.user_agent,
        referer: args.referer,
    })
    .context("Failed to set up HTTP client")?;

    let options = FeedOptions {
        identity: FeedIdentity {
            author: args.author,
            language: args.language,
            owner_email: args.owner_email,
            guid_prefix: args.guid_prefix,
        },
        continue_on_error: args.skip_unresolved,
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let result = generate_feed(&client, &args.url, &args.folder, &options, reporter)
        .await
        .with_context(|| format!("Failed to generate feed for {}", args.url))?;

    if !args.quiet && !result.skipped_episodes.is_empty() {
        println!("\n{}", "Skipped episodes:".red().bold());
        for (title, error) in &result.skipped_episodes {
            println!("  {}{} - {}", CROSS, title.yellow(), error.dimmed());
        }
    }

    if !args.quiet {
        println!(
            "\n{FOLDER}Output: {}\n",
            result.path.display().to_string().cyan()
        );
    }

    Ok(())
}
