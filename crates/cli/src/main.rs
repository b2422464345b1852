mod echo;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use linkpress_core::dispatch::{GMAIL_RELAY, SUBMISSION_PORT};
use linkpress_core::{
    AlgoliaLister, ContentRecord, DispatchConfig, Dispatcher, Extractor, FetchConfig, PipelineConfig, SmtpDispatcher,
    SpoolDispatcher, fetch_file,
};
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

use crate::echo::{print_banner, print_error, print_info, print_success};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile yesterday's top Hacker News links into one EPUB and deliver it
#[derive(Parser, Debug)]
#[command(name = "linkpress")]
#[command(author = "Linkpress Contributors")]
#[command(version)]
#[command(about = "Compile yesterday's top links into one EPUB", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List, extract, compile and deliver today's digest
    Daily(DailyArgs),
    /// Compile local HTML files into an EPUB
    Build(BuildArgs),
    /// Extract one URL or local file and print the record as JSON
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct DailyArgs {
    /// Number of stories to fetch
    #[arg(short = 'n', long, env = "TOP_POSTS_COUNT", default_value_t = linkpress_core::config::DEFAULT_COUNT)]
    count: usize,

    /// Output EPUB path (default: hn_daily_YYYY-MM-DD.epub)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = linkpress_core::fetch::DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    timeout: u64,

    /// Compile only, do not deliver
    #[arg(long)]
    skip_send: bool,

    /// Keep the EPUB after a successful delivery
    #[arg(long)]
    keep: bool,

    /// How the EPUB is delivered
    #[arg(long, value_enum, default_value_t = Transport::Smtp)]
    transport: Transport,

    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST", default_value = GMAIL_RELAY, value_name = "HOST")]
    smtp_host: String,

    /// SMTP relay port (STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value_t = SUBMISSION_PORT, value_name = "PORT")]
    smtp_port: u16,

    /// Spool directory for --transport spool
    #[arg(long, env = "LINKPRESS_SPOOL_DIR", default_value = "spool", value_name = "DIR")]
    spool_dir: PathBuf,

    /// Sender address
    #[arg(long, env = "GMAIL_ADDRESS", value_name = "ADDRESS")]
    sender: Option<String>,

    /// Sender app password
    #[arg(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true, value_name = "SECRET")]
    password: Option<String>,

    /// Comma-separated recipient addresses
    #[arg(long, env = "KINDLE_EMAILS", value_name = "LIST")]
    recipients: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Transport {
    /// Mail the EPUB through the SMTP relay
    Smtp,
    /// Leave the EPUB and a JSON envelope in the spool directory
    Spool,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// HTML files, one chapter each
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Output EPUB path
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Display title of the document
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// URL to fetch or local HTML file
    #[arg(value_name = "INPUT")]
    input: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = linkpress_core::fetch::DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    timeout: u64,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let result = match cli.command {
        Command::Daily(args) => daily(args).await,
        Command::Build(args) => build(args),
        Command::Extract(args) => extract(args).await,
    };

    if let Err(e) = result {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn daily(args: DailyArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    let mut builder = PipelineConfig::builder()
        .count(args.count)
        .timeout(args.timeout)
        .keep_document(args.keep)
        .skip_send(args.skip_send);
    if let Some(output) = &args.output {
        builder = builder.output(output);
    }

    if !args.skip_send {
        let dispatch =
            DispatchConfig::from_parts(args.sender.as_deref(), args.password.as_deref(), args.recipients.as_deref())
                .context("Set GMAIL_ADDRESS, GMAIL_APP_PASSWORD and KINDLE_EMAILS, or pass --skip-send")?;
        builder = builder.dispatch(dispatch);
    }
    let config = builder.build();
    tracing::debug!(?config, transport = ?args.transport, "daily run configured");

    let dispatcher: Option<Box<dyn Dispatcher>> = config.dispatch.clone().map(|dispatch| match args.transport {
        Transport::Smtp => Box::new(SmtpDispatcher::new(dispatch).with_relay(&args.smtp_host, args.smtp_port))
            as Box<dyn Dispatcher>,
        Transport::Spool => Box::new(SpoolDispatcher::new(&args.spool_dir, dispatch)),
    });
    let lister = AlgoliaLister::new(config.fetch.clone());
    let extractor = Extractor::new().with_fetch_config(config.fetch.clone());

    eprintln!("{} {}", "HN Daily for".bold(), today.format("%Y-%m-%d").to_string().bright_white());
    let summary = pipeline::run_daily(
        &config,
        &lister,
        &extractor,
        dispatcher.as_deref(),
        today,
    )
    .await?;

    let outcome = if summary.delivered { "delivered" } else { "compiled" };
    print_success(&format!("Done: {} chapter(s) {}", summary.chapters, outcome));
    if summary.document_kept {
        print_info(&format!("EPUB at {}", summary.document.display()));
    }
    Ok(())
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    pipeline::run_build(&args.files, &args.output, args.title.as_deref(), &Extractor::new())?;
    Ok(())
}

async fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let is_web_url = Url::parse(&args.input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
    let record: ContentRecord = if is_web_url {
        Extractor::new()
            .with_fetch_config(FetchConfig::with_timeout(args.timeout))
            .extract_content(&args.input)
            .await
    } else {
        let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        Extractor::new().extract(&args.input, &html)
    };

    let json = serde_json::to_string_pretty(&record).context("Failed to serialize record")?;
    println!("{}", json);
    Ok(())
}
