//! Bulk SMS over adb from the command line.
//!
//! Reads a numbers file and a content file, connects to a device, then
//! drives the Google Messages UI once per recipient. Exit codes mirror the
//! input checks so wrapper scripts can tell why a run never started:
//! 1 for a missing file or any unexpected failure, 2 when the numbers file
//! has no usable entries, 3 when the content file is empty.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smsblast::{
    input, messages, run_bulk_send, AdbBridge, AdbConfig, AutomationError, Device, InputError,
    RunOptions, RunStats, Timing,
};

#[derive(Parser, Debug)]
#[command(name = "smsblast", version)]
#[command(about = "Bulk SMS through the Google Messages app, driven over adb")]
struct Cli {
    /// Device serial to target (auto-detect when omitted)
    #[arg(short, long)]
    serial: Option<String>,

    /// Leave each message as an unsent draft
    #[arg(short, long)]
    draft: bool,

    /// Delete each conversation after a successful send
    #[arg(short = 'x', long)]
    delete: bool,

    /// Seconds to wait between recipients
    #[arg(short = 't', long, default_value_t = 5)]
    delay: u64,

    /// File of phone numbers, one per line
    #[arg(long, default_value = "numbers.txt")]
    numbers: PathBuf,

    /// File holding the message text on its first line
    #[arg(long, default_value = "content.txt")]
    content: PathBuf,

    /// adb executable (default: adb next to this binary, else the PATH)
    #[arg(long)]
    adb_path: Option<PathBuf>,

    /// Print the current UI tree as JSON and exit
    #[arg(long)]
    dump_ui: bool,
}

#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Automation(#[from] AutomationError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Input(InputError::NoValidNumbers { .. }) => 2,
            AppError::Input(InputError::EmptyMessage { .. }) => 3,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AdbConfig {
        adb_path: resolve_adb_path(cli.adb_path.clone()),
        serial: cli.serial.clone(),
    };

    if cli.dump_ui {
        return dump_ui(config).await;
    }

    let recipients = input::load_recipients(&cli.numbers)?;
    let body = input::load_message_body(&cli.content)?;

    banner();
    print_config(&cli, &recipients, &body);

    let bridge = AdbBridge::connect(config).await?;
    let device = Device::new(Arc::new(bridge), Timing::default());

    messages::launch(&device).await?;
    info!("messages app is up");

    let options = RunOptions {
        draft_only: cli.draft,
        delete_after_send: cli.delete,
        message_delay: Duration::from_secs(cli.delay),
    };
    let stats = run_bulk_send(&device, &recipients, &body, &options).await;

    print_summary(&stats, cli.draft);
    Ok(())
}

async fn dump_ui(config: AdbConfig) -> Result<(), AppError> {
    let bridge = AdbBridge::connect(config).await?;
    let device = Device::new(Arc::new(bridge), Timing::default());
    let snapshot = device.capture_snapshot().await?;
    let json = snapshot
        .to_json()
        .context("rendering the captured UI tree as JSON")?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so --dump-ui output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flag override first, then an adb bundled next to this executable, then
/// whatever the PATH resolves.
fn resolve_adb_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let bundled = dir.join(adb_binary_name());
            if bundled.is_file() {
                return bundled;
            }
        }
    }
    PathBuf::from("adb")
}

fn adb_binary_name() -> &'static str {
    if cfg!(windows) {
        "adb.exe"
    } else {
        "adb"
    }
}

fn banner() {
    println!("{}", "=".repeat(58));
    println!(
        "  {}  bulk SMS via Google Messages over adb",
        "smsblast".bold()
    );
    println!("{}", "=".repeat(58));
}

fn print_config(cli: &Cli, recipients: &[String], body: &str) {
    let preview: String = body.chars().take(48).collect();
    let preview = if preview.len() < body.len() {
        format!("{preview}...")
    } else {
        preview
    };

    let count = recipients.len().to_string();
    println!();
    println!("  recipients    {}", count.as_str().cyan());
    println!("  message       {preview}");
    println!(
        "  mode          {}",
        if cli.draft { "draft only" } else { "send" }
    );
    println!(
        "  cleanup       {}",
        if cli.delete {
            "delete after send"
        } else {
            "keep conversations"
        }
    );
    println!("  delay         {}s", cli.delay);
    println!(
        "  device        {}",
        cli.serial.as_deref().unwrap_or("auto-detect")
    );
    println!();
}


fn print_summary(stats: &RunStats, draft: bool) {
    let verb = if draft { "drafted" } else { "sent" };
    let tally = format!("{}/{}", stats.succeeded, stats.attempted);
    println!();
    println!("{}", "-".repeat(58));
    if stats.failed() == 0 {
        println!(
            "  {verb} {}  ({:.0}%)",
            tally.as_str().green().bold(),
            stats.success_rate()
        );
    } else {
        println!(
            "  {verb} {}  ({:.0}%), {} failed",
            tally.as_str().yellow().bold(),
            stats.success_rate(),
            stats.failed()
        );
    }
    println!("{}", "-".repeat(58));
}
