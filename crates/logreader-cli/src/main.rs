//! Logreader CLI
//!
//! Thin orchestration over the RPC client: connects to a running log
//! server on a caller-supplied TCP port, fetches matching log files, and
//! prints them. The server itself is started and stopped elsewhere.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use logreader_rpc::{RpcClient, fetch_log_files};
use logreader_types::{LogFile, LogFileList};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logreader CLI
#[derive(Parser)]
#[command(name = "logreader")]
#[command(about = "Fetch and display log files from a running log server")]
#[command(version)]
#[command(after_help = "\
Examples:
  logreader list --port 4815            List every log file the server can see
  logreader list --port 4815 app        List log files whose name contains 'app'
  logreader show --port 4815 /var/log/app.log
                                        Print one file's content
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List log files known to the server
    List {
        /// TCP port of the running log server
        #[arg(long)]
        port: u16,

        /// Filename search string (empty matches every file)
        #[arg(default_value = "")]
        search: String,
    },

    /// Print the content of one log file
    Show {
        /// TCP port of the running log server
        #[arg(long)]
        port: u16,

        /// Path of the file to print, as reported by `list`
        path: String,
    },
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("logreader=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { port, search } => run_list(port, &search).await,
        Commands::Show { port, path } => run_show(port, &path).await,
    }
}

/// Connect, fetch matching files, disconnect.
async fn fetch(port: u16, search: &str) -> Result<LogFileList> {
    let client = RpcClient::new();
    client.connect(port).await.with_context(|| {
        format!("Failed to connect to log server on port {port}. Is it running?")
    })?;

    debug!(port, search, "fetching log files");
    let result = fetch_log_files(&client, search)
        .await
        .context("get_logfiles request failed");

    client.disconnect().await;
    result
}

async fn run_list(port: u16, search: &str) -> Result<()> {
    let logs = fetch(port, search).await?;

    if logs.files.is_empty() {
        println!("No log files found.");
        return Ok(());
    }

    println!("\nLog files ({}):\n", logs.files.len());
    for file in &logs.files {
        print_summary(file);
    }
    println!();

    Ok(())
}

fn print_summary(file: &LogFile) {
    if let Some(error) = &file.error {
        println!("  {:<48} error: {error}", file.path);
    } else if file.is_truncated() {
        println!("  {:<48} {} bytes (truncated)", file.path, file.content.len());
    } else {
        println!("  {:<48} {} bytes", file.path, file.content.len());
    }
}

async fn run_show(port: u16, path: &str) -> Result<()> {
    // Search on the file name so the server only reads candidate files
    let search = std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);

    let logs = fetch(port, search).await?;

    let Some(file) = logs.files.iter().find(|file| file.path == path) else {
        bail!("Server reported no log file at {path}");
    };

    if let Some(error) = &file.error {
        bail!("Server could not read {path}: {error}");
    }

    print!("{}", file.content);
    if file.is_truncated() {
        eprintln!("[content truncated by the server]");
    }

    Ok(())
}
