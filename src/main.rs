//! bucketshelf CLI: list a bucket as sections, download objects with progress

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

use bucketshelf::client::create_client;
use bucketshelf::download::{download_object, DownloadEvent, DownloadRegistry};
use bucketshelf::listing::list_objects;
use bucketshelf::sections::classify;
use bucketshelf::signer::S3Signer;
use bucketshelf::{Error, ShelfConfig};

#[derive(Parser)]
#[command(
    name = "bucketshelf",
    about = "Browse and download files from an S3-compatible bucket"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List bucket contents grouped into sections
    List {
        /// Print sections as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Download one or more objects by key
    Download {
        /// Object keys to download
        #[arg(required = true)]
        keys: Vec<String>,
        /// Directory to save files under
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();

    let config = match ShelfConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: ShelfConfig) -> bucketshelf::Result<()> {
    let client = create_client(&config);

    match command {
        Command::List { json } => {
            let records = list_objects(&client, &config.bucket).await?;
            let sections = classify(&records);
            if json {
                let rendered = serde_json::to_string_pretty(&sections)
                    .map_err(|e| Error::Other(e.to_string()))?;
                println!("{}", rendered);
            } else {
                for section in &sections {
                    println!("{}", section.label);
                    for record in &section.members {
                        match record.size {
                            Some(size) => println!("  {}  {} bytes", record.key, size),
                            None => println!("  {}", record.key),
                        }
                    }
                }
            }
        }
        Command::Download { keys, dest } => {
            let http = reqwest::Client::new();
            let signer = Arc::new(S3Signer::new(client, config.bucket.clone()));
            let registry = Arc::new(DownloadRegistry::new());
            let (events, mut event_rx) = mpsc::unbounded_channel();

            let mut handles = Vec::with_capacity(keys.len());
            for key in keys {
                let http = http.clone();
                let signer = signer.clone();
                let registry = registry.clone();
                let events = events.clone();
                let dest = dest.clone();
                handles.push(tokio::spawn(async move {
                    download_object(&http, signer.as_ref(), &registry, &events, &key, &dest).await
                }));
            }
            // The receive loop ends once every worker has dropped its sender
            drop(events);

            while let Some(event) = event_rx.recv().await {
                match event {
                    DownloadEvent::Progress(progress) => {
                        println!("{}: {}%", progress.key, progress.percent);
                    }
                    DownloadEvent::PhaseChanged(change) => match change.error {
                        Some(err) => println!("{}: {} ({})", change.key, change.phase, err),
                        None => println!("{}: {}", change.key, change.phase),
                    },
                }
            }

            let mut failed = false;
            for handle in handles {
                match handle.await {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => {
                        error!("download_error: {}", err);
                        failed = true;
                    }
                    Err(err) => {
                        error!("download_task_panicked: {}", err);
                        failed = true;
                    }
                }
            }
            if failed {
                return Err(Error::Other("one or more downloads failed".to_string()));
            }
        }
    }

    Ok(())
}
