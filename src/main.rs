//! exif-dump - Print the EXIF tags of an image.
//!
//! Reads the file asynchronously in chunks and stops as soon as the EXIF
//! block is complete.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_stream::{config::Config, io::read_async_with_options, ExifError, TagStore};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    debug!(
        path = %config.path.display(),
        chunk_size = config.chunk_size,
        thumbnail = config.thumbnail,
        gps_fold_only = config.gps_fold_only,
        "Starting"
    );

    let result =
        read_async_with_options(&config.path, config.loader_options(), config.chunk_size).await;

    match result {
        Ok(store) => print_tags(&store, config.json),
        Err(ExifError::NoExifData) => {
            eprintln!("{}: no EXIF data found", config.path.display());
            ExitCode::from(2)
        }
        Err(e) => {
            error!("Failed to read {}: {}", config.path.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// Print the tags ordered by id.
fn print_tags(store: &TagStore, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string_pretty(store) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to serialize tags: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    let tags = store.sorted();
    let width = tags
        .iter()
        .map(|tag| tag.text_label().len())
        .max()
        .unwrap_or(0);

    for tag in &tags {
        println!(
            "0x{:04X}  {:<width$}  {}",
            tag.tag_id(),
            tag.text_label(),
            tag.text_value(),
            width = width
        );
    }
    println!();
    println!("Total: {} tag(s)", tags.len());

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_stream=debug,exif_dump=debug"
    } else {
        "exif_stream=info,exif_dump=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
