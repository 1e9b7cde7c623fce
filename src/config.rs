//! Configuration for the `exif-dump` binary.
//!
//! Settings come from command-line arguments via clap, with environment
//! variables as a fallback:
//!
//! - `EXIF_CHUNK_SIZE` - Read chunk size in bytes (default: 4096)
//! - `EXIF_MAX_BUFFER_SIZE` - Largest EXIF block to buffer (default: 16 MiB)
//! - `EXIF_THUMBNAIL` - Also decode the thumbnail directory (default: false)
//! - `EXIF_GPS_FOLD_ONLY` - Fold only GPS coordinate rationals (default: false)
//! - `EXIF_JSON` - Print JSON instead of text (default: false)
//!
//! # Example
//!
//! ```ignore
//! use exif_stream::config::Config;
//!
//! let config = Config::parse();
//! let options = config.loader_options();
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::exif::{FoldScope, LoaderOptions, DEFAULT_MAX_BUFFER_SIZE};
use crate::io::DEFAULT_CHUNK_SIZE;

/// Smallest accepted `max_buffer_size`: a TIFF header plus an empty IFD.
pub const MIN_BUFFER_SIZE: usize = 14;

/// Largest accepted read chunk (1 MiB).
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// exif-dump - Print the EXIF tags of an image.
///
/// Reads JPEG, TIFF, or bare EXIF files, stopping as soon as the EXIF block
/// has been read.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-dump")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Image file to read.
    pub path: PathBuf,

    // =========================================================================
    // Reading
    // =========================================================================
    /// Size of each read, in bytes.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "EXIF_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Largest EXIF block to buffer, in bytes.
    ///
    /// Only bare TIFF/EXIF input can come near this; JPEG segments are
    /// limited to 64 KiB.
    #[arg(long, default_value_t = DEFAULT_MAX_BUFFER_SIZE, env = "EXIF_MAX_BUFFER_SIZE")]
    pub max_buffer_size: usize,

    // =========================================================================
    // Decoding
    // =========================================================================
    /// Also decode the thumbnail directory (IFD1).
    ///
    /// Primary image tags still win when both directories share an id.
    #[arg(long, default_value_t = false, env = "EXIF_THUMBNAIL")]
    pub thumbnail: bool,

    /// Fold multi-component rationals only for GPS coordinates.
    ///
    /// Other multi-component rationals then keep their first component.
    #[arg(long, default_value_t = false, env = "EXIF_GPS_FOLD_ONLY")]
    pub gps_fold_only: bool,

    // =========================================================================
    // Output
    // =========================================================================
    /// Print tags as JSON.
    #[arg(long, default_value_t = false, env = "EXIF_JSON")]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "chunk_size must be between 1 and {MAX_CHUNK_SIZE} bytes"
            ));
        }

        if self.max_buffer_size < MIN_BUFFER_SIZE {
            return Err(format!(
                "max_buffer_size must be at least {MIN_BUFFER_SIZE} bytes"
            ));
        }

        if self.path.as_os_str().is_empty() {
            return Err("An image path is required".to_string());
        }

        Ok(())
    }

    /// Loader settings derived from the flags.
    pub fn loader_options(&self) -> LoaderOptions {
        let fold_scope = if self.gps_fold_only {
            FoldScope::GpsCoordinates
        } else {
            FoldScope::AllRationals
        };

        LoaderOptions::default()
            .with_max_buffer_size(self.max_buffer_size)
            .with_thumbnail(self.thumbnail)
            .with_fold_scope(fold_scope)
    }
}

// =============================================================================
// Tests
// =============================================================================
