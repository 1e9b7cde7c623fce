//! Tag decoding.
//!
//! The pipeline, in order:
//!
//! - [`StreamingLoader`] buffers the EXIF block of an incoming byte stream
//! - a [`RawEntrySource`] walks the block's directories
//! - [`TagDecoder`] turns each [`RawEntry`] into a typed [`Tag`]
//! - [`TagStore`] collects the tags by id, last one wins
//!
//! [`decode_source`] runs the last three steps over any source.

pub mod constants;
mod decoder;
mod entry;
mod loader;
mod store;
mod tag;

use tracing::{debug, trace};

pub use decoder::{FoldScope, TagDecoder};
pub use entry::{FormatCode, RawEntry, RawEntrySource};
pub use loader::{LoaderOptions, StreamingLoader, WriteOutcome, DEFAULT_MAX_BUFFER_SIZE};
pub use store::TagStore;
pub use tag::{Tag, TagValue};

/// Decode every entry of `source` into a fresh store.
///
/// Entries are decoded one at a time in walk order; each payload borrow ends
/// with its decode call.
pub fn decode_source<S>(source: &S, decoder: &TagDecoder) -> TagStore
where
    S: RawEntrySource + ?Sized,
{
    let mut store = TagStore::new();
    let mut decoded = 0usize;

    for entry in source.entries() {
        let tag = decoder.decode(&entry);
        trace!(
            tag_id = tag.tag_id(),
            ifd = entry.ifd.name(),
            label = tag.text_label(),
            value = tag.text_value(),
            "Decoded tag"
        );
        if store.insert(tag).is_some() {
            trace!(tag_id = entry.tag_id, "Replaced earlier tag with the same id");
        }
        decoded += 1;
    }

    debug!(entries = decoded, tags = store.len(), "Decoded EXIF directory");
    store
}
