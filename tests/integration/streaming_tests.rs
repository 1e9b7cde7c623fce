//! Streaming loader integration tests.
//!
//! Tests verify:
//! - The decoded tags do not depend on how the input is split into chunks
//! - The loader stops asking for input once the EXIF block is complete
//! - Inputs without EXIF data end in `NoExifData`
//! - Protocol misuse is reported as a loader error
//! - Blocks larger than the buffer limit decode from their buffered prefix

use exif_stream::format::locate_exif;
use exif_stream::constants::{GPS_ALTITUDE, GPS_LATITUDE, ORIENTATION};
use exif_stream::{
    read_bytes, ExifError, LoaderError, LoaderOptions, StreamingLoader, TagStore, WriteOutcome,
    DEFAULT_MAX_BUFFER_SIZE,
};

use super::test_utils::{jpeg_without_exif, sample_exif, sample_jpeg, ByteOrderType, JpegBuilder};

/// Feed `data` in chunks of `size`, stopping once the header is found.
fn load_in_chunks(data: &[u8], size: usize) -> Result<TagStore, ExifError> {
    let mut loader = StreamingLoader::new();
    for chunk in data.chunks(size) {
        if loader.write(chunk)?.is_header_found() {
            break;
        }
    }
    loader.finalize()
}

/// Feed `data` split at the given offsets.
fn load_split(data: &[u8], splits: &[usize]) -> Result<TagStore, ExifError> {
    let mut loader = StreamingLoader::new();
    let mut start = 0;
    for &end in splits.iter().chain(std::iter::once(&data.len())) {
        if end > start && loader.write(&data[start..end])?.is_header_found() {
            break;
        }
        start = end.max(start);
    }
    loader.finalize()
}

fn exif_block(order: ByteOrderType) -> Vec<u8> {
    let mut block = b"Exif\0\0".to_vec();
    block.extend_from_slice(&sample_exif(order));
    block
}

// =============================================================================
// Chunk Size Invariance
// =============================================================================

#[test]
fn test_chunk_size_invariance() {
    let inputs = [
        sample_jpeg(ByteOrderType::LittleEndian),
        sample_jpeg(ByteOrderType::BigEndian),
        sample_exif(ByteOrderType::LittleEndian),
        exif_block(ByteOrderType::BigEndian),
    ];

    for data in &inputs {
        let whole = read_bytes(data).unwrap();
        assert!(!whole.is_empty());

        for size in 1..=64 {
            let chunked = load_in_chunks(data, size).unwrap();
            assert_eq!(chunked, whole, "chunk size {}", size);
        }
    }
}

#[test]
fn test_uneven_splits() {
    let data = sample_jpeg(ByteOrderType::BigEndian);
    let whole = read_bytes(&data).unwrap();

    let split_sets = vec![
        vec![1, 2, 3, 5, 8, 13, 21, 34, 55, 89],
        vec![3, 4, data.len() / 2],
        vec![data.len() - 1],
        vec![0, 0, 7, 7, data.len() / 3],
    ];
    for splits in &split_sets {
        assert_eq!(load_split(&data, splits).unwrap(), whole, "{:?}", splits);
    }
}

// =============================================================================
// Early Stop
// =============================================================================

#[test]
fn test_header_found_before_end_of_jpeg() {
    let data = sample_jpeg(ByteOrderType::LittleEndian);
    let mut loader = StreamingLoader::new();

    let outcome = loader.write(&data).unwrap();
    assert!(outcome.is_header_found());
    assert!(outcome.consumed() < data.len());

    // Later writes are ignored
    assert_eq!(
        loader.write(&data).unwrap(),
        WriteOutcome::HeaderFound { consumed: 0 }
    );

    let store = loader.finalize().unwrap();
    assert_eq!(store, read_bytes(&data).unwrap());
}

#[test]
fn test_trailing_image_data_is_never_needed() {
    let data = sample_jpeg(ByteOrderType::BigEndian);
    let mut loader = StreamingLoader::new();
    let mut fed = 0;

    for chunk in data.chunks(16) {
        let outcome = loader.write(chunk).unwrap();
        fed += outcome.consumed();
        if outcome.is_header_found() {
            break;
        }
    }

    assert!(fed < data.len());
    assert_eq!(&data[fed..fed + 2], &[0xFF, 0xDB]);
    assert!(loader.finalize().is_ok());
}

#[test]
fn test_raw_streams_need_finalize() {
    let data = sample_exif(ByteOrderType::LittleEndian);
    let mut loader = StreamingLoader::new();

    for chunk in data.chunks(10) {
        let outcome = loader.write(chunk).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Continue {
                consumed: chunk.len()
            }
        );
    }
    assert_eq!(loader.buffered(), data.len());
    assert!(!loader.finalize().unwrap().is_empty());
}

// =============================================================================
// No EXIF Data
// =============================================================================

#[test]
fn test_jpeg_without_exif() {
    let data = jpeg_without_exif();
    let err = load_in_chunks(&data, 5).unwrap_err();
    assert!(err.is_no_exif_data());
}

#[test]
fn test_truncated_jpeg_before_exif() {
    let data = sample_jpeg(ByteOrderType::LittleEndian);
    let mut loader = StreamingLoader::new();

    // SOI and part of the JFIF segment only
    loader.write(&data[..8]).unwrap();
    assert!(loader.finalize().unwrap_err().is_no_exif_data());
}

#[test]
fn test_unknown_format() {
    let mut loader = StreamingLoader::new();
    let err = loader.write(b"GIF89a").unwrap_err();
    assert!(err.is_no_exif_data());
}

#[test]
fn test_finalize_without_writes() {
    let mut loader = StreamingLoader::new();
    assert!(loader.finalize().unwrap_err().is_no_exif_data());
}

#[test]
fn test_truncated_exif_segment_still_decodes() {
    let data = sample_jpeg(ByteOrderType::LittleEndian);
    let mut loader = StreamingLoader::new();

    // Stop inside the EXIF segment, right after IFD0's six entries
    let tiff_start = locate_exif(&data).unwrap().start;
    let cut = tiff_start + 8 + 2 + 6 * 12;
    let outcome = loader.write(&data[..cut]).unwrap();
    assert!(!outcome.is_header_found());

    let store = loader.finalize().unwrap();
    assert!(store.contains(0x0112u16));
}

// =============================================================================
// Protocol Errors
// =============================================================================

#[test]
fn test_empty_chunk() {
    let mut loader = StreamingLoader::new();
    assert!(matches!(
        loader.write(&[]),
        Err(ExifError::Loader(LoaderError::EmptyChunk))
    ));

    // The loader is still usable
    let data = sample_jpeg(ByteOrderType::LittleEndian);
    assert!(loader.write(&data).unwrap().is_header_found());
}

#[test]
fn test_use_after_finalize() {
    let data = sample_jpeg(ByteOrderType::BigEndian);
    let mut loader = StreamingLoader::new();
    loader.write(&data).unwrap();
    loader.finalize().unwrap();

    assert!(matches!(
        loader.write(&data),
        Err(ExifError::Loader(LoaderError::AlreadyFinalized))
    ));
    assert!(matches!(
        loader.finalize(),
        Err(ExifError::Loader(LoaderError::AlreadyFinalized))
    ));
}

// =============================================================================
// Buffer Limit
// =============================================================================

/// Feed `data` in chunks of `size` and return the bytes used before the
/// loader asked to stop.
fn feed_until_header(loader: &mut StreamingLoader, data: &[u8], size: usize) -> usize {
    let mut fed = 0;
    for chunk in data.chunks(size) {
        let outcome = loader.write(chunk).unwrap();
        fed += outcome.consumed();
        if outcome.is_header_found() {
            break;
        }
    }
    fed
}

#[test]
fn test_buffer_limit_stops_raw_streams() {
    let data = sample_exif(ByteOrderType::LittleEndian);
    let limit = data.len() / 2;
    let mut loader =
        StreamingLoader::with_options(LoaderOptions::default().with_max_buffer_size(limit));

    assert_eq!(feed_until_header(&mut loader, &data, 8), limit);
    assert_eq!(loader.buffered(), limit);

    // IFD0's own entries are inside the buffered prefix
    let store = loader.finalize().unwrap();
    assert_eq!(store.get(ORIENTATION).and_then(|t| t.int_value()), Some(6));
}

#[test]
fn test_buffer_limit_cuts_jpeg_segments() {
    let tiff = sample_exif(ByteOrderType::BigEndian);
    let data = JpegBuilder::new().with_exif(&tiff).build();
    let tiff_start = locate_exif(&data).unwrap().start;
    let limit = tiff.len() - 1;
    let mut loader =
        StreamingLoader::with_options(LoaderOptions::default().with_max_buffer_size(limit));

    assert_eq!(feed_until_header(&mut loader, &data, 32), tiff_start + limit);

    // GPSAltitude is the last value in the block and no longer fits
    let store = loader.finalize().unwrap();
    assert!(store.contains(GPS_LATITUDE));
    assert!(!store.contains(GPS_ALTITUDE));
}

#[test]
fn test_large_padded_tiff_decodes() {
    let tiff = sample_exif(ByteOrderType::LittleEndian);
    let mut data = tiff.clone();
    data.resize(DEFAULT_MAX_BUFFER_SIZE + 1024 * 1024, 0);

    assert_eq!(read_bytes(&data).unwrap(), read_bytes(&tiff).unwrap());
}
