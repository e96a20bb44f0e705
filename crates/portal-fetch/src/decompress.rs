//! Bounded decompression (spec.md §4.8): inflates aggregator responses when
//! the on-chain record demands it, streamed chunk-by-chunk and capped
//! against decompression bombs. The `max_output_size >= chunk_size`
//! construction-time check lives in `portal_core::PortalConfig::validate`,
//! the only place both values are known before any request is served.

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use std::io::Read;
use thiserror::Error;

pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024;

#[derive(Debug, Error)]
pub enum DecompressError {
    #[error("decompressed output would exceed the {0} byte cap")]
    BombSuspected(u64),
    #[error("decompression stream error: {0}")]
    Stream(String),
}

/// Inflates `body` according to `content_encoding`. Unsupported encodings
/// return the original bytes unchanged (caller logs the warning; this
/// function has no I/O side effects beyond the transform itself).
pub fn decompress(
    body: &[u8],
    content_encoding: &str,
    max_output_size: u64,
    chunk_size: u64,
) -> Result<Vec<u8>, DecompressError> {
    match content_encoding {
        "gzip" => bounded_read(GzDecoder::new(body), max_output_size, chunk_size),
        "deflate" => bounded_read(ZlibDecoder::new(body), max_output_size, chunk_size),
        "deflate-raw" => bounded_read(DeflateDecoder::new(body), max_output_size, chunk_size),
        // "plaintext" and anything unrecognized both pass through unchanged.
        _ => Ok(body.to_vec()),
    }
}

fn bounded_read<R: Read>(
    mut reader: R,
    max_output_size: u64,
    chunk_size: u64,
) -> Result<Vec<u8>, DecompressError> {
    let mut output = Vec::new();
    let mut chunk = vec![0u8; chunk_size as usize];
    loop {
        let read = reader
            .read(&mut chunk)
            .map_err(|e| DecompressError::Stream(e.to_string()))?;
        if read == 0 {
            break;
        }
        output.extend_from_slice(&chunk[..read]);
        if output.len() as u64 > max_output_size {
            return Err(DecompressError::BombSuspected(max_output_size));
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{DeflateEncoder, GzEncoder};
    use flate2::Compression;
    use std::io::Write;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn deflate_raw(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn unsupported_encoding_passes_through() {
        let result = decompress(b"raw bytes", "br", 100, 10).unwrap();
        assert_eq!(result, b"raw bytes");
    }

    #[test]
    fn plaintext_passes_through() {
        let result = decompress(b"raw bytes", "plaintext", 100, 10).unwrap();
        assert_eq!(result, b"raw bytes");
    }

    #[test]
    fn gzip_round_trips_under_the_cap() {
        let original = b"hello world, this is compressed";
        let compressed = gzip(original);
        let result = decompress(&compressed, "gzip", 1024, 64).unwrap();
        assert_eq!(result, original);
    }

    #[test]
    fn deflate_raw_round_trips_under_the_cap() {
        let original = b"raw deflate, no zlib wrapper";
        let compressed = deflate_raw(original);
        let result = decompress(&compressed, "deflate-raw", 1024, 64).unwrap();
        assert_eq!(result, original);
    }

    #[test]
    fn gzip_over_cap_is_rejected() {
        let original = vec![b'a'; 1000];
        let compressed = gzip(&original);
        let result = decompress(&compressed, "gzip", 100, 16);
        assert!(matches!(result, Err(DecompressError::BombSuspected(100))));
    }
}
