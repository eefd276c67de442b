//! Thin layer over `flate2`: the DEFLATE codec itself is never reimplemented
//! here, this module only drives it over a complete in-memory buffer.

use flate2::{bufread::GzDecoder, Decompress, DecompressError, FlushDecompress, Status};
use log::{debug, warn};
use std::io::{self, Read};

const MIN_CHUNK: usize = 32 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("corrupted deflate stream: {0}")]
    Corrupted(#[from] DecompressError),

    #[error("truncated deflate stream: input ended after {consumed} bytes without end of stream")]
    Truncated { consumed: usize },

    #[error("gzip member: {0}")]
    Gzip(#[source] io::Error),
}
use Error::*;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Inflate a complete stream in one pass.
///
/// With `zlib_header` set, `stream` must start with the zlib header and the
/// codec verifies the Adler-32 trailer; otherwise `stream` is raw DEFLATE.
/// Bytes after the end of the stream are ignored.
pub fn inflate(stream: &[u8], zlib_header: bool) -> Result<Vec<u8>> {
    let mut decompress = Decompress::new(zlib_header);
    let mut decoded = Vec::with_capacity(stream.len().saturating_mul(4).max(MIN_CHUNK));

    loop {
        if decoded.len() == decoded.capacity() {
            decoded.reserve(decoded.capacity().max(MIN_CHUNK));
        }
        let consumed = decompress.total_in();
        let produced = decompress.total_out();
        let status = decompress.decompress_vec(
            &stream[consumed as usize..],
            &mut decoded,
            FlushDecompress::None,
        )?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // A call may return early after flushing pending window bytes,
                // so only a call that moves nothing with room to spare means
                // the input is exhausted.
                let stalled =
                    decompress.total_in() == consumed && decompress.total_out() == produced;
                if stalled && decoded.len() < decoded.capacity() {
                    return Err(Truncated {
                        consumed: consumed as usize,
                    });
                }
            }
        }
    }

    let consumed = decompress.total_in() as usize;
    if consumed < stream.len() {
        warn!(
            "ignoring {} trailing bytes after end of stream",
            stream.len() - consumed
        );
    }
    debug!("inflated {consumed} bytes into {}", decoded.len());

    Ok(decoded)
}

/// Decode a single gzip member; `flate2` checks the CRC-32 and ISIZE trailer.
/// Bytes after the member are ignored.
pub fn gunzip(member: &[u8]) -> Result<Vec<u8>> {
    // The buffered decoder reads straight from the slice, so what it leaves
    // behind is exactly what follows the member.
    let mut decoder = GzDecoder::new(member);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).map_err(Gzip)?;

    let trailing = decoder.into_inner().len();
    if trailing > 0 {
        warn!("ignoring {trailing} trailing bytes after end of gzip member");
    }
    debug!(
        "gunzipped {} bytes into {}",
        member.len() - trailing,
        decoded.len()
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{
        write::{DeflateEncoder, GzEncoder, ZlibEncoder},
        Compression,
    };
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_inflate_zlib() {
        assert_eq!(inflate(&zlib(b"hello world"), true).unwrap(), b"hello world");
    }

    #[test]
    fn test_inflate_empty() {
        // zlib.compress(b"")
        let stream = [0x78, 0x9c, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert!(inflate(&stream, true).unwrap().is_empty());
    }

    #[test]
    fn test_inflate_grows_output() {
        // Highly compressible: output is far larger than the initial capacity
        let data = vec![0xAB; 4 * 1024 * 1024];
        assert_eq!(inflate(&zlib(&data), true).unwrap(), data);
    }

    /// Letter cycle with roughly one byte in `noise` replaced by
    /// pseudo-random data: compresses well without being trivial.
    fn noisy_text(len: usize, noise: u32) -> Vec<u8> {
        let mut state: u32 = 0x2545_F491;
        (0..len)
            .map(|i| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                if (state >> 16) % noise == 0 {
                    (state >> 24) as u8
                } else {
                    b'a' + (i % 26) as u8
                }
            })
            .collect()
    }

    #[test]
    fn test_inflate_output_past_initial_capacity() {
        // Compressed size over 8 KiB and ratio over 4: the first output
        // buffer fills in the middle of the codec's 32 KiB window
        let data = noisy_text(71_271, 16);
        let stream = zlib(&data);
        assert!(stream.len() > 8 * 1024);
        assert!(data.len() > 4 * stream.len());
        assert_eq!(inflate(&stream, true).unwrap(), data);
    }

    #[test]
    fn test_inflate_unaligned_capacities() {
        for len in (40_000..400_000).step_by(23_117) {
            for noise in [8, 16, 64] {
                let data = noisy_text(len, noise);
                assert_eq!(
                    inflate(&zlib(&data), true).unwrap(),
                    data,
                    "len={len} noise={noise}"
                );
                assert_eq!(inflate(&deflate(&data), false).unwrap(), data);
            }
        }
    }

    #[test]
    fn test_inflate_raw() {
        let data = b"raw deflate without any envelope".repeat(10);
        assert_eq!(inflate(&deflate(&data), false).unwrap(), data);
    }

    #[test]
    fn test_inflate_raw_rejects_zlib_header_mode() {
        // A raw stream does not start with a valid zlib header
        let stream = deflate(b"some data, some data, some data");
        assert!(inflate(&stream, true).is_err());
    }

    #[test]
    fn test_inflate_truncated() {
        let data: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
        let stream = zlib(&data);
        let cut = &stream[..stream.len() / 2];
        assert!(matches!(inflate(cut, true), Err(Truncated { .. })));
    }

    #[test]
    fn test_inflate_missing_trailer() {
        let stream = zlib(b"hello world");
        let cut = &stream[..stream.len() - 4];
        assert!(matches!(inflate(cut, true), Err(Truncated { .. })));
    }

    #[test]
    fn test_inflate_checksum_mismatch() {
        let mut stream = zlib(b"hello world");
        let last = stream.len() - 1;
        stream[last] ^= 0xFF;
        assert!(matches!(inflate(&stream, true), Err(Corrupted(_))));
    }

    #[test]
    fn test_inflate_ignores_trailing_bytes() {
        let mut stream = zlib(b"hello world");
        stream.extend_from_slice(b"garbage");
        assert_eq!(inflate(&stream, true).unwrap(), b"hello world");
    }

    #[test]
    fn test_gunzip() {
        assert_eq!(gunzip(&gzip(b"hello gzip")).unwrap(), b"hello gzip");
    }

    #[test]
    fn test_gunzip_large_member() {
        let data = noisy_text(150_000, 16);
        assert_eq!(gunzip(&gzip(&data)).unwrap(), data);
    }

    #[test]
    fn test_gunzip_ignores_trailing_bytes() {
        let mut member = gzip(b"hello gzip");
        member.extend_from_slice(b"garbage");
        assert_eq!(gunzip(&member).unwrap(), b"hello gzip");
    }

    #[test]
    fn test_gunzip_missing_trailer() {
        let member = gzip(b"hello gzip");
        assert!(matches!(gunzip(&member[..member.len() - 4]), Err(Gzip(_))));
    }
}
