pub mod frame;
pub mod framing;
pub mod inflate;
pub mod parsing;

use log::debug;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use Error as ZlibLibError;

pub use frame::Frame;
pub use framing::Framing;
pub use parsing::*;

/// Suffix appended to the input path to name the output file.
pub const OUTPUT_SUFFIX: &str = ".bin";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error(transparent)]
    FrameError(#[from] frame::Error),
}

type Result<T, E = Error> = std::result::Result<T, E>;

pub fn decode(bytes: &[u8], framing: Framing, info: bool) -> Result<Vec<u8>> {
    let frame = Frame::parse(bytes, framing)?;
    if info {
        println!("{:#x?}", frame);
    }

    Ok(frame.decode()?)
}

/// Path of the decompressed file: `.bin` appended, never substituted.
/// # Example
/// ```
/// # use std::path::Path;
/// # use zlib_lib::output_path;
/// assert_eq!(output_path(Path::new("archive.dat")), Path::new("archive.dat.bin"));
/// assert_eq!(output_path(Path::new("noext")), Path::new("noext.bin"));
/// ```
pub fn output_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(OUTPUT_SUFFIX);
    PathBuf::from(path)
}

/// Read `input` whole, decode it and write the result next to it.
///
/// Nothing is written unless decoding succeeds. A failing write may leave a
/// partial output file behind.
pub fn decompress_file(input: &Path, framing: Framing, info: bool) -> Result<PathBuf> {
    let bytes = fs::read(input).map_err(|source| Error::ReadInput {
        path: input.to_owned(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), input.display());

    let decoded = decode(&bytes, framing, info)?;
    drop(bytes);

    let output = output_path(input);
    fs::write(&output, &decoded).map_err(|source| Error::WriteOutput {
        path: output.clone(),
        source,
    })?;
    debug!("wrote {} bytes to {}", decoded.len(), output.display());

    Ok(output)
}
