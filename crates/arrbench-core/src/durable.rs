//! Durable file I/O shared by the storage methods.
//!
//! Every write goes through the same sequence: create the file, buffer it,
//! optionally wrap it in a gzip stream, run the encoder, finish the gzip
//! trailer, flush the buffer, then `fsync` the file. Save timings therefore
//! include the time for the bytes to reach the device. File handles are owned
//! locally, so they are released on every exit path.

use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Optional compression layer wrapped around a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Raw stream.
    None,
    /// gzip stream at the given level (0-9).
    Gzip(u32),
}

impl Compression {
    /// Default gzip level.
    pub const DEFAULT_GZIP_LEVEL: u32 = 6;

    /// gzip at [`Self::DEFAULT_GZIP_LEVEL`].
    #[must_use]
    pub const fn gzip() -> Self {
        Self::Gzip(Self::DEFAULT_GZIP_LEVEL)
    }
}

/// Writes `path` through `encode` and forces the result onto the device.
///
/// `encode` receives the (possibly compressing) writer and must write the
/// complete encoding. Any error from `encode` is returned as-is; the partial
/// file is left behind for the caller to deal with.
///
/// # Errors
///
/// Returns an error if creating, writing, flushing or syncing the file fails,
/// or if `encode` fails.
pub fn write_durably<F>(path: &Path, compression: Compression, encode: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match compression {
        Compression::None => encode(&mut writer)?,
        Compression::Gzip(level) => {
            let mut encoder = GzEncoder::new(&mut writer, flate2::Compression::new(level));
            encode(&mut encoder)?;
            encoder.finish()?;
        }
    }

    sync_writer(writer)
}

/// Flushes a buffered file writer and `fsync`s the underlying file.
///
/// Used directly by formats whose encoder needs to own a seekable writer.
///
/// # Errors
///
/// Returns an error if flushing or syncing fails.
pub fn sync_writer(mut writer: BufWriter<File>) -> Result<()> {
    writer.flush()?;
    writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?
        .sync_all()?;
    Ok(())
}

/// Opens `path` for buffered reading, transparently undoing `compression`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened (including not-found).
pub fn open_reader(path: &Path, compression: Compression) -> Result<Box<dyn BufRead>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(match compression {
        Compression::None => Box::new(reader),
        Compression::Gzip(_) => Box::new(BufReader::new(GzDecoder::new(reader))),
    })
}

/// On-disk size of `path` in bytes.
///
/// # Errors
///
/// Returns an error if the file metadata cannot be read.
pub fn file_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}
