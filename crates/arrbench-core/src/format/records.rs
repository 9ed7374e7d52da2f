//! Unformatted sequential binary records.
//!
//! Each record is framed by its payload length in bytes, written before and
//! after the payload:
//!
//! ```text
//! [len: u32 LE][payload: len bytes][len: u32 LE]
//! ```
//!
//! There is no file header. A reader learns how many records exist only by
//! reading until the stream ends exactly at a record boundary.

use std::io::{self, Read, Write};

/// Writes one framed record.
///
/// # Errors
///
/// Returns an error if the payload exceeds `u32::MAX` bytes or the write fails.
pub fn write_record(writer: &mut dyn Write, payload: &[u8]) -> io::Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("record of {} bytes exceeds u32 framing", payload.len()),
        )
    })?;
    let marker = len.to_le_bytes();
    writer.write_all(&marker)?;
    writer.write_all(payload)?;
    writer.write_all(&marker)
}

/// Reads the next framed record.
///
/// Returns `Ok(None)` when the stream ends cleanly before a new record
/// starts. A record cut short, including a partial length marker, is an
/// [`io::ErrorKind::UnexpectedEof`] error; mismatched markers are
/// [`io::ErrorKind::InvalidData`].
///
/// # Errors
///
/// Returns an error for truncated or inconsistent records.
pub fn read_record<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut marker = [0u8; 4];
    match read_marker(reader, &mut marker)? {
        0 => return Ok(None),
        4 => {}
        n => {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("record length marker cut short after {n} bytes"),
            ))
        }
    }
    let len = u32::from_le_bytes(marker);

    // `len` comes from the file; grow with the bytes actually present.
    let mut payload = Vec::new();
    Read::take(&mut *reader, u64::from(len)).read_to_end(&mut payload)?;
    if payload.len() != len as usize {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("record announces {len} bytes, found {}", payload.len()),
        ));
    }

    let mut trailer = [0u8; 4];
    reader.read_exact(&mut trailer)?;
    if trailer != marker {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "record trailer {} does not match leading length {len}",
                u32::from_le_bytes(trailer)
            ),
        ));
    }

    Ok(Some(payload))
}

/// Fills `marker` as far as the stream allows, returning the bytes read.
fn read_marker<R: Read + ?Sized>(reader: &mut R, marker: &mut [u8; 4]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < marker.len() {
        match reader.read(&mut marker[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
