//! `"<dtype> <rows> <cols>\n"` header line used by the raw-binary family.

use std::io::{BufRead, Write};

use crate::array::{Array, DType};
use crate::error::{Error, Result};

/// Parsed header: element type and shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Element type of the payload.
    pub dtype: DType,
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub cols: usize,
}

impl Header {
    /// Header describing `array`.
    #[must_use]
    pub fn of(array: &Array) -> Self {
        Self {
            dtype: array.dtype(),
            rows: array.rows(),
            cols: array.cols(),
        }
    }

    /// Header line without the trailing newline, e.g. `"float64 4 3"`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {} {}", self.dtype, self.rows, self.cols)
    }

    /// Payload length in bytes implied by this header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the size overflows `usize`.
    pub fn payload_len(&self) -> Result<usize> {
        self.rows
            .checked_mul(self.cols)
            .and_then(|count| count.checked_mul(self.dtype.width()))
            .ok_or_else(|| {
                Error::InvalidHeader(format!("shape in '{}' overflows the payload size", self.line()))
            })
    }

    /// Writes the newline-terminated header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", self.line())?;
        Ok(())
    }

    /// Parses a header line as written by [`Header::line`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] unless the line holds exactly an
    /// element-type token and two integers whose payload size fits `usize`.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let (Some(dtype), Some(rows), Some(cols), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(Error::InvalidHeader(format!(
                "expected '<dtype> <rows> <cols>', got '{}'",
                line.trim_end()
            )));
        };

        let dimension = |token: &str| {
            token
                .parse::<usize>()
                .map_err(|e| Error::InvalidHeader(format!("bad dimension '{token}': {e}")))
        };

        let header = Self {
            dtype: dtype.parse()?,
            rows: dimension(rows)?,
            cols: dimension(cols)?,
        };
        header.payload_len()?;
        Ok(header)
    }

    /// Reads and parses one newline-terminated header line.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the line is not terminated, or it
    /// does not parse.
    pub fn read_from(reader: &mut dyn BufRead) -> Result<Self> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if !line.ends_with('\n') {
            return Err(Error::InvalidHeader(
                "header line is not newline-terminated".to_string(),
            ));
        }
        Self::parse(&line)
    }
}
