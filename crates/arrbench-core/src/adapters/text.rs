//! Delimited text (CSV), optionally gzip-compressed.
//!
//! One line per row, comma-separated, no header. The shape is recovered from
//! the content: rows from the line count, columns from the first line. Text
//! carries no element type, so only `float64` is supported; floats are written
//! in shortest round-trip form so parsing reproduces the exact bits.

use std::path::Path;

use crate::array::{Array, DType, Elements};
use crate::durable::{open_reader, write_durably, Compression};
use crate::error::{Error, Result};
use crate::method::StorageMethod;

/// Comma-delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Csv {
    compression: Compression,
}

impl Csv {
    /// Plain text.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            compression: Compression::None,
        }
    }

    /// gzip-compressed text at `level`.
    #[must_use]
    pub const fn gzip(level: u32) -> Self {
        Self {
            compression: Compression::Gzip(level),
        }
    }
}

impl StorageMethod for Csv {
    fn name(&self) -> &'static str {
        match self.compression {
            Compression::None => "Csv",
            Compression::Gzip(_) => "CsvGzip",
        }
    }

    fn supports(&self, dtype: DType) -> bool {
        dtype == DType::Float64
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        let Elements::Float64(values) = array.elements() else {
            return Err(Error::UnsupportedElementType {
                method: self.name().to_string(),
                dtype: array.dtype(),
            });
        };

        write_durably(path, self.compression, |out| {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(out);
            for row in values.chunks(array.cols()) {
                writer
                    .serialize(row)
                    .map_err(|e| Error::codec(self.name(), e))?;
            }
            writer.flush()?;
            Ok(())
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let input = open_reader(path, self.compression)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(input);

        let mut values = Vec::new();
        let mut rows = 0;
        let mut cols = 0;
        for record in reader.deserialize::<Vec<f64>>() {
            let row = record.map_err(|e| Error::codec(self.name(), e))?;
            if rows == 0 {
                cols = row.len();
            }
            values.extend(row);
            rows += 1;
        }

        Array::new(rows, cols, values)
    }
}
