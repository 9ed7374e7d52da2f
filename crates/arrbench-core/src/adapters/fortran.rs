//! Unformatted sequential records, one `float64` row per record.
//!
//! No header is written; the row count comes from how many records can be
//! read before end of file, the column count from the record length.
//!
//! Only `float64` is supported. Other element types are widened to `float64`
//! on save without complaint and come back as `float64`, so they never verify.

use std::borrow::Cow;
use std::path::Path;

use crate::array::{Array, DType, Element, Elements};
use crate::durable::{open_reader, write_durably, Compression};
use crate::error::{Error, Result};
use crate::format::records::{read_record, write_record};
use crate::method::StorageMethod;

const F64_WIDTH: usize = std::mem::size_of::<f64>();

/// Sequential `float64` records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FortranUnformatted;

impl StorageMethod for FortranUnformatted {
    fn name(&self) -> &'static str {
        "FortranUnformatted"
    }

    fn supports(&self, dtype: DType) -> bool {
        dtype == DType::Float64
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        let values: Cow<'_, [f64]> = match array.elements() {
            Elements::Float64(values) => Cow::Borrowed(values),
            other => Cow::Owned(other.to_f64_vec()),
        };

        write_durably(path, Compression::None, |out| {
            let mut record = Vec::with_capacity(array.cols() * F64_WIDTH);
            for row in values.chunks(array.cols()) {
                record.clear();
                for value in row {
                    record.extend_from_slice(&value.to_le_bytes());
                }
                write_record(out, &record)?;
            }
            Ok(())
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let mut input = open_reader(path, Compression::None)?;

        let mut values = Vec::new();
        let mut rows = 0;
        let mut cols = 0;
        while let Some(record) =
            read_record(input.as_mut()).map_err(|e| Error::codec(self.name(), e))?
        {
            if record.len() % F64_WIDTH != 0 {
                return Err(Error::codec(
                    self.name(),
                    format!("record {rows} has {} bytes, not whole float64s", record.len()),
                ));
            }
            let width = record.len() / F64_WIDTH;
            if rows == 0 {
                cols = width;
            } else if width != cols {
                return Err(Error::codec(
                    self.name(),
                    format!("record {rows} holds {width} values, expected {cols}"),
                ));
            }
            values.extend(record.chunks_exact(F64_WIDTH).map(f64::get_le));
            rows += 1;
        }

        Array::new(rows, cols, values)
    }
}
