//! Minimal MAT-file level 5 container for one named 2-D numeric variable.
//!
//! # Layout
//!
//! ```text
//! [Description: 116 bytes ASCII, space padded]
//! [Subsystem offset: 8 bytes, zero]
//! [Version: u16 = 0x0100][Endian: "IM"]
//! [miMATRIX tag: type u32 = 14, byte count u32]
//!   [miUINT32  8 bytes: class, 0]          array flags
//!   [miINT32   8 bytes: rows, cols]        dimensions
//!   [miINT8    n bytes: name, padded to 8] array name
//!   [miXXX     k bytes: column-major data, padded to 8]
//! ```
//!
//! Only little-endian files are written or read. Sub-element tags may be in
//! either the normal 8-byte form or the packed "small data element" form.

use thiserror::Error;

use crate::array::{Array, DType};

const HEADER_LEN: usize = 128;
const DESCRIPTION_LEN: usize = 116;
const VERSION: u16 = 0x0100;
const ENDIAN_LE: &[u8; 2] = b"IM";

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_MATRIX: u32 = 14;

const MX_DOUBLE_CLASS: u8 = 6;
const MX_SINGLE_CLASS: u8 = 7;
const MX_UINT8_CLASS: u8 = 9;
const MX_INT32_CLASS: u8 = 12;
const MX_INT64_CLASS: u8 = 14;

/// MAT-file encode/decode failures.
#[derive(Error, Debug)]
pub enum MatError {
    /// File shorter than the fixed header or an element overruns the file.
    #[error("truncated MAT file: {0}")]
    Truncated(&'static str),

    /// Endian marker is not `IM`.
    #[error("unsupported endian marker {0:?}")]
    Endian([u8; 2]),

    /// Structure is not what this writer produces.
    #[error("malformed matrix element: {0}")]
    Malformed(String),

    /// Array class has no matching element type.
    #[error("unsupported array class {0}")]
    UnsupportedClass(u8),

    /// No `miMATRIX` element carries the requested name.
    #[error("variable '{0}' not found")]
    VariableNotFound(String),

    /// A dimension does not fit the `miINT32` dimension field.
    #[error("dimension {0} exceeds i32 range")]
    DimensionOverflow(usize),
}

const fn class_of(dtype: DType) -> (u8, u32) {
    match dtype {
        DType::Float64 => (MX_DOUBLE_CLASS, MI_DOUBLE),
        DType::Float32 => (MX_SINGLE_CLASS, MI_SINGLE),
        DType::Int64 => (MX_INT64_CLASS, MI_INT64),
        DType::Int32 => (MX_INT32_CLASS, MI_INT32),
        DType::UInt8 => (MX_UINT8_CLASS, MI_UINT8),
    }
}

fn dtype_of(class: u8) -> Result<(DType, u32), MatError> {
    DType::ALL
        .into_iter()
        .map(|dtype| (dtype, class_of(dtype)))
        .find(|(_, (c, _))| *c == class)
        .map(|(dtype, (_, data_type))| (dtype, data_type))
        .ok_or(MatError::UnsupportedClass(class))
}

#[inline]
fn padded(len: usize) -> usize {
    len.div_ceil(8) * 8
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) -> Result<(), MatError> {
    let len = u32::try_from(data.len())
        .map_err(|_| MatError::Malformed(format!("element of {} bytes too large", data.len())))?;
    put_u32(out, data_type);
    put_u32(out, len);
    out.extend_from_slice(data);
    out.resize(out.len() + padded(data.len()) - data.len(), 0);
    Ok(())
}

/// Reorders a row-major byte image into column-major order, or back when
/// `rows` and `cols` are swapped.
fn transpose(bytes: &[u8], rows: usize, cols: usize, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; bytes.len()];
    for r in 0..rows {
        for c in 0..cols {
            let src = (r * cols + c) * width;
            let dst = (c * rows + r) * width;
            out[dst..dst + width].copy_from_slice(&bytes[src..src + width]);
        }
    }
    out
}

/// Encodes `array` as a complete MAT file holding one variable `name`.
///
/// # Errors
///
/// Returns an error if a dimension does not fit in `i32`.
pub fn encode(name: &str, array: &Array) -> Result<Vec<u8>, MatError> {
    let (rows, cols) = array.shape();
    let dims = |d: usize| i32::try_from(d).map_err(|_| MatError::DimensionOverflow(d));
    let (class, data_type) = class_of(array.dtype());

    let mut body = Vec::new();

    let mut flags = Vec::with_capacity(8);
    put_u32(&mut flags, u32::from(class));
    put_u32(&mut flags, 0);
    put_element(&mut body, MI_UINT32, &flags)?;

    let mut dimensions = Vec::with_capacity(8);
    dimensions.extend_from_slice(&dims(rows)?.to_le_bytes());
    dimensions.extend_from_slice(&dims(cols)?.to_le_bytes());
    put_element(&mut body, MI_INT32, &dimensions)?;

    put_element(&mut body, MI_INT8, name.as_bytes())?;

    let column_major = transpose(&array.to_le_bytes(), rows, cols, array.dtype().width());
    put_element(&mut body, data_type, &column_major)?;

    let mut out = Vec::with_capacity(HEADER_LEN + 8 + body.len());
    let mut description = format!(
        "MATLAB 5.0 MAT-file, Platform: {}, Created by: arrbench",
        std::env::consts::OS
    )
    .into_bytes();
    description.resize(DESCRIPTION_LEN, b' ');
    out.extend_from_slice(&description);
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(ENDIAN_LE);
    put_element(&mut out, MI_MATRIX, &body)?;
    Ok(out)
}

/// One parsed data element: type, payload, and the offset just past it.
struct Element<'a> {
    data_type: u32,
    data: &'a [u8],
    next: usize,
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, MatError> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(MatError::Truncated("element tag"))
}

fn read_element(bytes: &[u8], at: usize) -> Result<Element<'_>, MatError> {
    let first = read_u32(bytes, at)?;
    let small_len = (first >> 16) as usize;
    if small_len != 0 {
        if small_len > 4 {
            return Err(MatError::Malformed(format!(
                "small element claims {small_len} bytes"
            )));
        }
        let data = bytes
            .get(at + 4..at + 4 + small_len)
            .ok_or(MatError::Truncated("small element"))?;
        return Ok(Element {
            data_type: first & 0xFFFF,
            data,
            next: at + 8,
        });
    }

    let len = read_u32(bytes, at + 4)? as usize;
    let start = at + 8;
    let data = bytes
        .get(start..start + len)
        .ok_or(MatError::Truncated("element data"))?;
    Ok(Element {
        data_type: first,
        data,
        next: start + padded(len),
    })
}

fn expect_type(element: &Element<'_>, data_type: u32, what: &str) -> Result<(), MatError> {
    if element.data_type == data_type {
        Ok(())
    } else {
        Err(MatError::Malformed(format!(
            "{what} has data type {}, expected {data_type}",
            element.data_type
        )))
    }
}

fn decode_matrix(body: &[u8]) -> Result<(String, Array), MatError> {
    let flags = read_element(body, 0)?;
    expect_type(&flags, MI_UINT32, "array flags")?;
    let class = *flags
        .data
        .first()
        .ok_or(MatError::Truncated("array flags"))?;
    let (dtype, data_type) = dtype_of(class)?;

    let dimensions = read_element(body, flags.next)?;
    expect_type(&dimensions, MI_INT32, "dimensions")?;
    if dimensions.data.len() != 8 {
        return Err(MatError::Malformed(format!(
            "expected 2 dimensions, found {}",
            dimensions.data.len() / 4
        )));
    }
    let dim = |at: usize| -> Result<usize, MatError> {
        let value = read_u32(dimensions.data, at)? as i32;
        usize::try_from(value).map_err(|_| MatError::Malformed(format!("negative dimension {value}")))
    };
    let (rows, cols) = (dim(0)?, dim(4)?);

    let name = read_element(body, dimensions.next)?;
    expect_type(&name, MI_INT8, "array name")?;
    let name_str = String::from_utf8_lossy(name.data).into_owned();

    let real = read_element(body, name.next)?;
    expect_type(&real, data_type, "real part")?;
    let expected = rows
        .checked_mul(cols)
        .and_then(|count| count.checked_mul(dtype.width()))
        .ok_or_else(|| MatError::Malformed(format!("{rows}x{cols} {dtype} overflows the data size")))?;
    if real.data.len() != expected {
        return Err(MatError::Malformed(format!(
            "real part holds {} bytes, {rows}x{cols} {dtype} needs {expected}",
            real.data.len()
        )));
    }

    let row_major = transpose(real.data, cols, rows, dtype.width());
    let array = Array::from_le_bytes(dtype, rows, cols, &row_major)
        .map_err(|e| MatError::Malformed(e.to_string()))?;
    Ok((name_str, array))
}

/// Decodes the variable `name` from a complete MAT file image.
///
/// # Errors
///
/// Returns an error if the file is truncated, big-endian, malformed, or has
/// no variable called `name`.
pub fn decode(bytes: &[u8], name: &str) -> Result<Array, MatError> {
    if bytes.len() < HEADER_LEN {
        return Err(MatError::Truncated("header"));
    }
    let endian = [bytes[HEADER_LEN - 2], bytes[HEADER_LEN - 1]];
    if &endian != ENDIAN_LE {
        return Err(MatError::Endian(endian));
    }

    let mut at = HEADER_LEN;
    while at < bytes.len() {
        let element = read_element(bytes, at)?;
        if element.data_type == MI_MATRIX {
            let (found, array) = decode_matrix(element.data)?;
            if found == name {
                return Ok(array);
            }
        }
        at = element.next;
    }
    Err(MatError::VariableNotFound(name.to_string()))
}
