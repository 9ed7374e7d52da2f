//! In-memory 2-D numeric arrays under test.
//!
//! An [`Array`] is a row-major matrix with a single element type. Equality is
//! exact: same element type, same shape, every element `==`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Element type of an [`Array`].
///
/// The textual names match NumPy dtype names, which is what the raw-binary
/// header line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 64-bit IEEE float.
    Float64,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit signed integer.
    Int32,
    /// 8-bit unsigned integer.
    UInt8,
}

impl DType {
    /// Every supported element type.
    pub const ALL: [DType; 5] = [
        DType::Float64,
        DType::Float32,
        DType::Int64,
        DType::Int32,
        DType::UInt8,
    ];

    /// Returns the dtype token, e.g. `"float64"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::Int32 => "int32",
            Self::UInt8 => "uint8",
        }
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Float64 | Self::Int64 => 8,
            Self::Float32 | Self::Int32 => 4,
            Self::UInt8 => 1,
        }
    }

    /// Single-byte tag used by binary layouts that have no room for text.
    pub(crate) const fn code(self) -> u8 {
        match self {
            Self::Float64 => 1,
            Self::Float32 => 2,
            Self::Int64 => 3,
            Self::Int32 => 4,
            Self::UInt8 => 5,
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|dtype| dtype.code() == code)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|dtype| dtype.name() == s)
            .ok_or_else(|| Error::InvalidHeader(format!("unknown element type '{s}'")))
    }
}

/// Row-major element storage, one variant per [`DType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elements {
    /// `float64` elements.
    Float64(Vec<f64>),
    /// `float32` elements.
    Float32(Vec<f32>),
    /// `int64` elements.
    Int64(Vec<i64>),
    /// `int32` elements.
    Int32(Vec<i32>),
    /// `uint8` elements.
    UInt8(Vec<u8>),
}

/// Expands `$body` once per [`Elements`] variant with `$values` bound to the
/// typed vector.
macro_rules! match_elements {
    ($elements:expr, $values:ident => $body:expr) => {
        match $elements {
            $crate::array::Elements::Float64($values) => $body,
            $crate::array::Elements::Float32($values) => $body,
            $crate::array::Elements::Int64($values) => $body,
            $crate::array::Elements::Int32($values) => $body,
            $crate::array::Elements::UInt8($values) => $body,
        }
    };
}
pub(crate) use match_elements;

/// Scalar types that can be stored in an [`Array`].
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Element type tag for this scalar.
    const DTYPE: DType;

    /// Wraps a typed vector into [`Elements`].
    fn into_elements(values: Vec<Self>) -> Elements;

    /// Appends the little-endian bytes of `self` to `out`.
    fn put_le(self, out: &mut Vec<u8>);

    /// Decodes one element from exactly `DTYPE.width()` little-endian bytes.
    fn get_le(bytes: &[u8]) -> Self;

    /// Widens to `f64` (lossy for large `i64`).
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            fn into_elements(values: Vec<Self>) -> Elements {
                Elements::$variant(values)
            }

            #[inline]
            fn put_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn get_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_element!(f64, Float64);
impl_element!(f32, Float32);
impl_element!(i64, Int64);
impl_element!(i32, Int32);
impl_element!(u8, UInt8);

fn decode_le<T: Element>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(T::DTYPE.width())
        .map(T::get_le)
        .collect()
}

impl Elements {
    /// Element type of the stored values.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Self::Float64(_) => DType::Float64,
            Self::Float32(_) => DType::Float32,
            Self::Int64(_) => DType::Int64,
            Self::Int32(_) => DType::Int32,
            Self::UInt8(_) => DType::UInt8,
        }
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        match_elements!(self, values => values.len())
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Little-endian byte image of the values, in storage order.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * self.dtype().width());
        match_elements!(self, values => {
            for &value in values {
                value.put_le(&mut out);
            }
        });
        out
    }

    /// Decodes values of `dtype` from a little-endian byte image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if `bytes` is not a whole number of
    /// elements.
    pub fn from_le_bytes(dtype: DType, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % dtype.width() != 0 {
            return Err(Error::InvalidHeader(format!(
                "{} payload bytes is not a multiple of the {} width {}",
                bytes.len(),
                dtype,
                dtype.width()
            )));
        }
        Ok(match dtype {
            DType::Float64 => Self::Float64(decode_le(bytes)),
            DType::Float32 => Self::Float32(decode_le(bytes)),
            DType::Int64 => Self::Int64(decode_le(bytes)),
            DType::Int32 => Self::Int32(decode_le(bytes)),
            DType::UInt8 => Self::UInt8(decode_le(bytes)),
        })
    }

    /// Values widened to `f64`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match_elements!(self, values => values.iter().map(|v| v.to_f64()).collect())
    }
}

/// Serialized form of [`Array`], validated on the way in.
#[derive(Deserialize)]
struct ArrayParts {
    shape: (usize, usize),
    data: Elements,
}

impl TryFrom<ArrayParts> for Array {
    type Error = Error;

    fn try_from(parts: ArrayParts) -> Result<Self> {
        Array::from_elements(parts.shape.0, parts.shape.1, parts.data)
    }
}

/// A non-empty 2-D numeric matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayParts")]
pub struct Array {
    shape: (usize, usize),
    data: Elements,
}

impl Array {
    /// Creates an array from typed row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if either dimension is zero or
    /// `values.len() != rows * cols`.
    pub fn new<T: Element>(rows: usize, cols: usize, values: Vec<T>) -> Result<Self> {
        Self::from_elements(rows, cols, T::into_elements(values))
    }

    /// Creates an array from already-wrapped row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if either dimension is zero or the
    /// element count does not match the shape.
    pub fn from_elements(rows: usize, cols: usize, data: Elements) -> Result<Self> {
        let len = data.len();
        if rows == 0 || cols == 0 || rows.checked_mul(cols) != Some(len) {
            return Err(Error::InvalidShape { rows, cols, len });
        }
        Ok(Self {
            shape: (rows, cols),
            data,
        })
    }

    /// Decodes an array of `dtype` and shape `rows x cols` from little-endian
    /// row-major bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the byte count does not match the shape.
    pub fn from_le_bytes(dtype: DType, rows: usize, cols: usize, bytes: &[u8]) -> Result<Self> {
        Self::from_elements(rows, cols, Elements::from_le_bytes(dtype, bytes)?)
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.shape.0
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.shape.1
    }

    /// Element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Row-major values.
    #[must_use]
    pub fn elements(&self) -> &Elements {
        &self.data
    }

    /// Consumes the array, returning its row-major values.
    #[must_use]
    pub fn into_elements(self) -> Elements {
        self.data
    }

    /// Little-endian row-major byte image.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.to_le_bytes()
    }

    /// Sum of all elements as `f64`. Touches every element.
    #[must_use]
    pub fn sum(&self) -> f64 {
        match_elements!(&self.data, values => values.iter().map(|v| v.to_f64()).sum())
    }
}
