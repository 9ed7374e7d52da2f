//! NumPy `.npy` and compressed `.npz` files via `ndarray-npy`.
//!
//! `.npy` goes through the shared durable writer. The `.npz` writer needs to
//! own a seekable stream (it patches zip headers after writing each entry), so
//! it gets the buffered file directly and is synced with
//! [`sync_writer`](crate::durable::sync_writer) once the archive is finished.
//!
//! The element type is only known at run time, so loads try each supported
//! type in turn; a descriptor mismatch is detected from the header before any
//! data is decoded.

use ndarray::{Array2, ArrayView2};
use ndarray_npy::{
    NpzReader, NpzWriter, ReadNpyError, ReadNpyExt, ReadNpzError, ReadableElement, WriteNpyExt,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;

use crate::array::{match_elements, Array, DType, Element};
use crate::durable::{sync_writer, write_durably, Compression};
use crate::error::{Error, Result};
use crate::method::StorageMethod;

/// Name of the single array stored in an `.npz` archive.
pub const NPZ_ENTRY: &str = "data";

fn view<'a, T>(method: &'static str, array: &Array, values: &'a [T]) -> Result<ArrayView2<'a, T>> {
    ArrayView2::from_shape(array.shape(), values).map_err(|e| Error::codec(method, e))
}

fn from_ndarray<T: Element>(array: &Array2<T>) -> Result<Array> {
    let (rows, cols) = array.dim();
    Array::new(rows, cols, array.iter().copied().collect())
}

/// Native `.npy` file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Npy;

impl Npy {
    fn read_as<T: Element + ReadableElement>(bytes: &[u8]) -> Result<Option<Array>> {
        match Array2::<T>::read_npy(bytes) {
            Ok(array) => from_ndarray(&array).map(Some),
            Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
            Err(e) => Err(Error::codec("Npy", e)),
        }
    }
}

impl StorageMethod for Npy {
    fn name(&self) -> &'static str {
        "Npy"
    }

    fn extension(&self) -> &'static str {
        "npy"
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        write_durably(path, Compression::None, |out| {
            match_elements!(array.elements(), values => {
                view(self.name(), array, values)?
                    .write_npy(out)
                    .map_err(|e| Error::codec(self.name(), e))
            })
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

        for dtype in DType::ALL {
            let loaded = match dtype {
                DType::Float64 => Self::read_as::<f64>(&bytes)?,
                DType::Float32 => Self::read_as::<f32>(&bytes)?,
                DType::Int64 => Self::read_as::<i64>(&bytes)?,
                DType::Int32 => Self::read_as::<i32>(&bytes)?,
                DType::UInt8 => Self::read_as::<u8>(&bytes)?,
            };
            if let Some(array) = loaded {
                return Ok(array);
            }
        }
        Err(Error::codec(self.name(), "no supported element type matches the file"))
    }
}

/// Compressed `.npz` archive holding one entry, [`NPZ_ENTRY`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Npz;

impl Npz {
    fn read_as<T, R>(npz: &mut NpzReader<R>) -> Result<Option<Array>>
    where
        T: Element + ReadableElement,
        R: Read + Seek,
    {
        match npz.by_index::<ndarray::OwnedRepr<T>, ndarray::Ix2>(0) {
            Ok(array) => from_ndarray(&array).map(Some),
            Err(ReadNpzError::Npy(ReadNpyError::WrongDescriptor(_))) => Ok(None),
            Err(e) => Err(Error::codec("Npz", e)),
        }
    }
}

impl StorageMethod for Npz {
    fn name(&self) -> &'static str {
        "Npz"
    }

    fn extension(&self) -> &'static str {
        "npz"
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut npz = NpzWriter::new_compressed(BufWriter::new(file));
        match_elements!(array.elements(), values => {
            npz.add_array(NPZ_ENTRY, &view(self.name(), array, values)?)
                .map_err(|e| Error::codec(self.name(), e))?;
        });
        let writer = npz.finish().map_err(|e| Error::codec(self.name(), e))?;
        sync_writer(writer)
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let file = File::open(path)?;
        let mut npz =
            NpzReader::new(BufReader::new(file)).map_err(|e| Error::codec(self.name(), e))?;

        for dtype in DType::ALL {
            let loaded = match dtype {
                DType::Float64 => Self::read_as::<f64, _>(&mut npz)?,
                DType::Float32 => Self::read_as::<f32, _>(&mut npz)?,
                DType::Int64 => Self::read_as::<i64, _>(&mut npz)?,
                DType::Int32 => Self::read_as::<i32, _>(&mut npz)?,
                DType::UInt8 => Self::read_as::<u8, _>(&mut npz)?,
            };
            if let Some(array) = loaded {
                return Ok(array);
            }
        }
        Err(Error::codec(self.name(), "no supported element type matches the archive"))
    }
}
