//! The storage-method contract and its shared timing wrapper.
//!
//! Adapters implement only [`StorageMethod::save`] and
//! [`StorageMethod::load`]. Measurement and verification live once, in
//! [`TimedMethod`], which wraps any adapter by composition.
//!
//! # Harness protocol
//!
//! ```rust,ignore
//! let mut timed = TimedMethod::new(Box::new(Npy));
//! timed.time_save(&array, &path)?;
//! let checksum = timed.time_load(&array, &path)?;
//! println!("{:?} {:?} {:?}", timed.save_time(), timed.load_time(), timed.storage_space());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hint::black_box;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::array::{Array, DType};
use crate::durable::file_size;
use crate::error::{Error, Result};

/// Encode/decode half of a storage format.
///
/// Implementations must leave a durable encoding behind when `save` returns:
/// the bytes are flushed to the device, not just handed to the OS. Loads only
/// need to read files written by the same implementation's `save`.
pub trait StorageMethod: Send + Sync {
    /// Display name, used in logs and verification errors.
    fn name(&self) -> &'static str;

    /// Default file suffix, without the dot. Purely descriptive.
    fn extension(&self) -> &'static str {
        "data"
    }

    /// Returns true if arrays of `dtype` survive a round trip unchanged.
    fn supports(&self, dtype: DType) -> bool {
        let _ = dtype;
        true
    }

    /// Writes a durable encoding of `array` to `path`.
    ///
    /// # Errors
    ///
    /// Propagates the codec's error, or an I/O error from the file system.
    fn save(&self, array: &Array, path: &Path) -> Result<()>;

    /// Reads back an array written by [`StorageMethod::save`].
    ///
    /// # Errors
    ///
    /// Returns an I/O not-found error if `path` does not exist, otherwise
    /// propagates the codec's error.
    fn load(&self, path: &Path) -> Result<Array>;
}

/// Results of one save/load pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Storage method name.
    pub method: String,
    /// Wall-clock duration of `save`.
    pub save_time: Duration,
    /// Wall-clock duration of `load` plus the materializing reduction.
    pub load_time: Duration,
    /// File size after `save`, in bytes.
    pub storage_space: u64,
}

/// A storage method plus the results of its most recent timed calls.
///
/// Each call overwrites its own slot; nothing accumulates across calls.
pub struct TimedMethod {
    method: Box<dyn StorageMethod>,
    save_time: Option<Duration>,
    load_time: Option<Duration>,
    storage_space: Option<u64>,
}

impl TimedMethod {
    /// Wraps `method` with empty measurement state.
    #[must_use]
    pub fn new(method: Box<dyn StorageMethod>) -> Self {
        Self {
            method,
            save_time: None,
            load_time: None,
            storage_space: None,
        }
    }

    /// The wrapped storage method.
    #[must_use]
    pub fn method(&self) -> &dyn StorageMethod {
        self.method.as_ref()
    }

    /// Name of the wrapped storage method.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.method.name()
    }

    /// Duration of the last successful [`TimedMethod::time_save`].
    #[must_use]
    pub fn save_time(&self) -> Option<Duration> {
        self.save_time
    }

    /// Duration of the last [`TimedMethod::time_load`] that got as far as
    /// reading the file.
    #[must_use]
    pub fn load_time(&self) -> Option<Duration> {
        self.load_time
    }

    /// File size recorded by the last successful [`TimedMethod::time_save`].
    #[must_use]
    pub fn storage_space(&self) -> Option<u64> {
        self.storage_space
    }

    /// All three recorded values, once each has been written.
    #[must_use]
    pub fn measurement(&self) -> Option<Measurement> {
        Some(Measurement {
            method: self.name().to_string(),
            save_time: self.save_time?,
            load_time: self.load_time?,
            storage_space: self.storage_space?,
        })
    }

    /// Saves `array` to `path`, recording the elapsed time and file size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedElementType`] if the method does not
    /// support the array's element type, otherwise propagates save errors.
    pub fn time_save(&mut self, array: &Array, path: &Path) -> Result<()> {
        self.record_save(array, path).map(|_| ())
    }

    /// Loads `path`, checks it against `reference`, then deletes `path`.
    ///
    /// The sum of the loaded elements is computed inside the timed region so
    /// that no codec can defer reading the data. The file is deleted after
    /// the clock stops. Returns that sum.
    ///
    /// On a load error or a mismatch the file is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Verification`] naming the method if the loaded array
    /// differs from `reference`, otherwise propagates load errors.
    pub fn time_load(&mut self, reference: &Array, path: &Path) -> Result<f64> {
        self.record_load(reference, path).map(|(_, checksum)| checksum)
    }

    /// Runs [`TimedMethod::time_save`] then [`TimedMethod::time_load`].
    ///
    /// # Errors
    ///
    /// Returns the first error from either step.
    pub fn round_trip(&mut self, array: &Array, path: &Path) -> Result<Measurement> {
        let (save_time, storage_space) = self.record_save(array, path)?;
        let (load_time, _) = self.record_load(array, path)?;
        Ok(Measurement {
            method: self.name().to_string(),
            save_time,
            load_time,
            storage_space,
        })
    }

    fn record_save(&mut self, array: &Array, path: &Path) -> Result<(Duration, u64)> {
        let dtype = array.dtype();
        if !self.method.supports(dtype) {
            return Err(Error::UnsupportedElementType {
                method: self.name().to_string(),
                dtype,
            });
        }

        let start = Instant::now();
        self.method.save(array, path)?;
        let elapsed = start.elapsed();
        self.save_time = Some(elapsed);

        let bytes = file_size(path)?;
        self.storage_space = Some(bytes);

        debug!(
            method = self.name(),
            path = %path.display(),
            elapsed_us = elapsed.as_micros() as u64,
            bytes,
            "saved array"
        );
        Ok((elapsed, bytes))
    }

    fn record_load(&mut self, reference: &Array, path: &Path) -> Result<(Duration, f64)> {
        let start = Instant::now();
        let loaded = self.method.load(path)?;
        let checksum = black_box(loaded.sum());
        let elapsed = start.elapsed();
        self.load_time = Some(elapsed);

        if loaded != *reference {
            warn!(
                method = self.name(),
                path = %path.display(),
                loaded_shape = ?loaded.shape(),
                loaded_dtype = %loaded.dtype(),
                "loaded array differs from reference"
            );
            return Err(Error::Verification {
                method: self.name().to_string(),
            });
        }

        std::fs::remove_file(path)?;

        debug!(
            method = self.name(),
            path = %path.display(),
            elapsed_us = elapsed.as_micros() as u64,
            checksum,
            "loaded and verified array"
        );
        Ok((elapsed, checksum))
    }
}

impl fmt::Debug for TimedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedMethod")
            .field("method", &self.name())
            .field("save_time", &self.save_time)
            .field("load_time", &self.load_time)
            .field("storage_space", &self.storage_space)
            .finish()
    }
}

impl fmt::Display for TimedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
