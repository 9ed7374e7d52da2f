//! MAT-file level 5 container holding one variable named `data`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::array::Array;
use crate::durable::{write_durably, Compression};
use crate::error::{Error, Result};
use crate::format::mat5;
use crate::method::StorageMethod;

/// Variable name the array is stored under.
pub const MAT_VARIABLE: &str = "data";

/// Scientific-matrix container file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatFile;

impl StorageMethod for MatFile {
    fn name(&self) -> &'static str {
        "MatFile"
    }

    fn extension(&self) -> &'static str {
        "mat"
    }

    fn save(&self, array: &Array, path: &Path) -> Result<()> {
        write_durably(path, Compression::None, |out| {
            let bytes =
                mat5::encode(MAT_VARIABLE, array).map_err(|e| Error::codec(self.name(), e))?;
            out.write_all(&bytes)?;
            Ok(())
        })
    }

    fn load(&self, path: &Path) -> Result<Array> {
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
        mat5::decode(&bytes, MAT_VARIABLE).map_err(|e| Error::codec(self.name(), e))
    }
}
