//! Reading and writing SyncTeX files

use super::Error;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// How SyncTeX data is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `.synctex.gz`, the default for `--synctex=1`.
    Gzip,
    /// `.synctex`, written with `--synctex=-1`.
    Plain,
}

/// Decoded SyncTeX data together with its on-disk encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub data: Vec<u8>,
    pub encoding: Encoding,
}

impl Artifact {
    /// Decode SyncTeX data, detecting gzip compression from the magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Artifact, Error> {
        if !bytes.starts_with(&GZIP_MAGIC) {
            return Ok(Artifact {
                data: bytes,
                encoding: Encoding::Plain,
            });
        }
        let mut data = vec![];
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut data)
            .map_err(Error::Decompress)?;
        Ok(Artifact {
            data,
            encoding: Encoding::Gzip,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        match self.encoding {
            Encoding::Plain => Ok(self.data.clone()),
            Encoding::Gzip => {
                let mut encoder = GzEncoder::new(vec![], flate2::Compression::default());
                encoder.write_all(&self.data).map_err(Error::Compress)?;
                encoder.finish().map_err(Error::Compress)
            }
        }
    }

    pub fn read(path: &Path) -> Result<Artifact, Error> {
        let bytes = std::fs::read(path).map_err(|err| Error::Read {
            path: path.into(),
            err,
        })?;
        Artifact::from_bytes(bytes)
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|err| Error::Write {
            path: path.into(),
            err,
        })
    }
}
