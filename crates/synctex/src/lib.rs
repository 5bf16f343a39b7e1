//! # Correcting SyncTeX data for preprocessed sources
//!
//! When a TeX engine is run with `--synctex=1` it writes a `.synctex.gz` file
//!     that links positions in the PDF to lines of the TeX files that produced them.
//! PDF viewers use it to jump from the PDF back to the source.
//!
//! If the TeX file was produced by the `texpp` preprocessor the data refers to lines of
//!     the expanded file, which the author never edits.
//! This crate rewrites the data so that it refers to the original file instead,
//!     using the [`SyncMap`](texpp::SyncMap) returned by the preprocessor.
//!
//! SyncTeX data is line oriented.
//! The corrector only touches two kinds of lines:
//!
//! - The input declaration `Input:<id>:<path>` of the expanded file,
//!     whose path is replaced by the path of the original file.
//!
//! - Records of the form `<kind><id>,<line>:...` or `<kind><id>,<line>,<column>:...`
//!     that refer to the expanded file, whose line is replaced using the map.
//!
//! Every other byte is passed through unchanged.
//! If the declaration of the expanded file cannot be found the data is left as it is;
//!     the PDF is still valid and only source jumps are affected.

mod artifact;
mod correct;

pub use artifact::{Artifact, Encoding};
pub use correct::{correct, Correction};

use std::path::{Path, PathBuf};

/// Error reading or writing SyncTeX data.
#[derive(Debug)]
pub enum Error {
    Read { path: PathBuf, err: std::io::Error },
    Write { path: PathBuf, err: std::io::Error },
    Decompress(std::io::Error),
    Compress(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Read { path, err } => write!(f, "failed to read `{}`: {err}", path.display()),
            Error::Write { path, err } => write!(f, "failed to write `{}`: {err}", path.display()),
            Error::Decompress(err) => write!(f, "failed to decompress SyncTeX data: {err}"),
            Error::Compress(err) => write!(f, "failed to compress SyncTeX data: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { err, .. }
            | Error::Write { err, .. }
            | Error::Decompress(err)
            | Error::Compress(err) => Some(err),
        }
    }
}

/// Correct the SyncTeX file at `input` and write the result to `output`.
///
/// The output uses the same encoding as the input.
/// `intermediate` is the path of the expanded TeX file as the engine saw it,
///     and `original` the path of the file it was expanded from.
pub fn correct_file(
    input: &Path,
    output: &Path,
    intermediate: &str,
    original: &str,
    sync_map: &texpp::SyncMap,
) -> Result<Correction, Error> {
    let artifact = Artifact::read(input)?;
    let correction = correct(&artifact.data, intermediate, original, sync_map);
    Artifact {
        data: correction.data.clone(),
        encoding: artifact.encoding,
    }
    .write(output)?;
    Ok(correction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_file_keeps_encoding() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("doc.synctex.gz");
        let output = dir.path().join("out.synctex.gz");
        let data = b"Input:1:build/doc.tex\n[1,3:0,0:0,0,0\n".to_vec();
        Artifact {
            data,
            encoding: Encoding::Gzip,
        }
        .write(&input)
        .unwrap();

        let map = texpp::SyncMap::from(vec![1, 1, 2, 5]);
        let correction = correct_file(&input, &output, "build/doc.tex", "doc.tex", &map).unwrap();
        assert_eq!(correction.file_id, Some(1));

        let got = Artifact::read(&output).unwrap();
        assert_eq!(got.encoding, Encoding::Gzip);
        similar_asserts::assert_eq!(
            String::from_utf8(got.data).unwrap(),
            "Input:1:doc.tex\n[1,2:0,0:0,0,0\n"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("missing.synctex.gz");
        let output = dir.path().join("out.synctex.gz");
        let map = texpp::SyncMap::default();
        let err = correct_file(&input, &output, "a.tex", "b.tex", &map).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(!output.exists());
    }
}
