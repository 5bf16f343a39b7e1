use std::path::{Path, PathBuf};

/// Options controlling how a TeX file is expanded.
#[derive(Clone, Debug, clap::Args)]
pub struct ExpandArgs {
    /// Path to the TeX file to preprocess.
    pub input: PathBuf,

    /// Directory for the expanded file and the sync map.
    ///
    /// Defaults to a `build` directory next to the input file.
    #[arg(short = 'b', long)]
    pub build_dir: Option<PathBuf>,

    /// Drop comments from the expanded file instead of copying them.
    #[arg(long)]
    pub strip_comments: bool,
}

/// Paths of the files produced by expanding a TeX file.
#[derive(Clone, Debug)]
pub struct Outputs {
    pub build_dir: PathBuf,
    pub tex: PathBuf,
    pub sync_map: PathBuf,
}

impl ExpandArgs {
    pub fn outputs(&self) -> Result<Outputs, String> {
        let stem = stem(&self.input)?;
        let build_dir = match &self.build_dir {
            Some(build_dir) => build_dir.clone(),
            None => self
                .input
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join("build"),
        };
        Ok(Outputs {
            tex: build_dir.join(format!["{stem}.tex"]),
            sync_map: build_dir.join(format!["{stem}.syncmap"]),
            build_dir,
        })
    }

    fn options(&self) -> texpp::Options {
        texpp::Options {
            comments: if self.strip_comments {
                texpp::CommentMode::Strip
            } else {
                texpp::CommentMode::Preserve
            },
            ..Default::default()
        }
    }

    /// Expand the input file and write the expanded file and sync map to the build directory.
    ///
    /// If expansion fails, any outputs from earlier runs are removed.
    pub fn run(&self) -> Result<(Outputs, texpp::SyncMap), String> {
        let outputs = self.outputs()?;
        let source = read_to_string(&self.input)?;
        let modules = texpp_stdlib::modules();
        let expander = texpp::Expander::with_options(&modules, self.options());
        let output = match expander.expand(&source) {
            Ok(output) => output,
            Err(err) => {
                outputs.remove();
                let path = self.input.to_string_lossy().to_string();
                let cache = (path.as_str(), ariadne::Source::from(source.clone()));
                if let Err(io_err) = err.ariadne_report(&path, &source).eprint(cache) {
                    return Err(format!["{err} ({io_err})"]);
                }
                return Err("".into());
            }
        };
        if let Err(err) = outputs.write(&output) {
            outputs.remove();
            return Err(err);
        }
        Ok((outputs, output.sync_map))
    }
}

impl Outputs {
    fn write(&self, output: &texpp::Output) -> Result<(), String> {
        if let Err(err) = std::fs::create_dir_all(&self.build_dir) {
            return Err(format![
                "Failed to create build directory `{}`: {err}",
                self.build_dir.display()
            ]);
        }
        write(&self.tex, output.text.as_bytes())?;
        let sync_map = match serde_json::to_string(&output.sync_map) {
            Ok(sync_map) => sync_map,
            Err(err) => return Err(format!["Failed to serialize the sync map: {err}"]),
        };
        write(&self.sync_map, sync_map.as_bytes())
    }

    fn remove(&self) {
        for path in [&self.tex, &self.sync_map] {
            if let Err(err) = std::fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove `{}`: {err}", path.display());
                }
            }
        }
    }
}

pub fn stem(path: &Path) -> Result<String, String> {
    match path.file_stem().and_then(std::ffi::OsStr::to_str) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(format!["`{}` is not a path to a file", path.display()]),
    }
}

pub fn read_to_string(path: &Path) -> Result<String, String> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(data),
        Err(err) => Err(format!("Failed to read `{}`: {}", path.display(), err)),
    }
}

pub fn write(path: &Path, content: &[u8]) -> Result<(), String> {
    match std::fs::write(path, content) {
        Ok(_) => Ok(()),
        Err(err) => Err(format!("Failed to write `{}`: {}", path.display(), err)),
    }
}

pub fn read_sync_map(path: &Path) -> Result<texpp::SyncMap, String> {
    let data = read_to_string(path)?;
    match serde_json::from_str(&data) {
        Ok(sync_map) => Ok(sync_map),
        Err(err) => Err(format!("Failed to parse sync map `{}`: {}", path.display(), err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str, build_dir: Option<&str>) -> ExpandArgs {
        ExpandArgs {
            input: input.into(),
            build_dir: build_dir.map(PathBuf::from),
            strip_comments: false,
        }
    }

    #[test]
    fn default_build_dir() {
        let outputs = args("paper/main.tex", None).outputs().unwrap();
        assert_eq!(outputs.build_dir, PathBuf::from("paper/build"));
        assert_eq!(outputs.tex, PathBuf::from("paper/build/main.tex"));
        assert_eq!(outputs.sync_map, PathBuf::from("paper/build/main.syncmap"));
    }

    #[test]
    fn relative_input_in_current_directory() {
        let outputs = args("main.tex", None).outputs().unwrap();
        assert_eq!(outputs.tex, PathBuf::from("build/main.tex"));
    }

    #[test]
    fn custom_build_dir() {
        let outputs = args("main.tex", Some("/tmp/out")).outputs().unwrap();
        assert_eq!(outputs.tex, PathBuf::from("/tmp/out/main.tex"));
    }

    #[test]
    fn directory_is_not_a_file() {
        assert!(stem(Path::new("/")).is_err());
    }
}
