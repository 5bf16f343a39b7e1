//! Running the TeX engine on an expanded file

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^l\.(\d+) ?(.*)$").unwrap());

/// First error reported in a TeX log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
    /// Line of the compiled file, if the log gives one.
    pub line: Option<usize>,
    /// The source on the offending line up to the point of the error.
    pub fragment: String,
}

/// Extract the first error from a TeX log.
///
/// TeX reports errors as a line starting with `!` and, a few lines later,
///     the location of the error as `l.<line> <fragment>`.
pub fn parse_log(log: &str) -> Option<CompileError> {
    let mut lines = log.lines().skip_while(|line| !line.starts_with('!'));
    let message = lines.next()?.trim_start_matches('!').trim().to_string();
    for line in lines {
        if line.starts_with('!') {
            break;
        }
        if let Some(captures) = LINE_RE.captures(line) {
            return Some(CompileError {
                message,
                line: captures[1].parse().ok(),
                fragment: captures[2].trim().to_string(),
            });
        }
    }
    Some(CompileError {
        message,
        line: None,
        fragment: String::new(),
    })
}

/// Why a compilation failed.
#[derive(Debug)]
pub enum Failure {
    /// The engine could not be started.
    Spawn { program: String, err: std::io::Error },
    /// The engine ran and exited unsuccessfully.
    Tex { error: Option<CompileError> },
}

/// A TeX engine invocation.
#[derive(Debug, Clone)]
pub struct Compiler {
    pub program: String,
}

impl Compiler {
    /// Paths of the files the engine writes for a TeX file.
    pub fn outputs(build_dir: &Path, stem: &str) -> (PathBuf, PathBuf, PathBuf) {
        (
            build_dir.join(format!["{stem}.pdf"]),
            build_dir.join(format!["{stem}.synctex.gz"]),
            build_dir.join(format!["{stem}.log"]),
        )
    }

    pub fn compile(&self, tex_file: &Path, build_dir: &Path) -> Result<(), Failure> {
        let mut command = Command::new(&self.program);
        command
            .arg("--synctex=1")
            .arg("--interaction=nonstopmode")
            .arg("--halt-on-error")
            .arg(format!["--output-directory={}", build_dir.display()])
            .arg(tex_file);
        tracing::debug!("Running {command:?}");
        let output = command.output().map_err(|err| Failure::Spawn {
            program: self.program.clone(),
            err,
        })?;
        if output.status.success() {
            return Ok(());
        }
        let log = String::from_utf8_lossy(&output.stdout);
        Err(Failure::Tex {
            error: parse_log(&log),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = r"This is pdfTeX, Version 3.141592653-2.6-1.40.25 (TeX Live 2023)
 restricted \write18 enabled.
entering extended mode
(./build/paper.tex
LaTeX2e <2022-11-01> patch level 1
! Undefined control sequence.
l.7 Hello \foo
               {World}
!  ==> Fatal error occurred, no output PDF file produced!
Transcript written on build/paper.log.
";

    #[test]
    fn parse_undefined_control_sequence() {
        assert_eq!(
            parse_log(LOG),
            Some(CompileError {
                message: "Undefined control sequence.".into(),
                line: Some(7),
                fragment: r"Hello \foo".into(),
            })
        );
    }

    #[test]
    fn parse_error_without_line() {
        let log = "! Emergency stop.\n<*> paper.tex\n\n!  ==> Fatal error occurred\n";
        assert_eq!(
            parse_log(log),
            Some(CompileError {
                message: "Emergency stop.".into(),
                line: None,
                fragment: String::new(),
            })
        );
    }

    #[test]
    fn parse_log_without_error() {
        assert_eq!(parse_log("Output written on paper.pdf (1 page).\n"), None);
    }

    #[test]
    fn missing_program() {
        let compiler = Compiler {
            program: "texpp-no-such-engine".into(),
        };
        let dir = std::env::temp_dir();
        assert!(matches!(
            compiler.compile(&dir.join("x.tex"), &dir),
            Err(Failure::Spawn { .. })
        ));
    }
}
