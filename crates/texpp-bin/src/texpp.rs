use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

mod common;
mod compiler;
use common::*;

fn main() {
    if let Err(err) = Cli::parse().run() {
        if !err.is_empty() {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

/// Preprocess TeX documents that call macro modules.
///
/// Documents import modules with `\import\core as \c` and call them with
///     `\c\figure{plot.png}[caption=Results]`.
/// The preprocessor writes the expanded document and a sync map,
///     which relates lines of the expanded document to lines of the original,
///     to a build directory.
#[derive(Debug, Parser)]
#[command(
    name = "texpp",
    version = "0.1",
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print debug logs to stderr.
    ///
    /// The `RUST_LOG` environment variable takes precedence over this flag.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        init_logging(self.verbose);
        match self.command {
            Command::Expand(expand) => expand.run(),
            Command::Fixsync(fixsync) => fixsync.run(),
            Command::Run(run) => run.run(),
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "warn" }),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .without_time()
        .init();
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Expand a TeX file.
    ///
    /// The expanded file and its sync map are written to the build directory
    ///     as `<stem>.tex` and `<stem>.syncmap`.
    Expand(Expand),

    /// Rewrite a SyncTeX file to point at the original TeX file.
    ///
    /// The TeX engine records lines of the expanded file in its SyncTeX output.
    /// This command maps them back to lines of the original file using the sync map
    ///     written by `texpp expand`.
    /// If the SyncTeX file does not mention the expanded file it is left unchanged.
    Fixsync(Fixsync),

    /// Expand a TeX file, compile it, and correct the SyncTeX output.
    ///
    /// The PDF and SyncTeX files are written next to the input file.
    /// Compilation errors are reported at lines of the input file.
    Run(Run),
}

#[derive(Clone, Debug, Parser)]
struct Expand {
    #[command(flatten)]
    expand: ExpandArgs,
}

impl Expand {
    fn run(self) -> Result<(), String> {
        let (outputs, _) = self.expand.run()?;
        println!("Expanded file written to {}", outputs.tex.display());
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Fixsync {
    /// Path to the SyncTeX file, compressed (.synctex.gz) or not (.synctex).
    input: PathBuf,

    /// Path to the sync map written by `texpp expand`.
    #[arg(short = 'm', long)]
    map: PathBuf,

    /// Path of the expanded TeX file as given to the TeX engine.
    #[arg(short = 'i', long)]
    intermediate: String,

    /// Path of the original TeX file.
    #[arg(short = 'r', long)]
    original: String,

    /// Where to write the corrected file.
    ///
    /// Defaults to overwriting the input file.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl Fixsync {
    fn run(self) -> Result<(), String> {
        let sync_map = read_sync_map(&self.map)?;
        let output = self.output.as_ref().unwrap_or(&self.input);
        let correction = synctex::correct_file(
            &self.input,
            output,
            &self.intermediate,
            &self.original,
            &sync_map,
        )
        .map_err(|err| err.to_string())?;
        if correction.is_applied() {
            println!(
                "Corrected {} SyncTeX records in {}",
                correction.records,
                output.display()
            );
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Run {
    #[command(flatten)]
    expand: ExpandArgs,

    /// The TeX engine to run.
    #[arg(short = 'c', long, default_value = "pdflatex")]
    compiler: String,
}

impl Run {
    fn run(self) -> Result<(), String> {
        let (outputs, sync_map) = self.expand.run()?;
        let input = &self.expand.input;
        let stem = stem(input)?;
        let compiler = compiler::Compiler {
            program: self.compiler,
        };
        let (pdf, synctex_file, log) = compiler::Compiler::outputs(&outputs.build_dir, &stem);
        if let Err(failure) = compiler.compile(&outputs.tex, &outputs.build_dir) {
            return Err(match failure {
                compiler::Failure::Spawn { program, err } => {
                    format!["Failed to run `{program}`: {err}"]
                }
                compiler::Failure::Tex { error } => {
                    compile_error_message(input, &log, error.as_ref(), &sync_map)
                }
            });
        }

        let out_pdf = input.with_extension("pdf");
        if let Err(err) = std::fs::copy(&pdf, &out_pdf) {
            return Err(format![
                "Failed to copy `{}` to `{}`: {err}",
                pdf.display(),
                out_pdf.display()
            ]);
        }
        if synctex_file.exists() {
            let out_synctex = input.with_extension("synctex.gz");
            let original = std::fs::canonicalize(input).unwrap_or_else(|_| input.clone());
            synctex::correct_file(
                &synctex_file,
                &out_synctex,
                &outputs.tex.to_string_lossy(),
                &original.to_string_lossy(),
                &sync_map,
            )
            .map_err(|err| err.to_string())?;
        } else {
            tracing::warn!("The TeX engine did not write `{}`", synctex_file.display());
        }
        println!(
            "{} Output PDF written to {}",
            "Success!".green().bold(),
            out_pdf.display()
        );
        Ok(())
    }
}

fn compile_error_message(
    input: &Path,
    log: &Path,
    error: Option<&compiler::CompileError>,
    sync_map: &texpp::SyncMap,
) -> String {
    let location = match error.and_then(|error| error.line) {
        None => "".to_string(),
        Some(line) => match sync_map.original_line(line) {
            Some(line) => format![" on line {line}"],
            None => format![" on line {line} of the expanded file"],
        },
    };
    let detail = match error {
        None => "".to_string(),
        Some(error) => format![" {} {}", error.message, error.fragment],
    };
    format![
        "{}{location}.{}\n {}\n See full log at: {}",
        "TeX error".red().bold(),
        detail.trim_end(),
        input.display(),
        log.display()
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn compile_error_line_is_translated() {
        colored::control::set_override(false);
        let error = compiler::CompileError {
            message: "Undefined control sequence.".into(),
            line: Some(3),
            fragment: r"\foo".into(),
        };
        let sync_map = texpp::SyncMap::from(vec![1, 1, 2, 5]);
        let got = compile_error_message(
            Path::new("paper.tex"),
            Path::new("build/paper.log"),
            Some(&error),
            &sync_map,
        );
        assert_eq!(
            got,
            "TeX error on line 2. Undefined control sequence. \\foo\n paper.tex\n See full log at: build/paper.log"
        );
    }
}
