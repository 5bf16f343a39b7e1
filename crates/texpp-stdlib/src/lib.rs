//! # The texpp standard library
//!
//! This crate contains the modules that ship with the `texpp` binary.
//! Currently there is one, `core`, with operations that generate common LaTeX boilerplate:
//!
//! ```tex
//! \import\core as \c
//! \c\titleblock{A paper}[author=Ada Lovelace]
//! \c\figure[file=plot.png, caption=Results, width=3in]
//! ```
//!
//! Each operation lives in its own module together with its tests.

use texpp::{ModuleTable, OperationTable};

pub mod figure;
pub mod front;
pub mod table;

/// Return the `core` module.
pub fn core() -> OperationTable {
    OperationTable::default()
        .with_operation("figure", figure::figure)
        .with_operation("table", table::table)
        .with_operation("titleblock", front::titleblock)
        .with_operation("abstract", front::abstract_)
}

/// Return a resolver holding every module in the standard library.
pub fn modules() -> ModuleTable {
    ModuleTable::default().with_module("core", core())
}

/// Parse a boolean flag argument.
pub(crate) fn parse_flag(name: &str, value: &str) -> Result<bool, texpp::OperationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        _ => Err(texpp::OperationError::Failed(format![
            "the `{name}` argument must be true or false, got `{value}`"
        ])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texpp::{Expander, Module, Resolver};

    #[test]
    fn core_operations() {
        assert_eq!(
            core().operations(),
            vec!["abstract", "figure", "table", "titleblock"]
        );
    }

    #[test]
    fn expand_document() {
        let modules = modules();
        assert!(modules.resolve("core").is_some());
        let source = "\\import\\core as \\c\n\\c\\abstract{We show things.}[title=Summary]\n";
        let output = Expander::new(&modules).expand(source).unwrap();
        assert_eq!(
            output.text,
            "\n\\noindent\\textbf{\\textit{Summary}--- We show things.}\n"
        );
        assert_eq!(output.sync_map.as_slice(), &[1, 2, 2]);
    }

    #[test]
    fn blank_entry_keeps_later_positions() {
        let modules = modules();
        let source = "\\import\\core as \\c\n\\c\\figure[plot.png,,3in]\n";
        let output = Expander::new(&modules).expand(source).unwrap();
        similar_asserts::assert_eq!(
            output.text,
            r"
\begin{figure}[h]
\centering
\includegraphics[width=3in]{plot.png}
\caption{\small{}\label{fig:plot.png}\nopagebreak}
\end{figure}

"
        );
        // Lines returned by the call belong to the last input line completed before it.
        assert_eq!(output.sync_map.as_slice(), &[1, 1, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("x", "True"), Ok(true));
        assert_eq!(parse_flag("x", " no "), Ok(false));
        assert!(parse_flag("x", "maybe").is_err());
    }
}
