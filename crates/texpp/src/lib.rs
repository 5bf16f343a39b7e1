//! # texpp: a TeX source preprocessor
//!
//! This crate expands macros embedded in TeX source code before the source is
//!     handed to a TeX compiler.
//! The macros are not TeX macros.
//! They are calls into *capability modules*: Rust values implementing the [`Module`] trait
//!     that take string arguments and return the text to splice into the document.
//!
//! ```tex
//! \import\core as \c
//! \define\AUTHOR Ada Lovelace
//!
//! \c\figure[file=plot.png, caption={Written by \AUTHOR}]
//! ```
//!
//! The preprocessor is syntax-agnostic outside of its own directives:
//!     every control sequence it does not recognize (`\section`, `\begin`, ...)
//!     is copied to the output unchanged.
//!
//! ## Directives and macros
//!
//! - `\import\<module>` makes a module available under its own name,
//!     and `\import\<module> as \<alias>` under an alias.
//!     Modules are looked up through the [`Resolver`] passed to the [`Expander`].
//!
//! - `\define\<name> <text>` binds `\<name>` to the rest of the line.
//!     Later uses of `\<name>` are replaced with the text verbatim.
//!     The spelling `\pydef` is accepted too.
//!
//! - `\<alias>\<operation>{a}{b}[c, key=value]` invokes an operation of an imported module.
//!     Each brace group is a positional argument.
//!     The optional bracket group is a comma separated list of positional
//!     and `key=value` keyword arguments.
//!     Macros inside the arguments are expanded before the call,
//!     and the text returned by the operation is scanned for macros again.
//!
//! - `%` starts a comment that runs to the end of the line.
//!     No macros are expanded inside comments.
//!
//! ## Line synchronization
//!
//! Expansion changes the line structure of the document.
//! Alongside the expanded text the [`Expander`] returns a [`SyncMap`]
//!     that maps every line of the output back to the input line it came from.
//! Tools that consume the compiler's output (error messages, SyncTeX data)
//!     use this map to point at the original source rather than the expanded file.

pub mod cursor;
pub mod error;
pub mod expander;
pub mod lex;
pub mod module;
pub mod registry;
mod suggest;
pub mod syncmap;

pub use cursor::Cursor;
pub use error::{Error, InvocationError, InvocationErrorKind, SyntaxError, SyntaxErrorKind};
pub use expander::{CommentMode, Expander, Options, Output};
pub use module::{Args, Module, ModuleTable, OperationError, OperationTable, Resolver};
pub use registry::Registry;
pub use syncmap::SyncMap;
