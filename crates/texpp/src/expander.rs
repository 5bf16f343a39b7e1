//! The macro expander
//!
//! The expander makes a single pass over the input document.
//! Characters are copied to the output until a sigil is found,
//!     at which point the following name decides what happens:
//!
//! - `import`, `define` and `pydef` are directives.
//!     They update the document's [`Registry`] and produce no output.
//!
//! - A name bound to a module by an import starts a module call.
//!     The arguments are expanded, the operation is invoked, and the returned text is
//!     expanded again before it is written.
//!
//! - A name bound by a definition is replaced by the definition text, which is not expanded again.
//!
//! - Any other name, including the empty name of a control symbol like `\%`,
//!     is copied verbatim.
//!
//! Argument values and returned text are expanded by a sub-parse over a detached [`Cursor`].
//! The sub-parse resolves module calls and definitions
//!     but does not recognize directives or comments.

use crate::cursor::Cursor;
use crate::error::{Error, InvocationError, InvocationErrorKind, SyntaxError, SyntaxErrorKind};
use crate::lex::{self, COMMENT, SIGIL};
use crate::module::{Args, Resolver};
use crate::registry::Registry;
use crate::syncmap::{SyncMap, Writer};
use tracing::debug;

/// How comments in the input document are handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CommentMode {
    /// Comments are copied to the output verbatim.
    ///
    /// No macros are expanded inside comments.
    #[default]
    Preserve,

    /// The comment character and the rest of its line are dropped.
    ///
    /// The newline ending the comment is kept,
    ///     so the line still produces one output line.
    Strip,
}

/// Configuration of an [`Expander`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub comments: CommentMode,

    /// Maximum nesting of module calls.
    ///
    /// Each expansion of an argument or of returned text is one level deeper than the call.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            comments: CommentMode::Preserve,
            max_depth: 64,
        }
    }
}

/// Result of expanding a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub sync_map: SyncMap,
}

/// Expands documents using modules from a resolver.
///
/// An expander holds no per-document state;
///     each call to [`Expander::expand`] starts with an empty registry.
pub struct Expander<'r> {
    resolver: &'r dyn Resolver,
    options: Options,
}

impl<'r> Expander<'r> {
    pub fn new(resolver: &'r dyn Resolver) -> Expander<'r> {
        Expander::with_options(resolver, Default::default())
    }

    pub fn with_options(resolver: &'r dyn Resolver, options: Options) -> Expander<'r> {
        Expander { resolver, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Expand a document.
    ///
    /// On error no output is returned; partial output is never valid.
    pub fn expand(&self, source: &str) -> Result<Output, Error> {
        let mut run = Run {
            resolver: self.resolver,
            options: &self.options,
            registry: Default::default(),
            writer: Default::default(),
        };
        let mut cursor = Cursor::new(source);
        run.scan_document(&mut cursor)?;
        // The final entry is the last line holding input, which is the line before the
        // cursor's if the input ends with a newline.
        let final_line = if source.ends_with('\n') {
            cursor.line() - 1
        } else {
            cursor.line()
        };
        let (text, sync_map) = run.writer.finish(final_line);
        Ok(Output { text, sync_map })
    }
}

/// State of a single expansion.
struct Run<'a> {
    resolver: &'a dyn Resolver,
    options: &'a Options,
    registry: Registry,
    writer: Writer,
}

impl<'a> Run<'a> {
    fn scan_document(&mut self, cursor: &mut Cursor) -> Result<(), Error> {
        let mut in_comment = false;
        loop {
            let line = cursor.line();
            let Some(c) = cursor.advance() else {
                return Ok(());
            };
            if in_comment {
                if c == '\n' {
                    in_comment = false;
                    self.writer.push(c, line);
                } else if self.options.comments == CommentMode::Preserve {
                    self.writer.push(c, line);
                }
                continue;
            }
            match c {
                COMMENT => {
                    in_comment = true;
                    if self.options.comments == CommentMode::Preserve {
                        self.writer.push(c, line);
                    }
                }
                SIGIL => {
                    let name = lex::read_macro_name(cursor);
                    match name {
                        "import" => self.import(cursor, line)?,
                        "define" | "pydef" => self.define(cursor, name, line)?,
                        _ => {
                            let text = self.replacement(name, cursor, line, 0)?;
                            // Arguments may have consumed newlines, so the line is read after
                            // the call. Line 1 has no completed line before it.
                            let completed = cursor.line().saturating_sub(1).max(1);
                            self.writer.write(&text, completed);
                        }
                    }
                }
                _ => self.writer.push(c, line),
            }
        }
    }

    fn import(&mut self, cursor: &mut Cursor, line: usize) -> Result<(), Error> {
        let Some(module) = lex::read_control_sequence(cursor) else {
            return Err(SyntaxError::new(line, SyntaxErrorKind::MissingModuleName).into());
        };
        let checkpoint = cursor.position();
        lex::skip_whitespace(cursor, false);
        let alias = if lex::read_keyword(cursor, "as") {
            lex::skip_whitespace(cursor, false);
            match lex::read_control_sequence(cursor) {
                Some(alias) => alias,
                None => {
                    return Err(SyntaxError::new(
                        line,
                        SyntaxErrorKind::MissingAliasName {
                            module: module.to_string(),
                        },
                    )
                    .into())
                }
            }
        } else {
            cursor.seek(checkpoint);
            module
        };
        debug!("Line {line}: importing module `{module}` as `{alias}`");
        self.registry.bind_import(alias, module);
        Ok(())
    }

    fn define(&mut self, cursor: &mut Cursor, directive: &str, line: usize) -> Result<(), Error> {
        let Some(name) = lex::read_control_sequence(cursor) else {
            return Err(SyntaxError::new(
                line,
                SyntaxErrorKind::MissingDefinitionName {
                    directive: directive.to_string(),
                },
            )
            .into());
        };
        let text = cursor.advance_while(|c| c != '\n').trim();
        debug!("Line {line}: defining `{name}`");
        self.registry.bind_definition(name, text);
        Ok(())
    }

    /// Return the text that replaces the macro `name`, whose sigil has just been consumed.
    fn replacement(
        &self,
        name: &str,
        cursor: &mut Cursor,
        line: usize,
        depth: usize,
    ) -> Result<String, Error> {
        if name.is_empty() {
            return Ok(match cursor.advance() {
                Some(c) => format!["{SIGIL}{c}"],
                None => SIGIL.to_string(),
            });
        }
        if let Some(module) = self.registry.lookup_import(name) {
            return self.call(name, module, cursor, line, depth);
        }
        if let Some(text) = self.registry.lookup_definition(name) {
            return Ok(text.to_string());
        }
        Ok(format!["{SIGIL}{name}"])
    }

    fn call(
        &self,
        alias: &str,
        module_name: &str,
        cursor: &mut Cursor,
        line: usize,
        depth: usize,
    ) -> Result<String, Error> {
        let Some(operation) = lex::read_control_sequence(cursor) else {
            return Err(SyntaxError::new(
                line,
                SyntaxErrorKind::MissingOperationName {
                    alias: alias.to_string(),
                },
            )
            .into());
        };
        let invocation_error = |kind| InvocationError {
            line,
            module: module_name.to_string(),
            operation: operation.to_string(),
            kind,
        };
        if depth >= self.options.max_depth {
            return Err(invocation_error(InvocationErrorKind::DepthExceeded {
                limit: self.options.max_depth,
            })
            .into());
        }
        let raw = lex::parse_arguments(cursor)?;
        let mut args = Args::default();
        for value in raw.positional {
            args.positional.push(self.rescan(value, line, depth + 1)?);
        }
        for (key, value) in raw.keyword {
            let value = self.rescan(value, line, depth + 1)?;
            args.keyword.insert(key.to_string(), value);
        }
        let Some(module) = self.resolver.resolve(module_name) else {
            let close_names = crate::suggest::close_words(&self.resolver.names(), module_name);
            return Err(invocation_error(InvocationErrorKind::UnknownModule { close_names }).into());
        };
        debug!("Line {line}: invoking `{module_name}.{operation}` with {args:?}");
        let text = module
            .invoke(operation, &args)
            .map_err(|err| invocation_error(InvocationErrorKind::Operation(err)))?;
        self.rescan(&text, line, depth + 1)
    }

    /// Expand macros in a side buffer that originated on the input line `line`.
    fn rescan(&self, text: &str, line: usize, depth: usize) -> Result<String, Error> {
        let mut cursor = Cursor::detached(text, line);
        let mut output = String::with_capacity(text.len());
        while let Some(c) = cursor.advance() {
            if c == SIGIL {
                let name = lex::read_macro_name(&mut cursor);
                output.push_str(&self.replacement(name, &mut cursor, line, depth)?);
            } else {
                output.push(c);
            }
        }
        Ok(output)
    }
}
