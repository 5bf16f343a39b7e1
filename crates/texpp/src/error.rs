//! Errors raised during expansion
//!
//! All errors are fatal for the run and carry the 1-based line of the input document
//!     where they were detected.

use crate::module::OperationError;

/// A malformed directive or macro call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// `\import` is not followed by `\<module>`.
    MissingModuleName,

    /// `\import\<module> as` is not followed by `\<alias>`.
    MissingAliasName { module: String },

    /// `\define` is not followed by `\<name>`.
    MissingDefinitionName { directive: String },

    /// A module alias is not followed by `\<operation>`.
    MissingOperationName { alias: String },

    /// The input ended inside a brace or bracket group.
    MissingClosingBracket { open: char },
}

impl SyntaxError {
    pub fn new(line: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError { line, kind }
    }

    pub fn message(&self) -> String {
        use SyntaxErrorKind::*;
        match &self.kind {
            MissingModuleName => "expected module name after import statement".into(),
            MissingAliasName { .. } => "expected alias name after `as`".into(),
            MissingDefinitionName { directive } => {
                format!["expected definition name after {directive} statement"]
            }
            MissingOperationName { alias } => {
                format!["expected operation name after module `\\{alias}`"]
            }
            MissingClosingBracket { open } => {
                format!["missing closing bracket for `{open}`"]
            }
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use SyntaxErrorKind::*;
        match &self.kind {
            MissingModuleName => vec![r"imports have the form `\import\module` or `\import\module as \alias`".into()],
            MissingAliasName { module } => vec![format![r"write `\import\{module} as \alias`"]],
            MissingDefinitionName { directive } => {
                vec![format![r"definitions have the form `\{directive}\name replacement text`"]]
            }
            MissingOperationName { alias } => {
                vec![format![r"module calls have the form `\{alias}\operation{{arg}}[key=value]`"]]
            }
            MissingClosingBracket { .. } => vec![],
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Syntax error on line {}. {}", self.line, self.message())
    }
}

impl std::error::Error for SyntaxError {}

/// A module call that could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationError {
    pub line: usize,
    pub module: String,
    pub operation: String,
    pub kind: InvocationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationErrorKind {
    /// The resolver does not know the imported module.
    UnknownModule { close_names: Vec<String> },

    /// The module rejected the call.
    Operation(OperationError),

    /// Text returned by modules kept invoking more modules.
    DepthExceeded { limit: usize },
}

impl InvocationError {
    pub fn message(&self) -> String {
        use InvocationErrorKind::*;
        let call = format!["`{}.{}`", self.module, self.operation];
        match &self.kind {
            UnknownModule { .. } => format!["unknown module `{}`", self.module],
            Operation(OperationError::UnknownOperation { .. }) => {
                format!["module `{}` has no operation `{}`", self.module, self.operation]
            }
            Operation(err) => format!["call to {call} failed: {}", err.message()],
            DepthExceeded { limit } => {
                format!["call to {call} exceeded the maximum expansion depth of {limit}"]
            }
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use InvocationErrorKind::*;
        let close_names = match &self.kind {
            UnknownModule { close_names } => close_names.as_slice(),
            Operation(err) => err.close_names(),
            DepthExceeded { .. } => {
                return vec!["text returned by a module is expanded again; check for a module that calls itself".into()];
            }
        };
        match close_names {
            [] => vec![],
            [name] => vec![format!["did you mean `{name}`?"]],
            names => vec![format!["did you mean one of: {}?", names.join(", ")]],
        }
    }
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error on line {}. {}", self.line, self.message())
    }
}

impl std::error::Error for InvocationError {}

/// Error returned by [`crate::Expander::expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Syntax(SyntaxError),
    Invocation(InvocationError),
}

impl Error {
    /// The 1-based input line where the error was detected.
    pub fn line(&self) -> usize {
        match self {
            Error::Syntax(err) => err.line,
            Error::Invocation(err) => err.line,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::Syntax(err) => err.message(),
            Error::Invocation(err) => err.message(),
        }
    }

    pub fn notes(&self) -> Vec<String> {
        match self {
            Error::Syntax(err) => err.notes(),
            Error::Invocation(err) => err.notes(),
        }
    }

    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'a>(
        &self,
        file_name: &'a str,
        source: &str,
    ) -> ariadne::Report<'static, (&'a str, std::ops::Range<usize>)> {
        let span = line_span(source, self.line());
        let label = match self {
            Error::Syntax(_) => "syntax error on this line",
            Error::Invocation(_) => "module call on this line",
        };
        let mut report = ariadne::Report::build(ariadne::ReportKind::Error, (file_name, span.clone()))
            .with_message(self.message())
            .with_label(
                ariadne::Label::new((file_name, span))
                    .with_message(label)
                    .with_color(ariadne::Color::BrightRed),
            );
        for note in self.notes() {
            report = report.with_note(note);
        }
        report.finish()
    }
}

/// Character range of the 1-based line, excluding the newline.
#[cfg(feature = "ariadne")]
fn line_span(source: &str, line: usize) -> std::ops::Range<usize> {
    let mut consumed = 0;
    for (n, content) in source.split('\n').enumerate() {
        let len = content.chars().count();
        if n + 1 == line {
            return consumed..consumed + len;
        }
        consumed += len + 1;
    }
    let end = source.chars().count();
    end..end
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(err) => err.fmt(f),
            Error::Invocation(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

impl From<InvocationError> for Error {
    fn from(err: InvocationError) -> Self {
        Error::Invocation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line() {
        let err: Error = SyntaxError::new(3, SyntaxErrorKind::MissingModuleName).into();
        assert_eq!(
            err.to_string(),
            "Syntax error on line 3. expected module name after import statement"
        );
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn unknown_operation_suggests_names() {
        let err = InvocationError {
            line: 2,
            module: "core".into(),
            operation: "figuer".into(),
            kind: InvocationErrorKind::Operation(OperationError::UnknownOperation {
                close_names: vec!["figure".into()],
            }),
        };
        assert_eq!(err.message(), "module `core` has no operation `figuer`");
        assert_eq!(err.notes(), vec!["did you mean `figure`?".to_string()]);
    }

    #[test]
    fn several_suggestions() {
        let err = InvocationError {
            line: 1,
            module: "cor".into(),
            operation: "x".into(),
            kind: InvocationErrorKind::UnknownModule {
                close_names: vec!["car".into(), "core".into()],
            },
        };
        assert_eq!(err.notes(), vec!["did you mean one of: car, core?".to_string()]);
    }

    #[cfg(feature = "ariadne")]
    #[test]
    fn line_span_counts_characters() {
        let source = "é\nabc\n";
        assert_eq!(line_span(source, 1), 0..1);
        assert_eq!(line_span(source, 2), 2..5);
        assert_eq!(line_span(source, 9), 6..6);
    }
}
