//! Capability modules
//!
//! A capability module is a named provider of text producing operations.
//! Documents import modules with `\import\<module>` and call their operations with
//!     `\<alias>\<operation>{...}[...]`.
//!
//! Modules implement the [`Module`] trait.
//! Most modules are just a set of closures keyed by operation name,
//!     and can be built with an [`OperationTable`]:
//!
//! ```
//! use texpp::{Args, ModuleTable, OperationTable};
//!
//! let greetings = OperationTable::default().with_operation("greet", |args: &Args| {
//!     args.check_signature(&["name"])?;
//!     Ok(format!["Hi, {}", args.required(0, "name")?])
//! });
//! let modules = ModuleTable::default().with_module("m", greetings);
//! ```
//!
//! The expander finds modules through a [`Resolver`].
//! The resolver is supplied by the caller;
//!     there is no global search path.

use std::collections::{BTreeMap, HashMap};

/// Arguments passed to a module operation.
///
/// All values have already been macro expanded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Args {
    pub positional: Vec<String>,
    pub keyword: BTreeMap<String, String>,
}

impl Args {
    pub fn with_positional<S: Into<String>>(mut self, value: S) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn with_keyword<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.keyword.insert(key.into(), value.into());
        self
    }

    /// Return the positional argument at the index, if it was provided.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Return the keyword argument with the name, if it was provided.
    pub fn keyword(&self, name: &str) -> Option<&str> {
        self.keyword.get(name).map(String::as_str)
    }

    /// Return the value of a parameter that can be passed positionally or by keyword.
    ///
    /// Passing the same parameter both ways is an error.
    pub fn param(&self, index: usize, name: &str) -> Result<Option<&str>, OperationError> {
        match (self.get(index), self.keyword(name)) {
            (Some(_), Some(_)) => Err(OperationError::DuplicateArgument {
                name: name.to_string(),
            }),
            (Some(value), None) | (None, Some(value)) => Ok(Some(value)),
            (None, None) => Ok(None),
        }
    }

    /// Like [`Args::param`], but the parameter must be provided.
    pub fn required(&self, index: usize, name: &str) -> Result<&str, OperationError> {
        self.param(index, name)?
            .ok_or_else(|| OperationError::MissingArgument {
                name: name.to_string(),
            })
    }

    /// Like [`Args::param`], but falling back to a default.
    pub fn param_or<'a>(
        &'a self,
        index: usize,
        name: &str,
        default: &'a str,
    ) -> Result<&'a str, OperationError> {
        Ok(self.param(index, name)?.unwrap_or(default))
    }

    /// Fail if more than `max` positional arguments were provided.
    pub fn expect_at_most(&self, max: usize) -> Result<(), OperationError> {
        if self.positional.len() > max {
            return Err(OperationError::TooManyPositionalArgs {
                max,
                got: self.positional.len(),
            });
        }
        Ok(())
    }

    /// Fail if a keyword argument is not one of the known names.
    pub fn reject_unknown(&self, known: &[&str]) -> Result<(), OperationError> {
        match self.keyword.keys().find(|key| !known.contains(&key.as_str())) {
            None => Ok(()),
            Some(key) => Err(OperationError::UnknownKeyword {
                name: key.clone(),
                close_names: crate::suggest::close_words(known, key),
            }),
        }
    }

    /// Check the arguments against an operation whose parameters are, in order, `params`.
    pub fn check_signature(&self, params: &[&str]) -> Result<(), OperationError> {
        self.expect_at_most(params.len())?;
        self.reject_unknown(params)
    }
}

/// Error returned by a module operation.
///
/// These errors carry no position information;
///     the expander attaches the input line and the name of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The module has no operation with this name.
    UnknownOperation { close_names: Vec<String> },

    /// Too many positional arguments provided.
    TooManyPositionalArgs { max: usize, got: usize },

    /// A required argument was not provided.
    MissingArgument { name: String },

    /// No parameter has the name of this keyword argument.
    UnknownKeyword {
        name: String,
        close_names: Vec<String>,
    },

    /// The same argument was provided both positionally and by keyword.
    DuplicateArgument { name: String },

    /// The operation itself failed.
    Failed(String),
}

impl OperationError {
    pub fn message(&self) -> String {
        use OperationError::*;
        match self {
            UnknownOperation { .. } => "no operation with this name".into(),
            TooManyPositionalArgs { max, got } => {
                format!["too many positional arguments provided (accepts up to {max}, got {got})"]
            }
            MissingArgument { name } => format!["the `{name}` argument is required"],
            UnknownKeyword { name, .. } => format!["no parameter with name `{name}`"],
            DuplicateArgument { name } => {
                format!["the `{name}` argument was provided both positionally and by keyword"]
            }
            Failed(message) => message.clone(),
        }
    }

    /// Spelling suggestions for unknown names.
    pub fn close_names(&self) -> &[String] {
        use OperationError::*;
        match self {
            UnknownOperation { close_names } | UnknownKeyword { close_names, .. } => close_names,
            _ => &[],
        }
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OperationError {}

/// A capability module.
pub trait Module {
    /// Run an operation of the module and return the text to splice into the document.
    fn invoke(&self, operation: &str, args: &Args) -> Result<String, OperationError>;

    /// Names of the operations of the module, used for diagnostics.
    fn operations(&self) -> Vec<&str> {
        vec![]
    }
}

type OperationFn = Box<dyn Fn(&Args) -> Result<String, OperationError>>;

/// A module built from a table of closures.
#[derive(Default)]
pub struct OperationTable {
    operations: HashMap<String, OperationFn>,
}

impl OperationTable {
    pub fn with_operation<N, F>(mut self, name: N, operation: F) -> Self
    where
        N: Into<String>,
        F: Fn(&Args) -> Result<String, OperationError> + 'static,
    {
        self.insert(name, operation);
        self
    }

    pub fn insert<N, F>(&mut self, name: N, operation: F)
    where
        N: Into<String>,
        F: Fn(&Args) -> Result<String, OperationError> + 'static,
    {
        self.operations.insert(name.into(), Box::new(operation));
    }
}

impl Module for OperationTable {
    fn invoke(&self, operation: &str, args: &Args) -> Result<String, OperationError> {
        match self.operations.get(operation) {
            Some(f) => f(args),
            None => Err(OperationError::UnknownOperation {
                close_names: crate::suggest::close_words(&self.operations(), operation),
            }),
        }
    }

    fn operations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationTable")
            .field("operations", &self.operations())
            .finish()
    }
}

/// Finds capability modules by name.
pub trait Resolver {
    fn resolve(&self, module: &str) -> Option<&dyn Module>;

    /// Names of the modules the resolver knows about, used for diagnostics.
    fn names(&self) -> Vec<&str> {
        vec![]
    }
}

/// A [`Resolver`] backed by a map from names to modules.
#[derive(Default)]
pub struct ModuleTable {
    modules: HashMap<String, Box<dyn Module>>,
}

impl ModuleTable {
    pub fn with_module<N: Into<String>, M: Module + 'static>(mut self, name: N, module: M) -> Self {
        self.insert(name, module);
        self
    }

    pub fn insert<N: Into<String>, M: Module + 'static>(&mut self, name: N, module: M) {
        self.modules.insert(name.into(), Box::new(module));
    }
}

impl Resolver for ModuleTable {
    fn resolve(&self, module: &str) -> Option<&dyn Module> {
        self.modules.get(module).map(|m| m.as_ref())
    }

    fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args::default()
            .with_positional("a")
            .with_keyword("width", "3cm")
    }

    #[test]
    fn param_positional_or_keyword() {
        let args = args();
        assert_eq!(args.param(0, "file"), Ok(Some("a")));
        assert_eq!(args.param(1, "width"), Ok(Some("3cm")));
        assert_eq!(args.param(2, "caption"), Ok(None));
        assert_eq!(args.param_or(2, "caption", "none"), Ok("none"));
    }

    #[test]
    fn param_provided_twice() {
        let args = args();
        assert_eq!(
            args.param(0, "width"),
            Err(OperationError::DuplicateArgument {
                name: "width".into()
            })
        );
    }

    #[test]
    fn required_missing() {
        assert_eq!(
            Args::default().required(0, "name"),
            Err(OperationError::MissingArgument {
                name: "name".into()
            })
        );
    }

    #[test]
    fn check_signature_too_many() {
        let args = args().with_positional("b");
        assert_eq!(
            args.check_signature(&["file", "width"]),
            Err(OperationError::TooManyPositionalArgs { max: 2, got: 3 })
        );
    }

    #[test]
    fn check_signature_unknown_keyword() {
        let args = Args::default().with_keyword("widht", "1");
        assert_eq!(
            args.check_signature(&["file", "width"]),
            Err(OperationError::UnknownKeyword {
                name: "widht".into(),
                close_names: vec!["width".into()],
            })
        );
    }

    #[test]
    fn operation_table_dispatch() {
        let table = OperationTable::default()
            .with_operation("greet", |args: &Args| Ok(format!["Hi, {}", args.required(0, "name")?]))
            .with_operation("fail", |_: &Args| Err(OperationError::Failed("boom".into())));
        let args = Args::default().with_positional("World");
        assert_eq!(table.invoke("greet", &args), Ok("Hi, World".to_string()));
        assert_eq!(
            table.invoke("fail", &args),
            Err(OperationError::Failed("boom".into()))
        );
        assert_eq!(table.operations(), vec!["fail", "greet"]);
    }

    #[test]
    fn operation_table_unknown_operation() {
        let table = OperationTable::default().with_operation("greet", |_: &Args| Ok("".into()));
        assert_eq!(
            table.invoke("gret", &Args::default()),
            Err(OperationError::UnknownOperation {
                close_names: vec!["greet".into()]
            })
        );
    }

    #[test]
    fn module_table_resolves() {
        let modules = ModuleTable::default()
            .with_module("m", OperationTable::default())
            .with_module("a", OperationTable::default());
        assert!(modules.resolve("m").is_some());
        assert!(modules.resolve("x").is_none());
        assert_eq!(modules.names(), vec!["a", "m"]);
    }
}
