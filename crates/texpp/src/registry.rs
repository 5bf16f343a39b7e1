//! Per-document macro bindings

use std::collections::HashMap;

/// Import aliases and textual definitions of a single document.
///
/// The registry performs no validation:
///     binding an alias to a module that does not exist succeeds,
///     and the problem surfaces when the alias is first used.
/// Rebinding a name replaces the previous binding.
#[derive(Debug, Default)]
pub struct Registry {
    imports: HashMap<String, String>,
    definitions: HashMap<String, String>,
}

impl Registry {
    pub fn bind_import<A: Into<String>, M: Into<String>>(&mut self, alias: A, module: M) {
        self.imports.insert(alias.into(), module.into());
    }

    pub fn bind_definition<N: Into<String>, T: Into<String>>(&mut self, name: N, text: T) {
        self.definitions.insert(name.into(), text.into());
    }

    /// Return the name of the module bound to the alias.
    pub fn lookup_import(&self, alias: &str) -> Option<&str> {
        self.imports.get(alias).map(String::as_str)
    }

    /// Return the replacement text of a definition.
    pub fn lookup_definition(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }
}
