//! Variables visible to an action while it runs for one match.

use std::collections::HashMap;

use tra_syntax::QueryMatch;

use crate::error::EvalError;
use crate::value::Value;

/// Name under which the root capture of every match is bound.
pub const ROOT_VARIABLE: &str = "@";

/// Capture appended to patterns written without a top-level capture.
pub const IMPLICIT_ROOT_CAPTURE: &str = "__match";

/// Capture bindings of the current match.
///
/// Every capture `name` of the match is bound as `@name`; the root capture
/// is additionally bound as [`ROOT_VARIABLE`].
#[derive(Debug, Default)]
pub struct Bindings<'t> {
    vars: HashMap<String, Value<'t>>,
}

impl<'t> Bindings<'t> {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all bindings with the captures of `found`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingRootBinding`] when `found` has no capture
    /// named `root_capture`.
    pub fn bind_match(
        &mut self,
        found: &QueryMatch<'t>,
        root_capture: &str,
    ) -> Result<(), EvalError> {
        self.vars.clear();
        for capture in &found.captures {
            let value = Value::Node(capture.node);
            if capture.name == root_capture {
                self.vars.insert(ROOT_VARIABLE.to_owned(), value.clone());
            }
            self.vars.insert(format!("@{}", capture.name), value);
        }
        if self.vars.contains_key(ROOT_VARIABLE) {
            Ok(())
        } else {
            Err(EvalError::MissingRootBinding {
                capture: root_capture.to_owned(),
            })
        }
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    pub fn insert(&mut self, name: impl Into<String>, value: Value<'t>) {
        self.vars.insert(name.into(), value);
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value<'t>> {
        self.vars.get(name)
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    /// Returns the number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
