//! Evaluation engine for tra programs.
//!
//! [`compile`] parses program text; an [`Evaluator`] then runs the compiled
//! program over any number of inputs. Per input, every rule's pattern is
//! resolved against the input language's grammar (see [`SymbolTable`]),
//! rendered as a tree-sitter query and matched. Each match binds its
//! captures as `@name`, plus the root capture as `@`, and runs the rule's
//! action. The only built-in is `print`:
//!
//! | value  | printed as                         |
//! |--------|------------------------------------|
//! | string | the string                         |
//! | int    | decimal digits                     |
//! | node   | its exact source text              |
//! | dict   | one-line JSON object, sorted keys  |
//!
//! Every printed value is followed by a newline.

mod abbrev;
mod action;
mod bindings;
mod cache;
mod engine;
mod error;
mod pattern;
mod value;

pub use abbrev::SymbolTable;
pub use bindings::{Bindings, IMPLICIT_ROOT_CAPTURE, ROOT_VARIABLE};
pub use cache::SymbolTableCache;
pub use engine::{CompiledProgram, EvalOptions, EvalSummary, Evaluator, compile};
pub use error::EvalError;
pub use pattern::PreparedPattern;
pub use value::{DictValue, Value};

#[cfg(test)]
mod tests;
