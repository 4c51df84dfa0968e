//! Tree-sitter layer for the tra toolchain.
//!
//! Everything tra needs from tree-sitter lives here:
//!
//! - [`SupportedLanguage`] picks a grammar and lists its node type names
//! - [`Parser`] turns input files into a [`ParseResult`]
//! - [`Query`] compiles rendered patterns and runs them, yielding
//!   [`QueryMatch`]es whose captures borrow from the parsed source
//! - [`Cancellation`] stops match iteration between matches
//!
//! # Supported Languages
//!
//! - Rust (`.rs`)
//! - Python (`.py`, `.pyi`)
//! - TypeScript and JavaScript (`.ts`, `.tsx`, `.mts`, `.cts`, `.js`,
//!   `.jsx`, `.mjs`, `.cjs`)
//! - Go (`.go`)
//! - Java (`.java`)

mod cancel;
mod capture;
mod error;
mod language;
mod parser;
mod query;

pub use cancel::Cancellation;
pub use capture::CapturedNode;
pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use query::{Capture, MatchCursor, Query, QueryMatch, QueryMatches};
