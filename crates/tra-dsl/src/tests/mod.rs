//! Unit tests for tra-dsl.

mod parser;
