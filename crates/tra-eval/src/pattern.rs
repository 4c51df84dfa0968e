//! Turns a DSL pattern into tree-sitter query text.

use std::collections::HashSet;
use std::ops::ControlFlow;

use tra_dsl::{Node, QueryPattern, SourceFile, visit_fn, walk};

use crate::abbrev::SymbolTable;
use crate::bindings::IMPLICIT_ROOT_CAPTURE;
use crate::error::EvalError;

/// A pattern with resolved symbols, rendered for the query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPattern {
    query: String,
    root_capture: String,
}

impl PreparedPattern {
    /// Validates `pattern`, resolves its abbreviations against `symbols`
    /// and renders it. The program AST is left untouched.
    ///
    /// A pattern without a top-level capture gets `@__match` so every match
    /// has a root node.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DuplicateCapture`] when a capture name repeats,
    /// [`EvalError::ReservedCapture`] for a capture named `@__match`, and
    /// the resolver errors for unknown or ambiguous symbols.
    pub fn new(
        pattern: &QueryPattern,
        symbols: &SymbolTable,
        file: &SourceFile,
    ) -> Result<Self, EvalError> {
        check_captures(pattern, file)?;

        let mut resolved = pattern.clone();
        symbols.resolve_pattern(&mut resolved, file)?;

        let mut query = resolved.to_string();
        let root_capture = resolved.capture_name().map_or_else(
            || {
                query.push_str(" @");
                query.push_str(IMPLICIT_ROOT_CAPTURE);
                IMPLICIT_ROOT_CAPTURE.to_owned()
            },
            ToOwned::to_owned,
        );
        Ok(Self {
            query,
            root_capture,
        })
    }

    /// Returns the query text handed to tree-sitter.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the root capture name without `@`.
    #[must_use]
    pub fn root_capture(&self) -> &str {
        &self.root_capture
    }
}

fn check_captures(pattern: &QueryPattern, file: &SourceFile) -> Result<(), EvalError> {
    let mut seen = HashSet::new();
    let flow = walk(
        Node::QueryPattern(pattern),
        &mut visit_fn(|node: Node<'_>| {
            let Node::QueryPattern(nested) = node else {
                return ControlFlow::Continue(());
            };
            let Some(capture) = &nested.capture else {
                return ControlFlow::Continue(());
            };
            if capture.name.strip_prefix('@') == Some(IMPLICIT_ROOT_CAPTURE) {
                return ControlFlow::Break(EvalError::ReservedCapture {
                    name: capture.name.clone(),
                    position: file.position(capture.pos),
                });
            }
            if seen.insert(capture.name.clone()) {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(EvalError::DuplicateCapture {
                    name: capture.name.clone(),
                    position: file.position(capture.pos),
                })
            }
        }),
    );
    match flow {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tra_dsl::{Program, parse_file};

    #[fixture]
    fn symbols() -> SymbolTable {
        SymbolTable::new([
            "case",
            "catch",
            "identifier",
            "string",
            "string_fragment",
            "variable_declarator",
        ])
    }

    fn program(src: &str) -> Program {
        parse_file("<test>", src).unwrap_or_else(|err| panic!("parse: {err}"))
    }

    fn prepare(src: &str, symbols: &SymbolTable) -> Result<PreparedPattern, EvalError> {
        let parsed = program(src);
        let rule = parsed
            .patterns
            .first()
            .unwrap_or_else(|| panic!("no rule in {src}"));
        PreparedPattern::new(&rule.pattern, symbols, &parsed.file)
    }

    #[rstest]
    #[case("(id) {print(@)}", "(identifier) @__match", "__match")]
    #[case("(id) @x {print(@)}", "(identifier) @x", "x")]
    #[case(
        "(var_decl name: (id) @name) {print(@name)}",
        "(variable_declarator name: (identifier) @name) @__match",
        "__match"
    )]
    #[case("(str (str_frag) @f) @s {print(@)}", "(string (string_fragment) @f) @s", "s")]
    #[case("(_) {print(@)}", "(_) @__match", "__match")]
    fn renders_resolved_query(
        symbols: SymbolTable,
        #[case] src: &str,
        #[case] query: &str,
        #[case] root: &str,
    ) {
        let prepared = prepare(src, &symbols).unwrap_or_else(|err| panic!("prepare: {err}"));
        assert_eq!(prepared.query(), query);
        assert_eq!(prepared.root_capture(), root);
    }

    #[rstest]
    fn ambiguous_abbreviation_lists_candidates(symbols: SymbolTable) {
        let err = prepare("(ca) {print(@)}", &symbols)
            .err()
            .map(|err| err.to_string());
        assert_eq!(
            err.as_deref(),
            Some("<test>:1:2: ambiguous symbol abbreviation ca (candidates: case, catch)")
        );
    }

    #[rstest]
    fn unknown_symbol_is_reported_with_position(symbols: SymbolTable) {
        let err = prepare("(identifier\n  (zebra)) {print(@)}", &symbols)
            .err()
            .map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("<test>:2:4: unknown symbol zebra"));
    }

    #[rstest]
    fn duplicate_captures_are_rejected(symbols: SymbolTable) {
        let err = prepare("(var_decl (id) @x (str) @x) {print(@x)}", &symbols)
            .err()
            .map(|err| err.to_string());
        assert_eq!(
            err.as_deref(),
            Some("<test>:1:25: capture @x is already used in this pattern")
        );
    }

    #[rstest]
    #[case(
        "(var_decl name: (id) @__match) {print(@)}",
        "<test>:1:22: capture @__match is reserved"
    )]
    #[case("(id) @__match {print(@)}", "<test>:1:6: capture @__match is reserved")]
    fn implicit_root_capture_name_is_reserved(
        symbols: SymbolTable,
        #[case] src: &str,
        #[case] expected: &str,
    ) {
        let err = prepare(src, &symbols).err().map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some(expected));
    }

    #[rstest]
    fn program_ast_keeps_abbreviations(symbols: SymbolTable) {
        let parsed = program("(id) {print(@)}");
        let rule = parsed
            .patterns
            .first()
            .unwrap_or_else(|| panic!("no rule"));
        PreparedPattern::new(&rule.pattern, &symbols, &parsed.file)
            .unwrap_or_else(|err| panic!("prepare: {err}"));
        assert_eq!(rule.pattern.symbol.name, "id");
    }
}
