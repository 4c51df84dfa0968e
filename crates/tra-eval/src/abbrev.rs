//! Abbreviated node type names.
//!
//! Patterns may name node types by abbreviation: each `_`-separated part of
//! the abbreviation must be a prefix of the corresponding part of exactly one
//! grammar symbol with the same number of parts. `ar_pat` therefore names
//! `array_pattern` but not `array_pattern_repeat1`.

use std::cmp::Ordering;
use std::ops::ControlFlow;

use tra_dsl::{Ident, NodeMut, QueryPattern, SourceFile, visit_fn_mut, walk_mut};
use tra_syntax::SupportedLanguage;

use crate::error::EvalError;

/// Node names tree-sitter queries accept without them being grammar symbols.
const SPECIAL_NODE_NAMES: [&str; 2] = ["ERROR", "MISSING"];

/// Sorted, duplicate-free node type names of one grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<String>,
}

impl SymbolTable {
    /// Builds a table from arbitrary symbol names.
    #[must_use]
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = symbols.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        Self { symbols: names }
    }

    /// Builds the table for a supported grammar.
    #[must_use]
    pub fn for_language(language: SupportedLanguage) -> Self {
        Self::new(language.symbol_names())
    }

    /// Returns the number of symbols.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether the table holds no symbols.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns whether `symbol` is a grammar symbol verbatim.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.exact(symbol).is_some()
    }

    /// Returns every symbol `abbrev` could stand for.
    ///
    /// An exact match is returned alone. Otherwise all candidates with the
    /// best prefix score are returned in table order; an empty result means
    /// the abbreviation is unknown.
    #[must_use]
    pub fn lookup(&self, abbrev: &str) -> Vec<&str> {
        if let Some(symbol) = self.exact(abbrev) {
            return vec![symbol];
        }

        let parts: Vec<&str> = abbrev.split('_').collect();
        let head = parts.first().copied().unwrap_or_default();
        let start = self.symbols.partition_point(|symbol| symbol.as_str() < head);

        let mut best_score = 0;
        let mut best = Vec::new();
        for symbol in self.symbols.iter().skip(start) {
            if !symbol.starts_with(head) {
                break;
            }
            let Some(score) = prefix_score(&parts, symbol) else {
                continue;
            };
            match score.cmp(&best_score) {
                Ordering::Greater => {
                    best_score = score;
                    best.clear();
                    best.push(symbol.as_str());
                }
                Ordering::Equal => best.push(symbol.as_str()),
                Ordering::Less => {}
            }
        }
        best
    }

    /// Replaces `symbol` by the unique grammar symbol it abbreviates.
    ///
    /// Names starting with `_` are left alone, as are `ERROR` and `MISSING`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownSymbol`] when nothing matches and
    /// [`EvalError::AmbiguousSymbol`] when several symbols tie.
    pub fn resolve_ident(&self, symbol: &mut Ident, file: &SourceFile) -> Result<(), EvalError> {
        if symbol.name.starts_with('_') || SPECIAL_NODE_NAMES.contains(&symbol.name.as_str()) {
            return Ok(());
        }
        let candidates = self.lookup(&symbol.name);
        match candidates.as_slice() {
            [] => Err(EvalError::UnknownSymbol {
                symbol: symbol.name.clone(),
                position: file.position(symbol.pos),
            }),
            [resolved] => {
                if *resolved != symbol.name {
                    symbol.name = (*resolved).to_owned();
                }
                Ok(())
            }
            _ => Err(EvalError::AmbiguousSymbol {
                symbol: symbol.name.clone(),
                candidates: candidates.iter().map(|name| (*name).to_owned()).collect(),
                position: file.position(symbol.pos),
            }),
        }
    }

    /// Resolves the symbol of `pattern` and of every nested pattern in
    /// place, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::resolve_ident`].
    pub fn resolve_pattern(
        &self,
        pattern: &mut QueryPattern,
        file: &SourceFile,
    ) -> Result<(), EvalError> {
        let flow = walk_mut(
            NodeMut::QueryPattern(pattern),
            &mut visit_fn_mut(|node: NodeMut<'_>| {
                let NodeMut::QueryPattern(nested) = node else {
                    return ControlFlow::Continue(());
                };
                match self.resolve_ident(&mut nested.symbol, file) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(err) => ControlFlow::Break(err),
                }
            }),
        );
        match flow {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(err) => Err(err),
        }
    }

    fn exact(&self, symbol: &str) -> Option<&str> {
        self.symbols
            .binary_search_by(|candidate| candidate.as_str().cmp(symbol))
            .ok()
            .and_then(|index| self.symbols.get(index))
            .map(String::as_str)
    }
}

/// Sums the lengths of the abbreviation parts when every part prefixes the
/// matching part of `symbol`.
fn prefix_score(parts: &[&str], symbol: &str) -> Option<usize> {
    let symbol_parts: Vec<&str> = symbol.split('_').collect();
    if symbol_parts.len() != parts.len() {
        return None;
    }
    parts
        .iter()
        .zip(&symbol_parts)
        .try_fold(0_usize, |score, (part, candidate)| {
            candidate
                .starts_with(part)
                .then(|| score.saturating_add(part.len()))
        })
}
