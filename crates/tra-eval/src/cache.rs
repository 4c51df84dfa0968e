//! Per-language symbol tables, built on first use.

use std::collections::HashMap;

use tracing::debug;
use tra_syntax::SupportedLanguage;

use crate::abbrev::SymbolTable;

/// Owns one [`SymbolTable`] per language.
///
/// Tables are built the first time a language is requested and are never
/// modified afterwards.
#[derive(Debug, Default)]
pub struct SymbolTableCache {
    tables: HashMap<SupportedLanguage, SymbolTable>,
}

impl SymbolTableCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for `language`, building it if needed.
    pub fn get_or_build(&mut self, language: SupportedLanguage) -> &SymbolTable {
        self.tables.entry(language).or_insert_with(|| {
            let table = SymbolTable::for_language(language);
            debug!(%language, symbols = table.len(), "built symbol table");
            table
        })
    }

    /// Returns the table for `language` if it was already built.
    #[must_use]
    pub fn get(&self, language: SupportedLanguage) -> Option<&SymbolTable> {
        self.tables.get(&language)
    }

    /// Returns the number of tables built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns whether no table has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
