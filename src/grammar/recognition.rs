use crate::error::Result;
use crate::grammar::bnf::Grammar;
use crate::grammar::symbol::SymbolKind;
use crate::grammar::tree::DerivationTree;
use std::collections::HashMap;
use std::sync::Arc;

/// A grammar normalized into the line-per-rule form external CFG parsers
/// expect: nonterminals renamed `nt0..ntN`, terminals quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedGrammar {
    pub grammar_id: u64,
    pub start_rule: String,
    pub rules: Vec<String>,
}

/// External recognition capability. The engine never parses strings itself;
/// hosts that need generate -> recognize round-trips plug a parser in here.
pub trait Recognizer {
    /// Parser-configuration key; translations are memoized per profile.
    fn profile(&self) -> &str {
        "default"
    }

    /// Parse `input` against the translated grammar, failing with
    /// `GramevoError::Recognition` when the input is not in the language.
    fn recognize(
        &self,
        grammar: &Arc<Grammar>,
        translated: &TranslatedGrammar,
        input: &str,
    ) -> Result<DerivationTree>;
}

/// Memoization table for grammar-to-parser translation, keyed by
/// `(grammar id, profile)`. Grammars are immutable once built, so an entry
/// only becomes stale when the grammar object itself is rebuilt, which mints
/// a fresh id and therefore a fresh key.
#[derive(Debug, Default)]
pub struct RecognitionCache {
    translations: HashMap<(u64, String), Arc<TranslatedGrammar>>,
}

impl RecognitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recognize<R: Recognizer>(
        &mut self,
        recognizer: &R,
        grammar: &Arc<Grammar>,
        input: &str,
    ) -> Result<DerivationTree> {
        let translated = self.translated(grammar, recognizer.profile());
        recognizer.recognize(grammar, &translated, input)
    }

    pub fn translated(&mut self, grammar: &Grammar, profile: &str) -> Arc<TranslatedGrammar> {
        self.translations
            .entry((grammar.id(), profile.to_string()))
            .or_insert_with(|| Arc::new(translate(grammar)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

fn translate(grammar: &Grammar) -> TranslatedGrammar {
    // Sort for a stable renaming regardless of hash order.
    let mut nonterminals: Vec<_> = grammar.nonterminal_symbols.iter().collect();
    nonterminals.sort_by(|a, b| a.text.cmp(&b.text));
    let names: HashMap<_, _> = nonterminals
        .iter()
        .enumerate()
        .map(|(i, s)| (*s, format!("nt{}", i)))
        .collect();

    let mut rules = Vec::new();
    for lhs in &nonterminals {
        let Some(alternatives) = grammar.alternatives(lhs) else {
            continue;
        };
        let alts: Vec<String> = alternatives
            .iter()
            .map(|rhs| {
                rhs.iter()
                    .map(|s| match s.kind {
                        SymbolKind::Nonterminal => names[s].clone(),
                        SymbolKind::Terminal => quote_terminal(&s.text),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        rules.push(format!("{}: {}", names[lhs], alts.join(" | ")));
    }

    let start_rule = grammar
        .start_symbol()
        .and_then(|s| names.get(s).cloned())
        .unwrap_or_default();

    TranslatedGrammar {
        grammar_id: grammar.id(),
        start_rule,
        rules,
    }
}

fn quote_terminal(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
