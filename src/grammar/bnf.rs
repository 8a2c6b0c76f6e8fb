use crate::error::{GramevoError, Result};
use crate::grammar::symbol::{Symbol, SymbolKind};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

const RULE_SEPARATOR: &str = "::=";
const ALTERNATIVE_SEPARATOR: char = '|';

static NEXT_GRAMMAR_ID: AtomicU64 = AtomicU64::new(0);

/// A context-free grammar parsed from BNF-like text.
///
/// The grammar is built once and read-only afterwards; trees hold it behind
/// an `Arc` and never mutate it. `id` is process-unique and serves as the
/// cache key for recognizer translation (see `grammar::recognition`).
#[derive(Debug)]
pub struct Grammar {
    id: u64,
    pub terminal_symbols: HashSet<Symbol>,
    pub nonterminal_symbols: HashSet<Symbol>,
    pub production_rules: HashMap<Symbol, Vec<Vec<Symbol>>>,
    pub start_symbol: Option<Symbol>,
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAMMAR_ID.fetch_add(1, Ordering::Relaxed),
            terminal_symbols: HashSet::new(),
            nonterminal_symbols: HashSet::new(),
            production_rules: HashMap::new(),
            start_symbol: None,
        }
    }

    /// Parse BNF text into a grammar.
    ///
    /// Each rule line is `<LHS> ::= alt1 | alt2 | ...`. Lines without the
    /// `::=` separator are skipped with a warning, not fatal; a grammar with
    /// zero rules is valid but degenerate. The first rule line defines the
    /// start symbol.
    pub fn from_bnf(bnf_text: &str) -> Result<Self> {
        let mut grammar = Self::new();
        grammar.extend_from_bnf(bnf_text)?;
        Ok(grammar)
    }

    /// Add rules from further BNF text. Repeated left-hand sides append
    /// alternatives rather than overwrite.
    pub fn extend_from_bnf(&mut self, bnf_text: &str) -> Result<()> {
        for line in bnf_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((lhs_raw, rhs_raw)) = line.split_once(RULE_SEPARATOR) else {
                log::warn!("Skipping grammar line without '{}': {}", RULE_SEPARATOR, line);
                continue;
            };

            let lhs_name = lhs_raw
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .trim();
            if lhs_name.is_empty() {
                return Err(GramevoError::GrammarSyntax(format!(
                    "Empty left-hand side in rule: {}",
                    line
                )));
            }

            let lhs = Symbol::nonterminal(lhs_name);
            if self.start_symbol.is_none() {
                self.start_symbol = Some(lhs.clone());
            }
            self.nonterminal_symbols.insert(lhs.clone());

            let alternatives = self.production_rules.entry(lhs).or_default();
            for alt in rhs_raw.split(ALTERNATIVE_SEPARATOR) {
                let mut rhs = Vec::new();
                for token in tokenize_alternative(alt) {
                    let symbol = match token {
                        Token::Nonterminal(name) => {
                            let sym = Symbol::nonterminal(name);
                            self.nonterminal_symbols.insert(sym.clone());
                            sym
                        }
                        Token::Terminal(text) => {
                            let sym = Symbol::terminal(text);
                            self.terminal_symbols.insert(sym.clone());
                            sym
                        }
                    };
                    rhs.push(symbol);
                }
                alternatives.push(rhs);
            }
        }
        Ok(())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Alternatives for a nonterminal, or `None` if it has no rule entry.
    /// A ruleless nonterminal is not an error: the generator treats it as a
    /// generation-terminal leaf.
    pub fn alternatives(&self, symbol: &Symbol) -> Option<&[Vec<Symbol>]> {
        debug_assert_eq!(symbol.kind, SymbolKind::Nonterminal);
        self.production_rules.get(symbol).map(Vec::as_slice)
    }

    pub fn start_symbol(&self) -> Option<&Symbol> {
        self.start_symbol.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.production_rules.is_empty()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

enum Token {
    Nonterminal(String),
    Terminal(String),
}

/// Tokenize one rule alternative into atomic units: `<name>` nonterminal
/// references, quoted literal terminals, or single non-whitespace characters
/// as implicit terminals.
fn tokenize_alternative(alt: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = alt.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '<' {
            if let Some(end) = chars[i + 1..].iter().position(|&c| c == '>') {
                let name: String = chars[i + 1..i + 1 + end].iter().collect();
                tokens.push(Token::Nonterminal(name));
                i += end + 2;
            } else {
                // Unbalanced bracket, treat as an implicit terminal
                tokens.push(Token::Terminal(c.to_string()));
                i += 1;
            }
        } else if c == '"' || c == '\'' {
            if let Some(end) = chars[i + 1..].iter().position(|&q| q == c) {
                let text: String = chars[i + 1..i + 1 + end].iter().collect();
                tokens.push(Token::Terminal(text));
                i += end + 2;
            } else {
                tokens.push(Token::Terminal(c.to_string()));
                i += 1;
            }
        } else {
            tokens.push(Token::Terminal(c.to_string()));
            i += 1;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rule_defines_start_symbol() {
        let grammar = Grammar::from_bnf("<S> ::= \"a\"\n<T> ::= \"b\"").unwrap();
        assert_eq!(grammar.start_symbol(), Some(&Symbol::nonterminal("S")));
    }

    #[test]
    fn repeated_lhs_appends_alternatives() {
        let grammar = Grammar::from_bnf("<S> ::= \"a\"\n<S> ::= \"b\" | \"c\"").unwrap();
        let alts = grammar.alternatives(&Symbol::nonterminal("S")).unwrap();
        assert_eq!(alts.len(), 3);
    }

    #[test]
    fn lines_without_separator_are_skipped() {
        let grammar = Grammar::from_bnf("# a comment line\n<S> ::= \"a\"").unwrap();
        assert_eq!(grammar.production_rules.len(), 1);
    }

    #[test]
    fn empty_lhs_is_an_error() {
        assert!(Grammar::from_bnf("<> ::= \"a\"").is_err());
    }

    #[test]
    fn tokenizes_quoted_and_bare_and_bracketed() {
        let grammar = Grammar::from_bnf("<S> ::= \"print(\" <VAL> ) x").unwrap();
        let alts = grammar.alternatives(&Symbol::nonterminal("S")).unwrap();
        assert_eq!(
            alts[0],
            vec![
                Symbol::terminal("print("),
                Symbol::nonterminal("VAL"),
                Symbol::terminal(")"),
                Symbol::terminal("x"),
            ]
        );
        assert!(grammar
            .nonterminal_symbols
            .contains(&Symbol::nonterminal("VAL")));
        assert!(grammar.terminal_symbols.contains(&Symbol::terminal(")")));
    }

    #[test]
    fn zero_rule_grammar_is_valid_but_degenerate() {
        let grammar = Grammar::from_bnf("just prose, no rules").unwrap();
        assert!(grammar.is_empty());
        assert!(grammar.start_symbol().is_none());
    }

    #[test]
    fn grammar_ids_are_unique() {
        let a = Grammar::new();
        let b = Grammar::new();
        assert_ne!(a.id(), b.id());
    }
}
