use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a symbol plays in a production rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

/// Grammar symbol with structural equality over (kind, text).
///
/// Symbols are value types: two `Nonterminal` symbols with the same text are
/// the same symbol wherever they appear, which is what makes them usable as
/// rule-table keys and as crossover compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub text: String,
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Self {
            kind: SymbolKind::Terminal,
            text: text.into(),
        }
    }

    pub fn nonterminal(text: impl Into<String>) -> Self {
        Self {
            kind: SymbolKind::Nonterminal,
            text: text.into(),
        }
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == SymbolKind::Nonterminal
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SymbolKind::Nonterminal => write!(f, "<{}>", self.text),
            SymbolKind::Terminal => write!(f, "{}", self.text),
        }
    }
}
