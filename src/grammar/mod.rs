pub mod bnf;
pub mod generator;
pub mod recognition;
pub mod symbol;
pub mod tree;

pub use bnf::Grammar;
pub use generator::Generator;
pub use recognition::{RecognitionCache, Recognizer, TranslatedGrammar};
pub use symbol::{Symbol, SymbolKind};
pub use tree::{DerivationTree, Node, NodePath};
