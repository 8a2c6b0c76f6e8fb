pub mod config;
pub mod engines;
pub mod error;
pub mod grammar;

pub use config::{EvolutionConfig, GenerationConfig};
pub use engines::evolution::{EvolutionEngine, Evaluator, ProgressCallback};
pub use error::{GramevoError, Result};
pub use grammar::{DerivationTree, Generator, Grammar, Symbol, SymbolKind};
