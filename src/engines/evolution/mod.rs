pub mod engine;
pub mod individual;
pub mod operators;
pub mod progress;

pub use engine::{Evaluator, EvolutionEngine};
pub use individual::{Individual, Population};
pub use operators::{crossover, mutate};
pub use progress::{ConsoleProgressCallback, ProgressCallback, SilentProgressCallback};
