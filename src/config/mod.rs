pub mod evolution;
pub mod generation;
pub mod manager;
pub mod traits;

pub use evolution::EvolutionConfig;
pub use generation::GenerationConfig;
pub use manager::{AppConfig, ConfigManager};
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
