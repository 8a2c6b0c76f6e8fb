use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::GramevoError;
use crate::grammar::generator::{DEFAULT_EXPANSION_BUDGET, DEFAULT_WEIGHT_REDUCTION_FACTOR};
use serde::{Deserialize, Serialize};

/// Tree-generation settings shared by initialization and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub expansion_budget: usize,
    pub weight_reduction_factor: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            expansion_budget: DEFAULT_EXPANSION_BUDGET,
            weight_reduction_factor: DEFAULT_WEIGHT_REDUCTION_FACTOR,
        }
    }
}

impl ConfigSection for GenerationConfig {
    fn section_name() -> &'static str {
        "generation"
    }

    fn validate(&self) -> Result<(), GramevoError> {
        if self.expansion_budget == 0 {
            return Err(GramevoError::Configuration(
                "Expansion budget must be positive".to_string(),
            ));
        }
        if self.weight_reduction_factor <= 0.0 || self.weight_reduction_factor >= 1.0 {
            return Err(GramevoError::Configuration(
                "Weight reduction factor must be strictly between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Generation".to_string(),
            fields: vec![
                FieldManifest {
                    name: "expansion_budget".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(DEFAULT_EXPANSION_BUDGET),
                    min: Some(1.0),
                    max: None,
                    description: "Maximum expansion steps per generated tree".to_string(),
                },
                FieldManifest {
                    name: "weight_reduction_factor".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(DEFAULT_WEIGHT_REDUCTION_FACTOR),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Per-lineage decay applied to a chosen rule alternative"
                        .to_string(),
                },
            ],
        }
    }
}
