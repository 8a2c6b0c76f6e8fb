use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::GramevoError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub complexity_coefficient: f64,
    pub crossover_probability: f64,
    pub selection_pool_size: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 10,
            complexity_coefficient: 0.1,
            crossover_probability: 0.7,
            selection_pool_size: 10,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GramevoError> {
        if self.population_size == 0 {
            return Err(GramevoError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.complexity_coefficient < 0.0 {
            return Err(GramevoError::Configuration(
                "Complexity coefficient must be non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(GramevoError::Configuration(
                "Crossover probability must be between 0 and 1".to_string(),
            ));
        }
        if self.selection_pool_size == 0 {
            return Err(GramevoError::Configuration(
                "Selection pool size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest {
                    name: "population_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(20),
                    min: Some(1.0),
                    max: Some(10000.0),
                    description: "Number of individuals in the population".to_string(),
                },
                FieldManifest {
                    name: "generations".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(10),
                    min: Some(0.0),
                    max: None,
                    description: "Number of evolutionary rounds to run".to_string(),
                },
                FieldManifest {
                    name: "complexity_coefficient".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(0.1),
                    min: Some(0.0),
                    max: None,
                    description: "Parsimony penalty per phenotype character".to_string(),
                },
                FieldManifest {
                    name: "crossover_probability".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(0.7),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Chance an offspring comes from crossover vs mutation"
                        .to_string(),
                },
                FieldManifest {
                    name: "selection_pool_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(10),
                    min: Some(1.0),
                    max: None,
                    description: "Parents are sampled from the top K ranked individuals"
                        .to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn manifest_lists_every_recognized_option() {
        let manifest = EvolutionConfig::default().to_manifest();
        let names: Vec<&str> = manifest.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "population_size",
                "generations",
                "complexity_coefficient",
                "crossover_probability",
                "selection_pool_size",
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = EvolutionConfig::default();
        config.crossover_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = EvolutionConfig::default();
        config.population_size = 0;
        assert!(config.validate().is_err());
    }
}
