use crate::config::{ConfigSection, EvolutionConfig, GenerationConfig};
use crate::engines::evolution::individual::{rank, Individual, Population};
use crate::engines::evolution::operators::{crossover, mutate};
use crate::engines::evolution::progress::ProgressCallback;
use crate::error::{GramevoError, Result};
use crate::grammar::bnf::Grammar;
use crate::grammar::generator::Generator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Scoring interface the engine consumes. Lower scores are better.
///
/// Non-finite sentinel values (e.g. `f64::INFINITY` for a phenotype that
/// failed to compile downstream) are an evaluator-side convention and pass
/// through untouched; a NaN score is rejected because it would break ranking.
pub trait Evaluator {
    fn score(&self, phenotype: &str) -> Result<f64>;
}

impl<F> Evaluator for F
where
    F: Fn(&str) -> f64,
{
    fn score(&self, phenotype: &str) -> Result<f64> {
        Ok(self(phenotype))
    }
}

/// Generational evolution loop over derivation trees.
///
/// Deterministic given a seed: every randomized decision (rule choice,
/// operator choice, parent sampling, node sampling) draws from the one
/// `StdRng` stream, so identical seed + evaluator replays the same search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    generator: Generator,
    grammar: Arc<Grammar>,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(
        config: EvolutionConfig,
        generation: GenerationConfig,
        grammar: Arc<Grammar>,
    ) -> Result<Self> {
        config.validate()?;
        generation.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            generator: Generator::from_config(&generation),
            grammar,
            rng,
        })
    }

    /// Run the full generational loop and return the best (lowest-fitness)
    /// individual of the final, ranked population.
    pub fn run<E: Evaluator, C: ProgressCallback>(
        &mut self,
        evaluator: &E,
        callback: &mut C,
    ) -> Result<Individual> {
        let mut population = self.initialize_population();

        for generation in 0..self.config.generations {
            callback.on_generation_start(generation);

            self.evaluate_population(&mut population, evaluator, callback)?;
            rank(&mut population);

            let best = &population[0];
            log::debug!(
                "generation {}: best fitness {:.4}, phenotype {:?}",
                generation,
                best.fitness().unwrap_or(f64::INFINITY),
                best.phenotype()
            );
            callback.on_generation_complete(
                generation,
                best.fitness().unwrap_or(f64::INFINITY),
                best.phenotype(),
            );

            // The last generation is not reproduced, so the returned best
            // comes from a fully evaluated population.
            if generation + 1 == self.config.generations {
                break;
            }

            population = self.next_generation(&population);
        }

        if self.config.generations == 0 {
            // Degenerate run: still score and rank the initial population so
            // there is a best individual to hand back.
            self.evaluate_population(&mut population, evaluator, callback)?;
            rank(&mut population);
        }

        Ok(population
            .into_iter()
            .next()
            .expect("population size is validated positive"))
    }

    fn initialize_population(&mut self) -> Population {
        (0..self.config.population_size)
            .map(|_| Individual::new(self.generator.generate(&self.grammar, &mut self.rng)))
            .collect()
    }

    /// Score every individual whose fitness is still unset. The applied
    /// fitness is `raw + complexity * complexity_coefficient` (parsimony
    /// penalty).
    fn evaluate_population<E: Evaluator, C: ProgressCallback>(
        &mut self,
        population: &mut Population,
        evaluator: &E,
        callback: &mut C,
    ) -> Result<()> {
        let total = population.len();
        for (i, individual) in population.iter_mut().enumerate() {
            if individual.fitness().is_none() {
                let raw = evaluator.score(individual.phenotype())?;
                if raw.is_nan() {
                    return Err(GramevoError::Evaluation(format!(
                        "evaluator returned NaN for phenotype {:?}",
                        individual.phenotype()
                    )));
                }
                let penalty = individual.complexity() as f64 * self.config.complexity_coefficient;
                individual.set_fitness(raw + penalty);
            }
            callback.on_individual_evaluated(i + 1, total);
        }
        Ok(())
    }

    fn next_generation(&mut self, population: &Population) -> Population {
        let mut next = Vec::with_capacity(self.config.population_size);

        // Elitism: the champion survives unchanged, fitness included.
        next.push(population[0].clone());

        let pool_size = self.config.selection_pool_size.min(population.len());
        let pool = &population[..pool_size];

        while next.len() < self.config.population_size {
            let offspring =
                if pool.len() >= 2 && self.rng.gen::<f64>() < self.config.crossover_probability {
                    let first = self.rng.gen_range(0..pool.len());
                    let mut second = self.rng.gen_range(0..pool.len());
                    while second == first {
                        second = self.rng.gen_range(0..pool.len());
                    }
                    crossover(&pool[first], &pool[second], &self.generator, &mut self.rng)
                } else {
                    let parent = &pool[self.rng.gen_range(0..pool.len())];
                    mutate(parent, &self.generator, &mut self.rng)
                };
            next.push(offspring);
        }

        next
    }
}
