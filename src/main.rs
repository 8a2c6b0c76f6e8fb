use gramevo::engines::evolution::ConsoleProgressCallback;
use gramevo::{EvolutionConfig, EvolutionEngine, GenerationConfig, Grammar};
use std::sync::Arc;

const TARGET: &str = "aaaaab";

/// Character-level distance to the target string; lower is better.
fn score(phenotype: &str) -> f64 {
    let mismatches = TARGET
        .chars()
        .zip(phenotype.chars())
        .filter(|(t, p)| t != p)
        .count();
    let length_gap = (TARGET.len() as i64 - phenotype.len() as i64).unsigned_abs();
    (mismatches + length_gap as usize) as f64
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let grammar = Arc::new(Grammar::from_bnf("<S> ::= \"a\" <S> | \"b\"")?);

    let config = EvolutionConfig {
        population_size: 30,
        generations: 25,
        complexity_coefficient: 0.01,
        seed: Some(1234),
        ..Default::default()
    };

    let mut engine = EvolutionEngine::new(config, GenerationConfig::default(), grammar)?;
    let best = engine.run(&score, &mut ConsoleProgressCallback)?;

    println!();
    println!("Target:    {}", TARGET);
    println!("Best:      {}", best.phenotype());
    println!("Fitness:   {:.4}", best.fitness().unwrap_or(f64::INFINITY));
    Ok(())
}
