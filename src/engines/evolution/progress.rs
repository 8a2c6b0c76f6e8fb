/// Host-visible progress reporting for [`super::EvolutionEngine::run`].
pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, best_phenotype: &str);
    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize);
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, best_phenotype: &str) {
        println!(
            "Generation {} | Best Score: {:.2} | Phenotype: {}",
            generation,
            best_fitness,
            truncate(best_phenotype, 50)
        );
    }

    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize) {
        if evaluated % 10 == 0 || evaluated == total {
            log::debug!("  Evaluated {}/{} individuals", evaluated, total);
        }
    }
}

/// No-op callback for hosts that only want the returned best individual.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64, _best_phenotype: &str) {}
    fn on_individual_evaluated(&mut self, _evaluated: usize, _total: usize) {}
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
