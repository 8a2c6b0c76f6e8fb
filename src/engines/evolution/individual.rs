use crate::grammar::tree::DerivationTree;

/// One candidate solution: a derivation tree plus its derived phenotype.
///
/// Phenotype and complexity are fixed at construction. Fitness starts unset
/// and is assigned exactly once, when the evolution loop first evaluates the
/// individual; the elite carried between generations keeps its fitness and is
/// never re-scored.
#[derive(Debug, Clone)]
pub struct Individual {
    genotype: DerivationTree,
    phenotype: String,
    complexity: usize,
    fitness: Option<f64>,
}

impl Individual {
    pub fn new(genotype: DerivationTree) -> Self {
        let phenotype = genotype.phenotype();
        let complexity = phenotype.len();
        Self {
            genotype,
            phenotype,
            complexity,
            fitness: None,
        }
    }

    pub fn genotype(&self) -> &DerivationTree {
        &self.genotype
    }

    pub fn phenotype(&self) -> &str {
        &self.phenotype
    }

    /// Parsimony measure: the phenotype's character length.
    pub fn complexity(&self) -> usize {
        self.complexity
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        debug_assert!(self.fitness.is_none(), "fitness is assigned exactly once");
        self.fitness = Some(fitness);
    }
}

pub type Population = Vec<Individual>;

/// Sort ascending by fitness (lower is better). Unevaluated individuals sort
/// last; after an evaluate phase there are none.
pub fn rank(population: &mut Population) {
    population.sort_by(|a, b| {
        match (a.fitness(), b.fitness()) {
            (Some(fa), Some(fb)) => fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}
