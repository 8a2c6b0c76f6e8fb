use crate::config::GenerationConfig;
use crate::grammar::bnf::Grammar;
use crate::grammar::symbol::Symbol;
use crate::grammar::tree::{DerivationTree, Node, NodePath};
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const DEFAULT_EXPANSION_BUDGET: usize = 50;
pub const DEFAULT_WEIGHT_REDUCTION_FACTOR: f64 = 0.9;

/// Per-branch alternative weights: `weights[nonterminal][alternative_index]`.
/// Passed by value down each branch of the expansion queue; sibling branches
/// never share a table mutably.
type WeightTable = HashMap<Symbol, Vec<f64>>;

/// Weighted-random derivation-tree builder with guaranteed termination.
///
/// Expansion is bounded two ways: a hard `expansion_budget`, and a soft decay
/// where every time an alternative is chosen, its weight under that lineage is
/// multiplied by `weight_reduction_factor`, so repeatedly taking the same
/// recursive expansion becomes exponentially unlikely without ever being
/// forbidden outright.
#[derive(Debug, Clone)]
pub struct Generator {
    pub expansion_budget: usize,
    pub weight_reduction_factor: f64,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            expansion_budget: DEFAULT_EXPANSION_BUDGET,
            weight_reduction_factor: DEFAULT_WEIGHT_REDUCTION_FACTOR,
        }
    }
}

impl Generator {
    pub fn new(expansion_budget: usize, weight_reduction_factor: f64) -> Self {
        Self {
            expansion_budget,
            weight_reduction_factor,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.expansion_budget, config.weight_reduction_factor)
    }

    /// Generate a tree rooted at the grammar's start symbol. A grammar with
    /// no rules has no start symbol; generation then yields a childless root
    /// with an empty phenotype (degenerate, not an error).
    pub fn generate<R: Rng>(&self, grammar: &Arc<Grammar>, rng: &mut R) -> DerivationTree {
        let start = grammar
            .start_symbol()
            .cloned()
            .unwrap_or_else(|| Symbol::nonterminal(""));
        self.generate_from(grammar, &start, rng)
    }

    /// Generate a tree rooted at an arbitrary symbol. Used directly by
    /// mutation to regrow a subtree under its original symbol.
    pub fn generate_from<R: Rng>(
        &self,
        grammar: &Arc<Grammar>,
        root_symbol: &Symbol,
        rng: &mut R,
    ) -> DerivationTree {
        let mut tree = DerivationTree::new(Arc::clone(grammar), root_symbol.clone());

        let initial_weights: WeightTable = grammar
            .production_rules
            .iter()
            .map(|(symbol, alts)| (symbol.clone(), vec![1.0; alts.len()]))
            .collect();

        // Breadth-first: nodes closer to the root get the earlier,
        // higher-weight expansions.
        let mut pending: VecDeque<(NodePath, WeightTable)> = VecDeque::new();
        if root_symbol.is_nonterminal() {
            pending.push_back((Vec::new(), initial_weights));
        }

        let mut expansions = 0;
        while expansions < self.expansion_budget {
            let Some((path, weights)) = pending.pop_front() else {
                break;
            };

            let symbol = tree.node_at(&path).symbol.clone();
            let Some(alternatives) = grammar.alternatives(&symbol) else {
                // Ruleless nonterminal: stays a generation-terminal leaf.
                continue;
            };

            let choice = weighted_choice(&weights[&symbol], rng);
            let rhs = &alternatives[choice];
            tree.node_at_mut(&path).children = rhs.iter().cloned().map(Node::new).collect();
            expansions += 1;

            let nonterminal_children: Vec<usize> = rhs
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_nonterminal())
                .map(|(i, _)| i)
                .collect();
            if nonterminal_children.is_empty() {
                continue;
            }

            // Children inherit the lineage's table with the just-chosen
            // alternative decayed; each child gets its own copy.
            let mut child_weights = weights;
            if let Some(w) = child_weights.get_mut(&symbol) {
                w[choice] *= self.weight_reduction_factor;
            }
            let (last, rest) = nonterminal_children.split_last().expect("non-empty");
            for &i in rest {
                let mut child_path = path.clone();
                child_path.push(i);
                pending.push_back((child_path, child_weights.clone()));
            }
            let mut child_path = path;
            child_path.push(*last);
            pending.push_back((child_path, child_weights));
        }

        tree
    }
}

/// Cumulative-sum sampling: draw `r` uniformly in `[0, total)` and pick the
/// first alternative whose running cumulative weight reaches `r`.
fn weighted_choice<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    if weights.len() == 1 {
        return 0;
    }
    let total: f64 = weights.iter().sum();
    let r = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= r {
            return i;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grammar(text: &str) -> Arc<Grammar> {
        Arc::new(Grammar::from_bnf(text).unwrap())
    }

    #[test]
    fn expansion_count_never_exceeds_budget() {
        // Left-recursive and right-recursive, no terminal escape at all:
        // only the budget stops this one.
        let g = grammar("<S> ::= <S> <S> | \"x\" <S>");
        let mut rng = StdRng::seed_from_u64(7);
        for budget in [1, 3, 10, 40] {
            let generator = Generator::new(budget, 0.9);
            let tree = generator.generate(&g, &mut rng);
            // Every expansion adds at least one node beyond the root.
            assert!(tree.node_count() <= 1 + budget * 2);
        }
    }

    #[test]
    fn ruleless_nonterminal_stays_childless() {
        let g = grammar("<S> ::= \"a\" <MISSING>");
        let mut rng = StdRng::seed_from_u64(1);
        let tree = Generator::default().generate(&g, &mut rng);
        assert_eq!(tree.phenotype(), "a");
        assert!(tree.unexpanded_nonterminals().is_empty());
    }

    #[test]
    fn zero_rule_grammar_yields_childless_root() {
        let g = grammar("");
        let mut rng = StdRng::seed_from_u64(1);
        let tree = Generator::default().generate(&g, &mut rng);
        assert!(tree.root.is_leaf());
        assert_eq!(tree.phenotype(), "");
    }

    #[test]
    fn fixed_grammar_produces_exact_phenotypes() {
        let g = grammar("<START> ::= \"print(\" <VAL> \")\"\n<VAL> ::= \"1\" | \"2\"");
        let mut rng = StdRng::seed_from_u64(42);
        let generator = Generator::default();
        for _ in 0..50 {
            let phenotype = generator.generate(&g, &mut rng).phenotype();
            assert!(
                phenotype == "print(1)" || phenotype == "print(2)",
                "unexpected phenotype: {}",
                phenotype
            );
        }
    }

    #[test]
    fn recursive_grammar_matches_pattern_within_budget() {
        let g = grammar("<S> ::= \"a\" <S> | \"b\"");
        let mut rng = StdRng::seed_from_u64(3);
        let generator = Generator::new(5, 0.9);
        for _ in 0..200 {
            let tree = generator.generate(&g, &mut rng);
            let phenotype = tree.phenotype();
            assert!(phenotype.len() <= 5);
            if tree.unexpanded_nonterminals().is_empty() {
                assert!(phenotype.ends_with('b'));
                assert!(phenotype[..phenotype.len() - 1].chars().all(|c| c == 'a'));
            } else {
                // Budget ran out: all-a prefix with the trailing <S> unexpanded.
                assert!(phenotype.chars().all(|c| c == 'a'));
            }
        }
    }

    #[test]
    fn same_seed_same_tree() {
        let g = grammar("<S> ::= \"a\" <S> | \"b\" <S> | \"c\"");
        let generator = Generator::default();
        let a = generator.generate(&g, &mut StdRng::seed_from_u64(99));
        let b = generator.generate(&g, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.root, b.root);
    }
}
