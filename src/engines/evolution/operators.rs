use crate::engines::evolution::individual::Individual;
use crate::grammar::generator::Generator;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Single-point subtree exchange between clones of two parents.
///
/// Both genotypes are deep-cloned first; the originals are never touched.
/// Clone-1's internal nodes are tried in random order until one has a
/// structurally-equal counterpart (same grammar symbol) among clone-2's
/// internal nodes, and the two nodes swap their child sequences. When the
/// parents share no internal symbol, the operator degrades to `mutate` on the
/// first parent rather than failing.
pub fn crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    generator: &Generator,
    rng: &mut R,
) -> Individual {
    let mut tree1 = parent1.genotype().clone();
    let mut tree2 = parent2.genotype().clone();

    let mut paths1 = tree1.non_leaf_paths();
    let paths2 = tree2.non_leaf_paths();
    paths1.shuffle(rng);

    for path1 in &paths1 {
        let symbol = &tree1.node_at(path1).symbol;
        let compatible: Vec<&Vec<usize>> = paths2
            .iter()
            .filter(|p| tree2.node_at(p).symbol == *symbol)
            .collect();
        if let Some(path2) = compatible.choose(rng) {
            let donor = &mut tree2.node_at_mut(path2).children;
            std::mem::swap(&mut tree1.node_at_mut(path1).children, donor);
            return Individual::new(tree1);
        }
    }

    mutate(parent1, generator, rng)
}

/// Regrow one random internal node of a cloned genotype.
///
/// If the clone has no internal nodes (a bare root), it is returned as-is; an
/// unchanged phenotype is an acceptable outcome, not an error.
pub fn mutate<R: Rng>(parent: &Individual, generator: &Generator, rng: &mut R) -> Individual {
    let mut tree = parent.genotype().clone();

    let paths = tree.non_leaf_paths();
    let Some(path) = paths.choose(rng) else {
        return Individual::new(tree);
    };

    let grammar = Arc::clone(&tree.grammar);
    let symbol = tree.node_at(path).symbol.clone();
    let subtree = generator.generate_from(&grammar, &symbol, rng);
    tree.node_at_mut(path).children = subtree.root.children;

    Individual::new(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(text: &str, seed: u64) -> (Arc<Grammar>, Generator, StdRng) {
        (
            Arc::new(Grammar::from_bnf(text).unwrap()),
            Generator::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn mutate_leaves_parent_untouched() {
        let (grammar, generator, mut rng) = setup("<S> ::= \"a\" <S> | \"b\"", 5);
        let parent = Individual::new(generator.generate(&grammar, &mut rng));
        let before = parent.phenotype().to_string();
        for _ in 0..20 {
            let _child = mutate(&parent, &generator, &mut rng);
            assert_eq!(parent.phenotype(), before);
        }
    }

    #[test]
    fn crossover_leaves_both_parents_untouched() {
        let (grammar, generator, mut rng) = setup("<S> ::= \"a\" <S> | \"b\"", 8);
        let p1 = Individual::new(generator.generate(&grammar, &mut rng));
        let p2 = Individual::new(generator.generate(&grammar, &mut rng));
        let (before1, before2) = (p1.genotype().root.clone(), p2.genotype().root.clone());
        for _ in 0..20 {
            let _child = crossover(&p1, &p2, &generator, &mut rng);
            assert_eq!(p1.genotype().root, before1);
            assert_eq!(p2.genotype().root, before2);
        }
    }

    #[test]
    fn crossover_offspring_stays_in_language() {
        let (grammar, generator, mut rng) = setup("<S> ::= \"a\" <S> | \"b\"", 11);
        let p1 = Individual::new(generator.generate(&grammar, &mut rng));
        let p2 = Individual::new(generator.generate(&grammar, &mut rng));
        for _ in 0..50 {
            let child = crossover(&p1, &p2, &generator, &mut rng);
            let phenotype = child.phenotype();
            if child.genotype().unexpanded_nonterminals().is_empty() {
                assert!(phenotype.ends_with('b'));
                assert!(phenotype[..phenotype.len() - 1].chars().all(|c| c == 'a'));
            }
        }
    }

    #[test]
    fn mutate_bare_root_returns_unchanged_phenotype() {
        let (grammar, generator, mut rng) = setup("", 2);
        let parent = Individual::new(generator.generate(&grammar, &mut rng));
        let child = mutate(&parent, &generator, &mut rng);
        assert_eq!(child.phenotype(), parent.phenotype());
    }

    #[test]
    fn crossover_is_reproducible_with_a_fixed_seed() {
        let (grammar, generator, _) = setup("<S> ::= \"a\" <S> | \"b\" | <S> <S>", 0);
        let mut setup_rng = StdRng::seed_from_u64(21);
        let p1 = Individual::new(generator.generate(&grammar, &mut setup_rng));
        let p2 = Individual::new(generator.generate(&grammar, &mut setup_rng));

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| crossover(&p1, &p2, &generator, &mut rng).phenotype().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
    }
}
