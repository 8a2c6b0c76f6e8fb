use crate::grammar::bnf::Grammar;
use crate::grammar::symbol::Symbol;
use std::sync::Arc;

/// One vertex of a derivation tree. Nodes are owned exclusively by their
/// parent; `Clone` produces a fully independent deep copy, which is what the
/// genetic operators rely on when they mutate clones in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub symbol: Symbol,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Child-index path from the root to a node. An empty path is the root.
pub type NodePath = Vec<usize>;

/// A derivation tree over a shared, read-only grammar.
#[derive(Debug, Clone)]
pub struct DerivationTree {
    pub grammar: Arc<Grammar>,
    pub root: Node,
}

impl DerivationTree {
    pub fn new(grammar: Arc<Grammar>, root_symbol: Symbol) -> Self {
        Self {
            grammar,
            root: Node::new(root_symbol),
        }
    }

    /// Render the phenotype: the text of every leaf, left to right.
    ///
    /// A childless Nonterminal (ruleless, or left unexpanded when the budget
    /// ran out) contributes the empty string, so truncated trees never leak
    /// symbol names into the phenotype. Traversal uses an explicit stack so
    /// pathologically deep trees cannot overflow the call stack.
    pub fn phenotype(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                if node.symbol.is_terminal() {
                    out.push_str(&node.symbol.text);
                }
            } else {
                // Push children reversed so the leftmost is processed first
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Paths of all nodes with at least one child, in preorder. These are the
    /// legal mutation and crossover points.
    pub fn non_leaf_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        let mut stack: Vec<(&Node, NodePath)> = vec![(&self.root, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            if !node.is_leaf() {
                for (i, child) in node.children.iter().enumerate().rev() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    stack.push((child, child_path));
                }
                paths.push(path);
            }
        }
        paths
    }

    pub fn node_at(&self, path: &[usize]) -> &Node {
        let mut node = &self.root;
        for &i in path {
            node = &node.children[i];
        }
        node
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> &mut Node {
        let mut node = &mut self.root;
        for &i in path {
            node = &mut node.children[i];
        }
        node
    }

    /// Nonterminal leaves that still have a rule entry in the grammar, i.e.
    /// spots the generator would have expanded had the budget allowed it.
    /// Callers needing a fully terminal phenotype should check this is empty.
    pub fn unexpanded_nonterminals(&self) -> Vec<&Symbol> {
        let mut unexpanded = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                if node.symbol.is_nonterminal()
                    && self.grammar.alternatives(&node.symbol).is_some()
                {
                    unexpanded.push(&node.symbol);
                }
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        unexpanded
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Node {
        Node::new(Symbol::terminal(text))
    }

    fn tree_with_root(root: Node) -> DerivationTree {
        DerivationTree {
            grammar: Arc::new(Grammar::new()),
            root,
        }
    }

    #[test]
    fn phenotype_concatenates_leaves_left_to_right() {
        let mut root = Node::new(Symbol::nonterminal("S"));
        let mut mid = Node::new(Symbol::nonterminal("T"));
        mid.children = vec![leaf("b"), leaf("c")];
        root.children = vec![leaf("a"), mid, leaf("d")];
        assert_eq!(tree_with_root(root).phenotype(), "abcd");
    }

    #[test]
    fn childless_nonterminal_leaf_contributes_nothing() {
        let mut root = Node::new(Symbol::nonterminal("S"));
        root.children = vec![leaf("a"), Node::new(Symbol::nonterminal("T")), leaf("b")];
        assert_eq!(tree_with_root(root).phenotype(), "ab");
    }

    #[test]
    fn non_leaf_paths_in_preorder() {
        let mut inner = Node::new(Symbol::nonterminal("T"));
        inner.children = vec![leaf("b")];
        let mut root = Node::new(Symbol::nonterminal("S"));
        root.children = vec![leaf("a"), inner];
        let tree = tree_with_root(root);
        assert_eq!(tree.non_leaf_paths(), vec![vec![], vec![1]]);
        assert_eq!(tree.node_at(&[1]).symbol, Symbol::nonterminal("T"));
    }

    #[test]
    fn clone_is_deep() {
        let mut root = Node::new(Symbol::nonterminal("S"));
        root.children = vec![leaf("a")];
        let tree = tree_with_root(root);
        let mut copy = tree.clone();
        copy.node_at_mut(&[]).children.clear();
        assert_eq!(tree.phenotype(), "a");
        assert_eq!(copy.phenotype(), "");
    }
}
