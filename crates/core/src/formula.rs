use std::{collections::HashMap, rc::Rc};

use crate::{
    clause::{Clause, Reduction},
    lit::{Lit, Var},
};

/// A stable index into the [`SearchTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Node {
    /// The clauses still active under the assignments on the path from the
    /// root to this node. Never mutated after construction, except to be
    /// dropped wholesale when the node is released.
    clauses: Vec<Rc<Clause>>,
    parent: Option<NodeId>,
    /// The literal fixed on the edge from the parent. Absent for the root.
    decision: Option<Lit>,
    depth: u32,
}

/// A persistent CNF snapshot tree. The root holds the parsed formula; every
/// other node is derived from its parent by fixing one literal. Nodes are
/// arena-allocated and addressed by index, so a child can never outlive or
/// dangle from its parent, and unaffected clauses are structurally shared
/// through [`Rc`].
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    /// Build the root from the parsed clauses. Tautological clauses are
    /// satisfied under every assignment and are dropped here.
    pub fn new(clauses: impl IntoIterator<Item = Clause>) -> SearchTree {
        let clauses = clauses
            .into_iter()
            .filter(|clause| !clause.is_tautology())
            .map(Rc::new)
            .collect();

        SearchTree {
            nodes: vec![Node {
                clauses,
                parent: None,
                decision: None,
                depth: 0,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Derive the node reached from `parent` by fixing `decision`: clauses
    /// that do not mention the variable are shared, satisfied clauses are
    /// dropped, and clauses containing the negation lose that literal. One
    /// emptied clause is enough to fail the branch, so processing stops at
    /// the first contradiction.
    pub fn child(&mut self, parent: NodeId, decision: Lit) -> NodeId {
        let parent_node = &self.nodes[parent.index()];
        let depth = parent_node.depth + 1;

        let mut clauses = Vec::with_capacity(parent_node.clauses.len());
        for clause in &parent_node.clauses {
            match clause.assign(decision) {
                Reduction::Satisfied => {}
                Reduction::Unaffected => clauses.push(Rc::clone(clause)),
                Reduction::Shrunk(rest) => {
                    if rest.is_empty() {
                        clauses.clear();
                        clauses.push(Rc::new(rest));
                        break;
                    }
                    clauses.push(Rc::new(rest));
                }
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            clauses,
            parent: Some(parent),
            decision: Some(decision),
            depth,
        });
        id
    }

    pub fn clauses(&self, node: NodeId) -> &[Rc<Clause>] {
        &self.nodes[node.index()].clauses
    }

    /// A node with no active clauses is satisfied.
    pub fn is_satisfied(&self, node: NodeId) -> bool {
        self.nodes[node.index()].clauses.is_empty()
    }

    /// A node with an empty active clause is a contradiction.
    pub fn is_contradiction(&self, node: NodeId) -> bool {
        self.nodes[node.index()]
            .clauses
            .iter()
            .any(|clause| clause.is_empty())
    }

    pub fn depth(&self, node: NodeId) -> u32 {
        self.nodes[node.index()].depth
    }

    /// The forced literal of the first unit clause, if any.
    pub fn unit_clause(&self, node: NodeId) -> Option<Lit> {
        self.nodes[node.index()]
            .clauses
            .iter()
            .find_map(|clause| clause.unit())
    }

    /// The decisions on the path from the root to `node`, oldest first.
    /// Costs O(depth); call it once search has terminated, not per branch
    /// step.
    pub fn assignments(&self, node: NodeId) -> Vec<(Var, bool)> {
        let mut path = Vec::with_capacity(self.depth(node) as usize);

        let mut current = &self.nodes[node.index()];
        while let (Some(parent), Some(decision)) = (current.parent, current.decision) {
            path.push((decision.var(), decision.is_positive()));
            current = &self.nodes[parent.index()];
        }

        path.reverse();
        path
    }

    /// [`Self::assignments`] folded into a map. Each variable is fixed at
    /// most once on a path, so no entry is ever overwritten.
    pub fn assignment_map(&self, node: NodeId) -> HashMap<Var, bool> {
        self.assignments(node).into_iter().collect()
    }

    /// Drop the clause storage of a failed chain, walking parents from
    /// `from` up to (but excluding) `stop`. The nodes stay addressable, but
    /// nothing reads a released node again: only dead-end nodes that no
    /// pending branch references are ever passed here.
    pub(crate) fn release_path(&mut self, from: NodeId, stop: Option<NodeId>) {
        let mut current = Some(from);
        while let Some(id) = current {
            if Some(id) == stop {
                break;
            }
            let node = &mut self.nodes[id.index()];
            node.clauses = Vec::new();
            current = node.parent;
        }
    }
}
