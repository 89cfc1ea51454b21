use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use log::{log_enabled, trace, Level};

use crate::{
    brancher::Brancher,
    clause::Clause,
    formula::{NodeId, SearchTree},
    lit::{Lit, Var},
    termination::Terminator,
};

/// A chronological DPLL search over a persistent formula tree: unit
/// propagation, optional pure-literal elimination, and branch-and-backtrack
/// driven by the configured [`Brancher`].
pub struct Solver<SearchProc> {
    tree: SearchTree,
    brancher: SearchProc,
    pure_literals: bool,
}

pub enum SolveResult<'solver> {
    /// A solution has been found; the terminal node carries the assignment.
    Satisfiable(Solution<'solver>),
    /// No assignment satisfies the formula.
    Unsatisfiable,
    /// The terminator fired before a verdict was reached.
    Unknown,
}

/// A terminal satisfying node. The path back to the root stays alive inside
/// the solver's tree for as long as this value is held.
pub struct Solution<'tree> {
    tree: &'tree SearchTree,
    node: NodeId,
}

impl Solution<'_> {
    /// The branch decisions that led here, oldest first.
    pub fn assignments(&self) -> Vec<(Var, bool)> {
        self.tree.assignments(self.node)
    }

    pub fn assignment_map(&self) -> HashMap<Var, bool> {
        self.tree.assignment_map(self.node)
    }

    /// The value assigned to `var` on this path, if any. A variable can be
    /// absent when every clause mentioning it was satisfied some other way.
    pub fn value(&self, var: Var) -> Option<bool> {
        self.tree
            .assignments(self.node)
            .into_iter()
            .find_map(|(assigned, value)| (assigned == var).then_some(value))
    }
}

impl<SearchProc: Brancher> Solver<SearchProc> {
    pub fn new(clauses: impl IntoIterator<Item = Clause>, brancher: SearchProc) -> Self {
        Solver {
            tree: SearchTree::new(clauses),
            brancher,
            pure_literals: false,
        }
    }

    /// Also run pure-literal elimination after unit propagation. Off by
    /// default; plain unit propagation is usually the better trade.
    pub fn with_pure_literals(mut self, enabled: bool) -> Self {
        self.pure_literals = enabled;
        self
    }

    pub fn solve(&mut self, terminator: impl Terminator) -> SolveResult<'_> {
        // Branches still to explore, as (parent, decision) pairs. Pushing the
        // positive child after the negative one makes the stack pop the
        // false branch first.
        let mut pending: Vec<(NodeId, Lit)> = Vec::new();
        let mut next: Option<(NodeId, Option<NodeId>)> = Some((self.tree.root(), None));

        loop {
            if terminator.should_stop() {
                return SolveResult::Unknown;
            }

            let (node, backstop) = match next.take() {
                Some(frame) => frame,
                None => match pending.pop() {
                    Some((parent, decision)) => {
                        (self.tree.child(parent, decision), Some(parent))
                    }
                    None => return SolveResult::Unsatisfiable,
                },
            };

            let mut node = self.propagate(node);
            if self.pure_literals && !self.tree.is_contradiction(node) {
                node = self.eliminate_pure(node);
            }

            if self.tree.is_contradiction(node) {
                self.tree.release_path(node, backstop);
                continue;
            }

            if self.tree.is_satisfied(node) {
                return SolveResult::Satisfiable(Solution {
                    tree: &self.tree,
                    node,
                });
            }

            let var = self
                .brancher
                .next_decision(self.tree.clauses(node))
                .expect("an open formula has at least one literal to branch on");

            if log_enabled!(Level::Trace) {
                trace!(
                    "branching on {var:?} at depth {}, {} variables open",
                    self.tree.depth(node),
                    count_vars(self.tree.clauses(node)),
                );
            }

            pending.push((node, Lit::positive(var)));
            pending.push((node, Lit::negative(var)));
        }
    }

    /// While a unit clause exists, fix its literal. Stops at the first
    /// contradiction; the branch is already dead.
    fn propagate(&mut self, mut node: NodeId) -> NodeId {
        while !self.tree.is_contradiction(node) {
            let Some(forced) = self.tree.unit_clause(node) else {
                break;
            };
            node = self.tree.child(node, forced);
        }
        node
    }

    /// Repeatedly fix the first pure literal until none remains. Fixing a
    /// pure literal only ever removes whole clauses, so no contradiction can
    /// arise here.
    fn eliminate_pure(&mut self, mut node: NodeId) -> NodeId {
        while let Some(pure) = find_pure(self.tree.clauses(node)) {
            node = self.tree.child(node, pure);
        }
        node
    }
}

/// The first literal (in first-encounter order) whose negation occurs in no
/// clause.
fn find_pure(clauses: &[Rc<Clause>]) -> Option<Lit> {
    let mut order = Vec::new();
    let mut polarities: HashMap<Var, (bool, bool)> = HashMap::new();

    for clause in clauses {
        for lit in clause.lits() {
            let entry = polarities.entry(lit.var()).or_insert_with(|| {
                order.push(lit.var());
                (false, false)
            });
            if lit.is_positive() {
                entry.1 = true;
            } else {
                entry.0 = true;
            }
        }
    }

    order.into_iter().find_map(|var| match polarities[&var] {
        (false, true) => Some(Lit::positive(var)),
        (true, false) => Some(Lit::negative(var)),
        _ => None,
    })
}

fn count_vars(clauses: &[Rc<Clause>]) -> usize {
    clauses
        .iter()
        .flat_map(|clause| clause.lits())
        .map(Lit::var)
        .collect::<HashSet<_>>()
        .len()
}
