use std::{collections::HashMap, rc::Rc};

use crate::{
    clause::Clause,
    lit::{Lit, Var},
};

/// Picks the next branching variable among those still occurring in the
/// active clauses. Implementations must be deterministic: ties are broken by
/// the order in which variables are first encountered when scanning the
/// clauses front to back.
pub trait Brancher {
    fn next_decision(&mut self, clauses: &[Rc<Clause>]) -> Option<Var>;
}

/// The variables of `clauses` in first-encounter order.
fn occurring_vars(clauses: &[Rc<Clause>]) -> Vec<Var> {
    let mut order = Vec::new();
    let mut seen = HashMap::new();

    for clause in clauses {
        for lit in clause.lits() {
            seen.entry(lit.var()).or_insert_with(|| order.push(lit.var()));
        }
    }

    order
}

/// Occurrence-weighted selection, the default. Among the clauses of minimum
/// current length, count how often each variable occurs negatively (n) and
/// positively (p); the score `(1 << 16) * (n + p) + n * p` favors variables
/// that show up often in the most constrained clauses with balanced
/// polarities, so propagation is strong whichever way the branch goes.
#[derive(Default)]
pub struct OccurrenceBrancher;

impl Brancher for OccurrenceBrancher {
    fn next_decision(&mut self, clauses: &[Rc<Clause>]) -> Option<Var> {
        let min_len = clauses
            .iter()
            .filter(|clause| !clause.is_empty())
            .map(|clause| clause.len())
            .min()?;

        let mut occurrences: HashMap<Lit, u64> = HashMap::new();
        for clause in clauses.iter().filter(|clause| clause.len() == min_len) {
            for lit in clause.lits() {
                *occurrences.entry(lit).or_insert(0) += 1;
            }
        }

        let score = |var: Var| {
            let n = occurrences.get(&Lit::negative(var)).copied().unwrap_or(0);
            let p = occurrences.get(&Lit::positive(var)).copied().unwrap_or(0);
            ((n + p) << 16) + n * p
        };

        let mut best: Option<(Var, u64)> = None;
        for var in occurring_vars(clauses) {
            let candidate = score(var);
            if best.map_or(true, |(_, best_score)| candidate > best_score) {
                best = Some((var, candidate));
            }
        }

        best.map(|(var, _)| var)
    }
}

/// History-sensitive selection. The score table persists for the lifetime of
/// the brancher, which the solver owns, so one top-level search accumulates
/// activity without leaking it into independent runs.
#[derive(Default)]
pub struct ActivityBrancher {
    scores: HashMap<Var, u64>,
}

impl Brancher for ActivityBrancher {
    fn next_decision(&mut self, clauses: &[Rc<Clause>]) -> Option<Var> {
        let candidates = occurring_vars(clauses);

        let mut best: Option<(Var, u64)> = None;
        for &var in &candidates {
            if let Some(&score) = self.scores.get(&var) {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((var, score));
                }
            }
        }

        if let Some((var, score)) = best {
            self.scores.insert(var, score + 1);
            return Some(var);
        }

        // Nothing in the current formula has been scored yet: seed the
        // variable occurring in the most clauses.
        let mut clause_counts: HashMap<Var, u64> = HashMap::new();
        for clause in clauses {
            for var in clause.lits().map(Lit::var) {
                *clause_counts.entry(var).or_insert(0) += 1;
            }
        }

        let mut most: Option<(Var, u64)> = None;
        for var in candidates {
            let count = clause_counts.get(&var).copied().unwrap_or(0);
            if most.map_or(true, |(_, best_count)| count > best_count) {
                most = Some((var, count));
            }
        }

        most.map(|(var, _)| {
            self.scores.insert(var, 0);
            var
        })
    }
}

/// The baseline: the variable of the first literal of the first remaining
/// clause.
#[derive(Default)]
pub struct FirstLitBrancher;

impl Brancher for FirstLitBrancher {
    fn next_decision(&mut self, clauses: &[Rc<Clause>]) -> Option<Var> {
        clauses
            .first()
            .and_then(|clause| clause.lits().next())
            .map(Lit::var)
    }
}
