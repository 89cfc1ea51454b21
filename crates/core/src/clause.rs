use crate::lit::{Lit, Var};

/// A disjunction of literals, stored sorted and without duplicates so that
/// equality and hashing depend on content only, never on insertion order.
///
/// A clause may contain a variable with both polarities. Such a clause is a
/// tautology; [`crate::formula::SearchTree`] treats it as always satisfied
/// and never carries it into the root formula.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Clause {
    lits: Vec<Lit>,
}

/// The effect an assignment has on a single clause, per the child-formula
/// simplification rule.
pub enum Reduction {
    /// The clause does not mention the assigned variable.
    Unaffected,
    /// The clause contains the assigned literal itself.
    Satisfied,
    /// The clause contained the negation of the assigned literal; the copy
    /// has that literal stripped and may be empty.
    Shrunk(Clause),
}

impl Clause {
    pub fn new() -> Clause {
        Clause::default()
    }

    pub fn from_lits(lits: impl IntoIterator<Item = Lit>) -> Clause {
        let mut clause = Clause::new();
        for lit in lits {
            clause.insert(lit);
        }
        clause
    }

    /// Insert a literal. Inserting a literal that is already present is a
    /// no-op; inserting the negation of a present literal keeps both, turning
    /// the clause into a tautology.
    pub fn insert(&mut self, lit: Lit) {
        if let Err(idx) = self.lits.binary_search(&lit) {
            self.lits.insert(idx, lit);
        }
    }

    pub fn contains(&self, lit: Lit) -> bool {
        self.lits.binary_search(&lit).is_ok()
    }

    /// Membership test that ignores polarity.
    pub fn contains_var(&self, var: Var) -> bool {
        self.contains(Lit::negative(var)) || self.contains(Lit::positive(var))
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// An empty clause denotes a contradiction.
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// The forced literal of a unit clause.
    pub fn unit(&self) -> Option<Lit> {
        match self.lits[..] {
            [lit] => Some(lit),
            _ => None,
        }
    }

    /// Whether some variable occurs with both polarities.
    pub fn is_tautology(&self) -> bool {
        self.lits.windows(2).any(|pair| pair[0].var() == pair[1].var())
    }

    pub fn lits(&self) -> impl ExactSizeIterator<Item = Lit> + '_ {
        self.lits.iter().copied()
    }

    /// Reduce this clause under the given assignment. A clause mentioning the
    /// variable with the same polarity is satisfied; one mentioning it with
    /// the opposite polarity loses that literal.
    pub fn assign(&self, lit: Lit) -> Reduction {
        if self.contains(lit) {
            return Reduction::Satisfied;
        }

        match self.lits.binary_search(&!lit) {
            Ok(idx) => {
                let mut lits = self.lits.clone();
                lits.remove(idx);
                Reduction::Shrunk(Clause { lits })
            }
            Err(_) => Reduction::Unaffected,
        }
    }
}
