use std::{fmt, ops::Not};

use thiserror::Error;

/// A boolean variable, identified by the positive integer id it carries in
/// the problem text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

/// The largest id a variable can have; one bit of the literal encoding is
/// reserved for the polarity.
pub const MAX_VAR_ID: u32 = u32::MAX >> 1;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("{0} is not a usable variable id (expected 1..={MAX_VAR_ID})")]
pub struct InvalidVarId(u32);

impl TryFrom<u32> for Var {
    type Error = InvalidVarId;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        if id == 0 || id > MAX_VAR_ID {
            Err(InvalidVarId(id))
        } else {
            Ok(Var(id))
        }
    }
}

impl Var {
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal is a signed boolean variable. The variable id and the polarity
/// are packed into a single code, with the polarity in the low bit, so that
/// derived equality, ordering and hashing are consistent with the
/// (variable, polarity) pair.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    #[inline]
    pub fn positive(var: Var) -> Lit {
        Lit(var.0 << 1 | 1)
    }

    #[inline]
    pub fn negative(var: Var) -> Lit {
        Lit(var.0 << 1)
    }

    pub fn new(var: Var, positive: bool) -> Lit {
        if positive {
            Lit::positive(var)
        } else {
            Lit::negative(var)
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 & 1 == 1
    }

    #[inline]
    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }
}

impl Not for Lit {
    type Output = Lit;

    /// Negation flips the polarity and nothing else.
    fn not(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.var().id())
        } else {
            write!(f, "-{}", self.var().id())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_construction_rejects_out_of_range_ids() {
        assert!(Var::try_from(1).is_ok());
        assert!(Var::try_from(MAX_VAR_ID).is_ok());

        assert_eq!(Err(InvalidVarId(0)), Var::try_from(0));
        assert_eq!(Err(InvalidVarId(MAX_VAR_ID + 1)), Var::try_from(MAX_VAR_ID + 1));
    }

    #[test]
    fn negation_flips_only_the_polarity() {
        let var = Var::try_from(7).unwrap();
        let lit = Lit::positive(var);

        assert_eq!(var, (!lit).var());
        assert!(!(!lit).is_positive());
        assert_eq!(lit, !!lit);
    }

    #[test]
    fn literals_are_equal_iff_var_and_polarity_match() {
        let x = Var::try_from(3).unwrap();
        let y = Var::try_from(4).unwrap();

        assert_eq!(Lit::new(x, true), Lit::positive(x));
        assert_ne!(Lit::positive(x), Lit::negative(x));
        assert_ne!(Lit::positive(x), Lit::positive(y));
    }
}
