use std::time::{Duration, Instant};

/// Polled at the top of every branch step; when it reports true the search
/// stops and the solver returns an inconclusive result.
pub trait Terminator {
    fn should_stop(&self) -> bool;
}

/// Stops the search once a deadline has passed.
pub struct TimeBudget {
    deadline: Option<Instant>,
}

impl TimeBudget {
    /// A budget of `duration`, counted from now.
    pub fn within(duration: Duration) -> TimeBudget {
        TimeBudget {
            deadline: Some(Instant::now() + duration),
        }
    }

    /// No deadline; the search runs until it reaches a verdict.
    pub fn unbounded() -> TimeBudget {
        TimeBudget { deadline: None }
    }
}

impl Terminator for TimeBudget {
    fn should_stop(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() > deadline,
            None => false,
        }
    }
}
