use std::time::{Duration, Instant};

/// Iteration and wall-clock limits for one search, checked once per loop iteration.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    max_iterations: Option<u64>,
    deadline: Option<Instant>,
    iterations: u64,
}

impl SearchBudget {
    pub fn new(max_iterations: Option<u64>, time_limit: Option<Duration>) -> Self {
        Self {
            max_iterations,
            deadline: time_limit.map(|limit| Instant::now() + limit),
            iterations: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Counts one iteration.
    #[inline]
    pub fn tick(&mut self) {
        self.iterations += 1;
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_iterations
            .is_some_and(|max| self.iterations >= max)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
