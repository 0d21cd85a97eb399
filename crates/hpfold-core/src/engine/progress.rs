use crate::core::scoring::BondScore;

/// What a fold run tells its observer.
///
/// A run opens with [`RunStart`](Progress::RunStart) and closes with
/// [`RunFinish`](Progress::RunFinish). In between, each batch of work is
/// announced by `StepsPlanned`, advanced by `StepsDone` and closed by
/// `StepsFinished`. A batch counts search iterations for a single search, or
/// finished restarts when several run side by side.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    RunStart {
        algorithm: &'static str,
        restarts: usize,
    },

    StepsPlanned { total: u64 },
    StepsDone { amount: u64 },
    StepsFinished,

    /// An annealing search gave up on its current fold and went back to its best.
    Reset { count: u64, best: BondScore },

    RunFinish { best: Option<BondScore> },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Hands progress events to an optional observer. A reporter without a
/// callback drops every event, which is what restarts running in parallel use.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        reporter.report(Progress::RunStart {
            algorithm: "greedy",
            restarts: 2,
        });
        reporter.report(Progress::StepsPlanned { total: 2 });
        reporter.report(Progress::RunFinish {
            best: Some(BondScore(-3)),
        });

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                Progress::RunStart {
                    algorithm: "greedy",
                    restarts: 2
                },
                Progress::StepsPlanned { total: 2 },
                Progress::RunFinish {
                    best: Some(BondScore(-3))
                },
            ]
        );
    }

    #[test]
    fn silent_reporter_drops_events() {
        ProgressReporter::new().report(Progress::StepsDone { amount: 1 });
    }
}
