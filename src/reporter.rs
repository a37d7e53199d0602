//! Observability for tracking runs
//!
//! Progress is a side channel to an external observer and is not
//! load-bearing for correctness. The default [`NoOpReporter`] compiles to
//! nothing.

/// Receives progress callbacks during a tracking run
pub trait ProgressReporter {
    /// Monotonically increasing fraction in `[0, 1]`
    fn progress(&mut self, _fraction: f64) {}

    /// Free-form status message
    fn status(&mut self, _message: &str) {}
}

/// Reporter that ignores every callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl ProgressReporter for NoOpReporter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        fractions: Vec<f64>,
    }

    impl ProgressReporter for Recorder {
        fn progress(&mut self, fraction: f64) {
            self.fractions.push(fraction);
        }
    }

    #[test]
    fn test_custom_reporter_receives_progress() {
        let mut recorder = Recorder::default();
        recorder.progress(0.5);
        recorder.progress(1.0);
        assert_eq!(recorder.fractions, vec![0.5, 1.0]);
    }
}
