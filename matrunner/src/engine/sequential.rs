// Sequential Engine
// Invokes the target once per argument set on the calling thread

use crate::engine::events::{DispatchEvent, EventSender, ProgressSender};
use crate::engine::{pair_argument_lists, Args, Engine, Target};
use crate::matrix::{Combination, Value};
use crate::MatrixError;

use std::time::Instant;

/// Engine running every invocation in order, stopping at the first failure
pub struct SequentialEngine<R, E> {
    target: Target<R, E>,
    progress: Option<ProgressSender>,
}

impl<R, E> SequentialEngine<R, E> {
    pub fn new(target: Target<R, E>) -> Self {
        Self {
            target,
            progress: None,
        }
    }

    /// Report dispatch progress on the given channel
    pub fn with_progress(mut self, progress: Option<ProgressSender>) -> Self {
        self.progress = progress;
        self
    }

    pub fn target(&self) -> &Target<R, E> {
        &self.target
    }
}

impl<R, E> Engine<R, E> for SequentialEngine<R, E>
where
    E: From<MatrixError>,
{
    fn name(&self) -> &str {
        self.target.name()
    }

    fn call(&self, args: &[Value], kwargs: &Combination) -> Result<R, E> {
        self.target.call(args, kwargs)
    }

    fn run(
        &self,
        args_list: Option<Vec<Args>>,
        kwargs_list: Option<Vec<Combination>>,
    ) -> Result<Vec<R>, E> {
        let calls = pair_argument_lists(args_list, kwargs_list)?;
        let total = calls.len();
        let run_start = Instant::now();

        tracing::debug!(target_fn = self.name(), total, "dispatching combinations");
        self.progress
            .send_event(DispatchEvent::run_started(self.name(), total));

        let mut results = Vec::with_capacity(total);
        for (index, (args, kwargs)) in calls.iter().enumerate() {
            self.progress
                .send_event(DispatchEvent::combination_started(index, kwargs));
            tracing::trace!(target_fn = self.name(), index, "invoking target");

            let start = Instant::now();
            let outcome = self.target.call(args, kwargs);
            self.progress.send_event(DispatchEvent::combination_finished(
                index,
                outcome.is_ok(),
                start.elapsed(),
            ));

            match outcome {
                Ok(result) => results.push(result),
                Err(err) => {
                    tracing::warn!(
                        target_fn = self.name(),
                        index,
                        remaining = total - index - 1,
                        "target failed, aborting dispatch"
                    );
                    self.progress.send_event(DispatchEvent::run_completed(
                        self.name(),
                        results.len(),
                        false,
                        run_start.elapsed(),
                    ));
                    return Err(err);
                }
            }
        }

        self.progress.send_event(DispatchEvent::run_completed(
            self.name(),
            results.len(),
            true,
            run_start.elapsed(),
        ));
        Ok(results)
    }
}
