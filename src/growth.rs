use core::fmt;
use std::time::Duration;

/// Description of a single reallocation of the queue buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthEvent {
    /// Buffer size before the reallocation
    pub previous_capacity: usize,
    /// Buffer size after the reallocation
    pub capacity: usize,
    /// Wall clock time spent allocating and migrating the old contents
    pub elapsed: Duration,
    /// The old layout was wrapped and had to be relinearized
    pub wrapped: bool,
}

pub(crate) struct GrowthObserver(Box<dyn FnMut(&GrowthEvent) + Send>);

impl GrowthObserver {
    pub(crate) fn new<F>(callback: F) -> Self
    where
        F: FnMut(&GrowthEvent) + Send + 'static,
    {
        Self(Box::new(callback))
    }

    pub(crate) fn notify(&mut self, event: &GrowthEvent) {
        (self.0)(event);
    }
}

impl fmt::Debug for GrowthObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GrowthObserver")
    }
}

/// Emits the growth event to the log. Verbose queues log at `info`,
/// the rest at `trace`.
pub(crate) fn log_growth(event: &GrowthEvent, verbose: bool) {
    if verbose {
        tracing::info!(
            elapsed = ?event.elapsed,
            previous_capacity = event.previous_capacity,
            capacity = event.capacity,
            wrapped = event.wrapped,
            "Allocated new queue"
        );
    } else {
        tracing::trace!(
            previous_capacity = event.previous_capacity,
            capacity = event.capacity,
            "Allocated new queue"
        );
    }
}
