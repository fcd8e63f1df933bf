use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag, checked between views of a reconstruction.
///
/// Clones share the flag, so one can be handed to another thread and
/// cancelled from there.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed) }

    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}
