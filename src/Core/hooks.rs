use crate::error::ArenaError;

/// Policy invoked when an arena operation is rejected.
///
/// Hooks observe the failure; they cannot veto it. After a hook returns the
/// operation reports the error to its caller and the arena is left exactly
/// as it was before the call.
pub trait FailureHooks: Send + Sync {
    /// Called when an operation would push usage past capacity.
    fn on_out_of_memory(&self, error: &ArenaError);

    /// Called for invalid or stale handles, a full table, or an empty dequeue.
    fn on_illegal_operation(&self, error: &ArenaError);
}

/// Default hooks: report the failure through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl FailureHooks for TracingHooks {
    fn on_out_of_memory(&self, error: &ArenaError) {
        tracing::warn!(%error, "Out of memory");
    }

    fn on_illegal_operation(&self, error: &ArenaError) {
        tracing::warn!(%error, "Illegal operation");
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl FailureHooks for NoopHooks {
    fn on_out_of_memory(&self, _error: &ArenaError) {}

    fn on_illegal_operation(&self, _error: &ArenaError) {}
}
