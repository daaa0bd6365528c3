//! Fault reporting side channel.

use crate::db::StorageError;

/// Receives faults swallowed at the engine boundary.
///
/// Implementations must not panic; the return value is ignored.
pub trait FaultLogger: Send + Sync {
    fn log_error(&self, operation: &'static str, fault: &StorageError);
}

/// Reports faults as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl FaultLogger for TracingLogger {
    fn log_error(&self, operation: &'static str, fault: &StorageError) {
        tracing::error!(operation, error = %fault, "storage fault");
    }
}
