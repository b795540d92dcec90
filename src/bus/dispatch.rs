//! Subscriber dispatch utilities.
//!
//! Provides the fan-out loop shared by topic publishes and explicit
//! subscriber-list publishes.

use tracing::error;

use super::{FaultPolicy, Result, SubscriberEntry};
use crate::notification::Notification;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Subscribers whose callback returned `Ok`.
    pub delivered: usize,
    /// Subscribers whose callback failed (only non-zero under `Isolate`).
    pub failed: usize,
}

impl DispatchReport {
    /// Returns true if every subscriber succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of subscribers that were invoked.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Dispatch a notification to each entry in order.
///
/// Under `FaultPolicy::Propagate` the first failure returns immediately and
/// later entries are not invoked. Under `FaultPolicy::Isolate` failures are
/// logged and counted, and every entry is invoked.
pub fn dispatch_to_subscribers(
    topic: &str,
    subscribers: &[SubscriberEntry],
    notification: &Notification,
    policy: FaultPolicy,
) -> Result<DispatchReport> {
    let mut report = DispatchReport::default();

    for entry in subscribers {
        match entry.notify(notification) {
            Ok(()) => report.delivered += 1,
            Err(e) => match policy {
                FaultPolicy::Propagate => return Err(e),
                FaultPolicy::Isolate => {
                    error!(
                        topic = %topic,
                        subscriber = %entry.id(),
                        error = %e,
                        "Subscriber failed"
                    );
                    report.failed += 1;
                }
            },
        }
    }

    Ok(report)
}
