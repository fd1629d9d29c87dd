//! Walking the recipient list.

use std::time::Duration;

use tracing::{error, info};

use crate::cleanup;
use crate::composer;
use crate::navigator;
use crate::Device;

/// Knobs for one bulk run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Leave the composed text unsent in each conversation.
    pub draft_only: bool,
    /// Delete each conversation after a successful send.
    pub delete_after_send: bool,
    /// Pause between recipients. Skipped after the last one.
    pub message_delay: Duration,
}

/// Tally of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub attempted: usize,
    pub succeeded: usize,
}

impl RunStats {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.succeeded as f64 * 100.0 / self.attempted as f64
        }
    }
}

/// Send (or draft) `body` to every recipient, in order.
///
/// One recipient failing never aborts the run: the failure is logged,
/// navigation recovers toward the home screen, and the loop moves on. The
/// caller decides what the final tally means.
pub async fn run_bulk_send(
    device: &Device,
    recipients: &[String],
    body: &str,
    options: &RunOptions,
) -> RunStats {
    let mut stats = RunStats::default();
    let total = recipients.len();

    for (index, recipient) in recipients.iter().enumerate() {
        stats.attempted += 1;
        info!(recipient = %recipient, position = index + 1, total, "processing recipient");

        match composer::compose_and_send(device, recipient, body, options.draft_only).await {
            Ok(()) => {
                stats.succeeded += 1;
                navigator::return_to_home(device).await;
                if options.delete_after_send {
                    cleanup::delete_most_recent_conversation(device).await;
                }
                if index + 1 < total {
                    device.settle(options.message_delay).await;
                }
            }
            Err(err) => {
                error!(recipient = %recipient, error = %err, "giving up on recipient");
                navigator::return_to_home(device).await;
                device.settle(device.timing().failure_pause).await;
            }
        }
    }

    info!(
        succeeded = stats.succeeded,
        attempted = stats.attempted,
        "run finished"
    );
    stats
}
