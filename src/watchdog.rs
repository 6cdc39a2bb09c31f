use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::blackboard::{Blackboard, clear_fault, raise_fault, snapshot};
use crate::bus::{ControlMsg, Topic};

pub const CMD_TIMEOUT_FAULT: &str = "cmd timeout";

/// Tracks whether the robot has already been stopped for the current outage,
/// so the stop is sent once rather than every tick.
#[derive(Debug, Default)]
pub struct CommandWatchdog {
    tripped: bool,
}

impl CommandWatchdog {
    /// Returns `true` if a stop must be issued now.
    pub fn check(&mut self, bb: &Blackboard, timeout: Duration, now: Instant) -> bool {
        let last_cmd_ts = snapshot(bb).last_cmd_ts;
        let age = now.saturating_duration_since(last_cmd_ts);

        if age > timeout {
            if !self.tripped {
                self.tripped = true;
                warn!(?age, "Command velocity timeout! Stopping the robot.");
                raise_fault(bb, CMD_TIMEOUT_FAULT);
                return true;
            }
        } else if self.tripped {
            self.tripped = false;
            if clear_fault(bb, CMD_TIMEOUT_FAULT) {
                info!("Commands resumed, timeout fault cleared.");
            }
        }
        false
    }
}

/// Stops the robot when commands go stale. Returns once `running` is
/// cleared, e.g. because the control loop exited.
pub async fn watchdog(
    bb: Blackboard,
    control: Topic<ControlMsg>,
    timeout: Duration,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    info!(?timeout, "Watchdog task started.");
    let mut tick = tokio::time::interval(Duration::from_millis(25));
    let mut dog = CommandWatchdog::default();
    while running.load(Ordering::Relaxed) {
        tick.tick().await;
        if dog.check(&bb, timeout, Instant::now()) {
            control.publish(ControlMsg::EmergencyStop);
        }
    }
    info!("Watchdog task finished.");
    Ok(())
}
