use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

use diffsim_kinematics::{DriveCommand, Pose2D};

/// Messages consumed by the control loop, the only owner of the drive model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMsg {
    /// Motion command from a producer. Refreshes the command watchdog.
    Drive(DriveCommand),
    /// Stop issued by the watchdog. Does not count as a fresh command.
    EmergencyStop,
    /// Discrete pose override from an external localization source.
    Relocalize(Pose2D),
}

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across threads.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    name: &'static str,
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { name, tx }
    }

    /// Publishes to all current subscribers and returns how many there were.
    pub fn publish(&self, msg: T) -> usize {
        match self.tx.send(Arc::new(msg)) {
            Ok(n) => n,
            Err(_) => {
                trace!(topic = self.name, "published without subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_subscribers() {
        let topic: Topic<ControlMsg> = Topic::new("control", 4);
        assert_eq!(topic.publish(ControlMsg::EmergencyStop), 0);

        let mut rx = topic.subscribe();
        assert_eq!(topic.publish(ControlMsg::Drive(DriveCommand::Stop)), 1);
        assert_eq!(*rx.try_recv().unwrap(), ControlMsg::Drive(DriveCommand::Stop));
        assert!(rx.try_recv().is_err());
    }
}
