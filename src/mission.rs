use std::{sync::Arc, time::Duration};

use diffsim_kinematics::{DriveCommand, Pose2D};
use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, info, warn};

use crate::bus::{ControlMsg, Topic};
use crate::config::MissionSettings;

/// Command that keeps the robot on a circle of the configured radius.
/// A non-positive or infinite radius drives straight.
fn compute_command(mission: &MissionSettings) -> DriveCommand {
    let curvature = if mission.radius.is_finite() && mission.radius > 0.0 {
        1.0 / mission.radius
    } else {
        0.0
    };
    DriveCommand::Curvature {
        linear: mission.speed,
        curvature,
    }
}

/// Periodically re-sends the circle command and follows the published poses.
pub async fn circle_task(
    mission: MissionSettings,
    pose_rx: &mut broadcast::Receiver<Arc<Pose2D>>,
    control: Topic<ControlMsg>,
) -> anyhow::Result<()> {
    let command = compute_command(&mission);
    info!(?command, "Circle mission started.");

    let mut ticker = time::interval(Duration::from_secs_f64(1.0 / mission.command_rate_hz));
    let report_every = mission.command_rate_hz.ceil().max(1.0) as u64;
    let mut ticks: u64 = 0;
    let mut current_pose = Pose2D::default();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                control.publish(ControlMsg::Drive(command));
                ticks += 1;
                if ticks % report_every == 0 {
                    info!(pose = %current_pose.normalized(), "Mission progress");
                }
            }
            result = pose_rx.recv() => {
                match result {
                    Ok(pose) => {
                        current_pose = *pose;
                        debug!(%current_pose, "New pose received in circle_task");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // the control loop publishes much faster than we need
                        debug!("Pose receiver lagged by {} messages.", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!("Pose channel closed, ending mission.");
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_command() {
        let mission = MissionSettings {
            speed: 1.0,
            radius: 10.0,
            command_rate_hz: 10.0,
        };
        assert_eq!(
            compute_command(&mission),
            DriveCommand::Curvature {
                linear: 1.0,
                curvature: 0.1,
            }
        );

        let straight = MissionSettings {
            radius: 0.0,
            ..mission.clone()
        };
        assert_eq!(
            compute_command(&straight),
            DriveCommand::Curvature {
                linear: 1.0,
                curvature: 0.0,
            }
        );

        let unbounded = MissionSettings {
            radius: f64::INFINITY,
            ..mission
        };
        assert_eq!(
            compute_command(&unbounded),
            DriveCommand::Curvature {
                linear: 1.0,
                curvature: 0.0,
            }
        );
    }

    #[tokio::test]
    async fn test_circle_task_publishes_and_ends_on_close() {
        let mission = MissionSettings {
            speed: 0.5,
            radius: 2.0,
            command_rate_hz: 100.0,
        };
        let control: Topic<ControlMsg> = Topic::new("control", 16);
        let mut control_rx = control.subscribe();
        let poses: Topic<Pose2D> = Topic::new("pose", 4);
        let mut pose_rx = poses.subscribe();

        let task = tokio::spawn(async move { circle_task(mission, &mut pose_rx, control).await });

        let msg = control_rx.recv().await.unwrap();
        assert_eq!(
            *msg,
            ControlMsg::Drive(DriveCommand::Curvature {
                linear: 0.5,
                curvature: 0.5,
            })
        );

        poses.publish(Pose2D::new(1.0, 0.0, 0.0));
        drop(poses);
        assert!(task.await.unwrap().is_ok());
    }
}
