use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;

use anyhow::Context;
use diffsim_kinematics::{DifferentialDriveKinematics, DriveModel, Pose2D};
use spin_sleep::SpinSleeper;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use crate::blackboard::{Blackboard, touch_cmd};
use crate::bus::{ControlMsg, Topic};
use crate::config::SimSettings;

/// Fixed-step simulation loop. Owns the drive model; everything else reaches
/// it through the control topic, so the model never needs a lock.
pub struct ControlLoop {
    model: DifferentialDriveKinematics,
    dt: f64,
    control_rx: broadcast::Receiver<Arc<ControlMsg>>,
    pose_topic: Topic<Pose2D>,
    bb: Blackboard,
    ticks: u64,
}

impl ControlLoop {
    pub fn new(
        model: DifferentialDriveKinematics,
        dt: f64,
        control_rx: broadcast::Receiver<Arc<ControlMsg>>,
        pose_topic: Topic<Pose2D>,
        bb: Blackboard,
    ) -> Self {
        Self {
            model,
            dt,
            control_rx,
            pose_topic,
            bb,
            ticks: 0,
        }
    }

    fn handle(&mut self, msg: ControlMsg) {
        match msg {
            ControlMsg::Drive(cmd) => {
                cmd.apply(&mut self.model);
                touch_cmd(&self.bb);
            }
            ControlMsg::EmergencyStop => {
                self.model.command_wheel_speeds(0.0, 0.0);
            }
            ControlMsg::Relocalize(pose) => {
                info!(%pose, "Relocalizing");
                self.model.set_pose(pose.x, pose.y, pose.theta);
            }
        }
    }

    /// Drains pending control messages, advances the model by one step and
    /// publishes the result.
    pub fn tick(&mut self) -> anyhow::Result<()> {
        loop {
            match self.control_rx.try_recv() {
                Ok(msg) => self.handle(*msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(n)) => {
                    warn!("Control receiver lagged by {} messages.", n);
                }
                Err(TryRecvError::Closed) => {
                    anyhow::bail!("control channel closed");
                }
            }
        }

        DriveModel::step(&mut self.model, self.dt)
            .with_context(|| format!("simulation step {} failed", self.ticks + 1))?;
        self.ticks += 1;

        let pose = self.model.get_pose();
        let increments = self.model.take_wheel_increments();
        {
            let mut state = self.bb.write();
            state.pose = pose;
            state.wheel_speeds = self.model.wheel_speeds();
            state.curvature = self.model.curvature();
            state.odometer += ((increments.left + increments.right) / 2.0).abs();
            state.sim_time = self.model.elapsed_time();
        }

        self.pose_topic.publish(pose);
        debug!(tick = self.ticks, %pose, "Published pose");
        Ok(())
    }

    /// Runs `tick` at `period` until `running` is cleared. A failed tick
    /// clears `running` itself so the async tasks wind down too.
    pub fn run(
        mut self,
        period: std::time::Duration,
        running: Arc<AtomicBool>,
    ) -> anyhow::Result<()> {
        info!(dt = self.dt, "Control loop started.");
        let sleeper = SpinSleeper::default();
        while running.load(Ordering::Relaxed) {
            if let Err(e) = self.tick() {
                error!("Control loop stopped: {:#}", e);
                running.store(false, Ordering::Relaxed);
                return Err(e);
            }
            sleeper.sleep(period);
        }
        info!(ticks = self.ticks, pose = %self.model.get_pose(), "Control loop finished.");
        Ok(())
    }
}

/// Starts the control loop on its own thread.
pub fn spawn(
    model: DifferentialDriveKinematics,
    sim: &SimSettings,
    control_topic: &Topic<ControlMsg>,
    pose_topic: Topic<Pose2D>,
    bb: Blackboard,
    running: Arc<AtomicBool>,
) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
    let control_loop = ControlLoop::new(
        model,
        sim.dt(),
        control_topic.subscribe(),
        pose_topic,
        bb,
    );
    let period = sim.period();
    let handle = std::thread::Builder::new()
        .name("control".into())
        .spawn(move || control_loop.run(period, running))?;
    Ok(handle)
}
