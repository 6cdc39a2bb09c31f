mod blackboard; // shared state snapshot
mod bus; // broadcast topics and control messages
mod config; // settings from config/default.toml and the environment
mod control; // fixed-rate simulation thread
mod mission; // circle-driving command producer
mod watchdog; // command timeout supervision

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Context;
use diffsim_kinematics::{DifferentialDriveKinematics, Pose2D};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use blackboard::{Blackboard, snapshot};
use bus::{ControlMsg, Topic};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("diffsim starting.");

    let settings = config::load_settings(config::DEFAULT_CONFIG_PATH)
        .context("failed to load configuration")?;
    let model = DifferentialDriveKinematics::from_params(&settings.drive)
        .context("invalid drive parameters")?;
    info!(%model, wheel_base = model.wheel_base(), "Drive model ready.");

    let bb: Blackboard = Arc::default();
    let control_topic: Topic<ControlMsg> = Topic::new("control", 64);
    let pose_topic: Topic<Pose2D> = Topic::new("pose", 16);
    let mut pose_rx = pose_topic.subscribe();
    let running = Arc::new(AtomicBool::new(true));

    info!("Spawning control thread...");
    let control_handle = control::spawn(
        model,
        &settings.sim,
        &control_topic,
        pose_topic,
        bb.clone(),
        running.clone(),
    )?;

    control_topic.publish(ControlMsg::Relocalize(settings.sim.initial_pose));

    let tasks = async {
        tokio::try_join!(
            mission::circle_task(
                settings.mission.clone(),
                &mut pose_rx,
                control_topic.clone(),
            ),
            watchdog::watchdog(
                bb.clone(),
                control_topic.clone(),
                settings.watchdog.timeout(),
                running.clone(),
            ),
        )
        .map(|_| ())
    };

    let outcome = match settings.sim.duration() {
        Some(duration) => match tokio::time::timeout(duration, tasks).await {
            Ok(result) => result,
            Err(_) => {
                info!(?duration, "Run time elapsed.");
                Ok(())
            }
        },
        None => tasks.await,
    };

    running.store(false, Ordering::Relaxed);
    match control_handle.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("control thread panicked"),
    }
    outcome?;

    let state = snapshot(&bb);
    if !state.faults.is_empty() {
        warn!(faults = ?state.faults, "Finished with active faults.");
    }
    info!(
        pose = %state.pose,
        wheels = %state.wheel_speeds,
        curvature = state.curvature,
        odometer = state.odometer,
        sim_time = state.sim_time,
        "Simulation finished."
    );
    Ok(())
}
