use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use diffsim_kinematics::{Pose2D, WheelSpeeds};

/// Latest simulation state, shared between the control thread and async tasks.
#[derive(Debug, Clone)]
pub struct State {
    pub pose: Pose2D,
    pub wheel_speeds: WheelSpeeds,
    pub curvature: f64,
    /// Path length driven by the chassis center (m).
    pub odometer: f64,
    pub sim_time: f64,
    pub last_cmd_ts: Instant,
    pub faults: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            pose: Pose2D::default(),
            wheel_speeds: WheelSpeeds::default(),
            curvature: 0.0,
            odometer: 0.0,
            sim_time: 0.0,
            last_cmd_ts: Instant::now(),
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn touch_cmd(bb: &Blackboard) {
    bb.write().last_cmd_ts = Instant::now();
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}

pub fn clear_fault(bb: &Blackboard, msg: &str) -> bool {
    let mut g = bb.write();
    let before = g.faults.len();
    g.faults.retain(|s| s != msg);
    g.faults.len() != before
}
