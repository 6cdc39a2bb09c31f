use std::time::Duration;

use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState,
};
use diffsim_kinematics::{DriveParams, Pose2D};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Fixed-rate simulation loop settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub rate_hz: f64,
    /// Wall-clock run time in seconds, `0` runs forever.
    pub duration_s: f64,
    pub initial_pose: Pose2D,
}

impl SimSettings {
    /// Simulated time covered by one tick.
    pub fn dt(&self) -> f64 {
        1.0 / self.rate_hz
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.dt())
    }

    pub fn duration(&self) -> Option<Duration> {
        (self.duration_s > 0.0).then(|| Duration::from_secs_f64(self.duration_s))
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings {
            rate_hz: 100.0,
            duration_s: 0.0,
            initial_pose: Pose2D::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchdogSettings {
    pub timeout_ms: u64,
}

impl WatchdogSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        WatchdogSettings { timeout_ms: 250 }
    }
}

/// Circle-driving mission used as the default command producer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionSettings {
    pub speed: f64,
    pub radius: f64,
    pub command_rate_hz: f64,
}

impl Default for MissionSettings {
    fn default() -> Self {
        MissionSettings {
            speed: 1.0,
            radius: 10.0,
            command_rate_hz: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub drive: DriveParams,
    pub sim: SimSettings,
    pub watchdog: WatchdogSettings,
    pub mission: MissionSettings,
}

/// A rate must be finite and positive, and its period must be representable
/// as a non-zero `Duration`.
fn check_rate(name: &str, hz: f64) -> Result<(), ConfigError> {
    let period = (hz.is_finite() && hz > 0.0)
        .then(|| Duration::try_from_secs_f64(1.0 / hz).ok())
        .flatten();
    match period {
        Some(period) if !period.is_zero() => Ok(()),
        _ => Err(ConfigError::Message(format!(
            "{name} must be a finite positive rate with a non-zero period, got {hz}"
        ))),
    }
}

impl Settings {
    fn validate(self) -> Result<Self, ConfigError> {
        check_rate("sim.rate_hz", self.sim.rate_hz)?;
        check_rate("mission.command_rate_hz", self.mission.command_rate_hz)?;

        let duration_s = self.sim.duration_s;
        if Duration::try_from_secs_f64(duration_s).is_err() {
            return Err(ConfigError::Message(format!(
                "sim.duration_s must be a non-negative number of seconds, got {duration_s}"
            )));
        }
        Ok(self)
    }
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    builder
        .add_source(
            Environment::with_prefix("DIFFSIM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Settings>()?
        .validate()
}

/// Loads settings from `path`, falling back to built-in defaults for anything
/// the file (or the environment) does not set. A missing file is not an error.
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let builder = Config::builder().add_source(File::new(path, FileFormat::Toml).required(false));

    match finish(builder) {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
fn settings_from_str(toml: &str) -> Result<Settings, ConfigError> {
    finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}
