//! Configuration for Sarathi
//!
//! The compiled-in defaults describe the competition robot. A TOML file may
//! override any section once at startup; after [`Robot::new`](crate::Robot::new)
//! consumes the configuration it is never consulted for reconfiguration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SarathiConfig {
    #[serde(default)]
    pub capabilities: CapabilityConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub mechanisms: MechanismConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default, rename = "match")]
    pub match_timeline: MatchConfig,
}

/// Feature switches gating which subsystems, commands and bindings exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Drive,
    Vision,
    Shooter,
    ColorSpinner,
    Climber,
}

impl Capability {
    /// All capabilities in construction order
    pub const ALL: [Capability; 5] = [
        Capability::Drive,
        Capability::Vision,
        Capability::Shooter,
        Capability::ColorSpinner,
        Capability::Climber,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::Drive => "drive",
            Capability::Vision => "vision",
            Capability::Shooter => "shooter",
            Capability::ColorSpinner => "color_spinner",
            Capability::Climber => "climber",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability flags, one per subsystem family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CapabilityConfig {
    #[serde(default = "default_enabled")]
    pub drive: bool,
    #[serde(default = "default_enabled")]
    pub vision: bool,
    #[serde(default = "default_enabled")]
    pub shooter: bool,
    #[serde(default = "default_enabled")]
    pub color_spinner: bool,
    #[serde(default = "default_enabled")]
    pub climber: bool,
}

impl CapabilityConfig {
    /// Every capability switched on
    pub fn all() -> Self {
        Self {
            drive: true,
            vision: true,
            shooter: true,
            color_spinner: true,
            climber: true,
        }
    }

    /// Every capability switched off
    pub fn none() -> Self {
        Self {
            drive: false,
            vision: false,
            shooter: false,
            color_spinner: false,
            climber: false,
        }
    }

    /// Returns a copy with one flag changed. Only meaningful before the
    /// robot is built.
    pub fn with(mut self, capability: Capability, enabled: bool) -> Self {
        match capability {
            Capability::Drive => self.drive = enabled,
            Capability::Vision => self.vision = enabled,
            Capability::Shooter => self.shooter = enabled,
            Capability::ColorSpinner => self.color_spinner = enabled,
            Capability::Climber => self.climber = enabled,
        }
        self
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Drive => self.drive,
            Capability::Vision => self.vision,
            Capability::Shooter => self.shooter,
            Capability::ColorSpinner => self.color_spinner,
            Capability::Climber => self.climber,
        }
    }

    /// Enabled capabilities in construction order
    pub fn enabled(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.is_enabled(*capability))
    }
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self::all()
    }
}

/// Physical constants used by the distance estimator.
///
/// Heights share one linear unit (inches on the competition robot), the
/// mount angle is in degrees above horizontal.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeometricConstants {
    #[serde(default = "default_target_height")]
    pub target_height: f64,
    #[serde(default = "default_camera_height")]
    pub camera_height: f64,
    #[serde(default = "default_camera_mount_angle")]
    pub camera_mount_angle: f64,
}

impl Default for GeometricConstants {
    fn default() -> Self {
        Self {
            target_height: default_target_height(),
            camera_height: default_camera_height(),
            camera_mount_angle: default_camera_mount_angle(),
        }
    }
}

/// Vision processor table layout and target geometry
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VisionConfig {
    /// Telemetry table the vision processor publishes into
    #[serde(default = "default_vision_table")]
    pub table: String,

    #[serde(default = "default_horizontal_key")]
    pub horizontal_key: String,
    #[serde(default = "default_vertical_key")]
    pub vertical_key: String,
    #[serde(default = "default_visible_key")]
    pub visible_key: String,

    /// Illumination mode key (0 = on, 1 = off)
    #[serde(default = "default_led_mode_key")]
    pub led_mode_key: String,

    /// Camera mode key (0 = vision processing, 1 = passthrough)
    #[serde(default = "default_camera_mode_key")]
    pub camera_mode_key: String,

    /// Table receiving the raw offsets for the operator dashboard
    #[serde(default = "default_dashboard_table")]
    pub dashboard_table: String,

    #[serde(default)]
    pub geometry: GeometricConstants,

    #[serde(default)]
    pub align: AlignConfig,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            table: default_vision_table(),
            horizontal_key: default_horizontal_key(),
            vertical_key: default_vertical_key(),
            visible_key: default_visible_key(),
            led_mode_key: default_led_mode_key(),
            camera_mode_key: default_camera_mode_key(),
            dashboard_table: default_dashboard_table(),
            geometry: GeometricConstants::default(),
            align: AlignConfig::default(),
        }
    }
}

/// Target alignment turn parameters
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct AlignConfig {
    /// Turn output per degree of horizontal offset
    #[serde(default = "default_turn_gain")]
    pub turn_gain: f64,

    /// Turn output magnitude limit
    #[serde(default = "default_max_turn")]
    pub max_turn: f64,

    /// Offset (degrees) considered aligned
    #[serde(default = "default_align_tolerance")]
    pub tolerance_deg: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            turn_gain: default_turn_gain(),
            max_turn: default_max_turn(),
            tolerance_deg: default_align_tolerance(),
        }
    }
}

/// Drive output scaling per drive mode
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct DriveConfig {
    #[serde(default = "default_normal_scale")]
    pub normal_scale: f64,
    #[serde(default = "default_boost_scale")]
    pub boost_scale: f64,
    #[serde(default = "default_slow_scale")]
    pub slow_scale: f64,

    /// Stick values below this magnitude are treated as zero
    #[serde(default = "default_deadband")]
    pub deadband: f64,

    /// Throttle used by the straight-line autonomous drive
    #[serde(default = "default_auto_linear_speed")]
    pub auto_linear_speed: f64,

    /// Duration of the straight-line autonomous drive, in control ticks
    #[serde(default = "default_auto_linear_ticks")]
    pub auto_linear_ticks: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            normal_scale: default_normal_scale(),
            boost_scale: default_boost_scale(),
            slow_scale: default_slow_scale(),
            deadband: default_deadband(),
            auto_linear_speed: default_auto_linear_speed(),
            auto_linear_ticks: default_auto_linear_ticks(),
        }
    }
}

/// Shooter, color spinner and climber outputs
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MechanismConfig {
    #[serde(default = "default_shooter_speed")]
    pub shooter_speed: f64,
    #[serde(default = "default_spinner_speed")]
    pub spinner_speed: f64,
    #[serde(default = "default_climber_speed")]
    pub climber_speed: f64,

    /// Table the color sensor parser publishes into
    #[serde(default = "default_color_sensor_table")]
    pub color_sensor_table: String,
}

impl Default for MechanismConfig {
    fn default() -> Self {
        Self {
            shooter_speed: default_shooter_speed(),
            spinner_speed: default_spinner_speed(),
            climber_speed: default_climber_speed(),
            color_sensor_table: default_color_sensor_table(),
        }
    }
}

/// Control loop and operator device settings
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Control tick period in milliseconds
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
    #[serde(default = "default_primary_device")]
    pub primary_device: u8,
    #[serde(default = "default_secondary_device")]
    pub secondary_device: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
            primary_device: default_primary_device(),
            secondary_device: default_secondary_device(),
        }
    }
}

/// Match timeline walked by the standalone binary
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct MatchConfig {
    #[serde(default = "default_pre_match_secs")]
    pub pre_match_secs: f64,
    #[serde(default = "default_autonomous_secs")]
    pub autonomous_secs: f64,
    #[serde(default = "default_teleop_secs")]
    pub teleop_secs: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pre_match_secs: default_pre_match_secs(),
            autonomous_secs: default_autonomous_secs(),
            teleop_secs: default_teleop_secs(),
        }
    }
}

// Default value functions
fn default_enabled() -> bool {
    true
}
fn default_target_height() -> f64 {
    98.25
}
fn default_camera_height() -> f64 {
    25.0
}
fn default_camera_mount_angle() -> f64 {
    20.0
}
fn default_vision_table() -> String {
    "limelight".to_string()
}
fn default_horizontal_key() -> String {
    "tx".to_string()
}
fn default_vertical_key() -> String {
    "ty".to_string()
}
fn default_visible_key() -> String {
    "tv".to_string()
}
fn default_led_mode_key() -> String {
    "ledMode".to_string()
}
fn default_camera_mode_key() -> String {
    "camMode".to_string()
}
fn default_dashboard_table() -> String {
    "dashboard".to_string()
}
fn default_turn_gain() -> f64 {
    0.03
}
fn default_max_turn() -> f64 {
    0.5
}
fn default_align_tolerance() -> f64 {
    1.0
}
fn default_normal_scale() -> f64 {
    0.75
}
fn default_boost_scale() -> f64 {
    1.0
}
fn default_slow_scale() -> f64 {
    0.4
}
fn default_deadband() -> f64 {
    0.05
}
fn default_auto_linear_speed() -> f64 {
    0.5
}
fn default_auto_linear_ticks() -> u32 {
    100
} // 2s at 50Hz
fn default_shooter_speed() -> f64 {
    0.9
}
fn default_spinner_speed() -> f64 {
    0.5
}
fn default_climber_speed() -> f64 {
    0.6
}
fn default_color_sensor_table() -> String {
    "color_sensor".to_string()
}
fn default_period_ms() -> u64 {
    20
}
fn default_primary_device() -> u8 {
    0
}
fn default_secondary_device() -> u8 {
    1
}
fn default_pre_match_secs() -> f64 {
    2.0
}
fn default_autonomous_secs() -> f64 {
    15.0
}
fn default_teleop_secs() -> f64 {
    135.0
}

impl SarathiConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        let config: SarathiConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let control = &self.control;
        if control.period_ms == 0 {
            return Err(Error::Config("control.period_ms must be > 0".to_string()));
        }
        if control.primary_device == control.secondary_device {
            return Err(Error::Config(format!(
                "control.primary_device and control.secondary_device are both {}",
                control.primary_device
            )));
        }

        let geometry = &self.vision.geometry;
        for (name, value) in [
            ("target_height", geometry.target_height),
            ("camera_height", geometry.camera_height),
            ("camera_mount_angle", geometry.camera_mount_angle),
        ] {
            if !value.is_finite() {
                return Err(Error::Config(format!(
                    "vision.geometry.{} must be finite, got {}",
                    name, value
                )));
            }
        }

        let align = &self.vision.align;
        check_unit("vision.align.max_turn", align.max_turn)?;
        if !align.turn_gain.is_finite() || align.turn_gain < 0.0 {
            return Err(Error::Config("vision.align.turn_gain must be >= 0".to_string()));
        }
        if !align.tolerance_deg.is_finite() || align.tolerance_deg < 0.0 {
            return Err(Error::Config(
                "vision.align.tolerance_deg must be >= 0".to_string(),
            ));
        }

        let drive = &self.drive;
        check_unit("drive.normal_scale", drive.normal_scale)?;
        check_unit("drive.boost_scale", drive.boost_scale)?;
        check_unit("drive.slow_scale", drive.slow_scale)?;
        check_unit("drive.auto_linear_speed", drive.auto_linear_speed)?;
        if !(0.0..1.0).contains(&drive.deadband) {
            return Err(Error::Config(format!(
                "drive.deadband must be in [0, 1), got {}",
                drive.deadband
            )));
        }

        let mechanisms = &self.mechanisms;
        check_unit("mechanisms.shooter_speed", mechanisms.shooter_speed)?;
        check_unit("mechanisms.spinner_speed", mechanisms.spinner_speed)?;
        check_unit("mechanisms.climber_speed", mechanisms.climber_speed)?;

        let timeline = &self.match_timeline;
        for (name, secs) in [
            ("pre_match_secs", timeline.pre_match_secs),
            ("autonomous_secs", timeline.autonomous_secs),
            ("teleop_secs", timeline.teleop_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(Error::Config(format!("match.{} must be >= 0, got {}", name, secs)));
            }
        }

        Ok(())
    }
}

/// Output scales and speeds are fractions of full motor output
fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be in [0, 1], got {}", name, value)))
    }
}
