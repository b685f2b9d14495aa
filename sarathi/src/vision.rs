//! Vision target tracking
//!
//! Turns the raw fields the vision processor publishes (horizontal offset,
//! vertical offset, target-valid flag) into values the drive code can act on.
//!
//! # State Machine
//!
//! ```text
//!            set_running(true)
//! ┌─────────┐ ───────────────▶ ┌─────────┐
//! │ Stopped │                  │ Running │  refresh() reads the table
//! └─────────┘ ◀─────────────── └─────────┘
//!            set_running(false)
//!            (target cleared, illumination off)
//! ```
//!
//! # Degradation
//!
//! A missing key, a non-finite value or a zero target-valid flag all mean
//! "no target" for that tick. With no target the horizontal offset reads 0
//! and the distance estimate reads -1, so alignment code never steers toward
//! a stale offset.

use crate::config::{GeometricConstants, VisionConfig};
use crate::core::subsystem::Subsystem;
use crate::telemetry::{TelemetryHub, TelemetryTable};
use tracing::{debug, info};

/// Distance reported when no target is visible
pub const NO_TARGET_DISTANCE: f64 = -1.0;

/// Illumination mode codes written to the vision table
const LED_ON: f64 = 0.0;
const LED_OFF: f64 = 1.0;

/// Camera mode codes written to the vision table
const CAMERA_VISION: f64 = 0.0;
const CAMERA_PASSTHROUGH: f64 = 1.0;

/// Whether the subsystem refreshes from the vision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisionState {
    #[default]
    Stopped,
    Running,
}

/// Cached target reading from the most recent refresh
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetTelemetry {
    /// Raw horizontal offset in degrees, as last read
    pub horizontal_offset: f64,
    /// Raw vertical offset in degrees, as last read
    pub vertical_offset: f64,
    pub visible: bool,
}

/// Distance to the target along the floor.
///
/// Angles in degrees; the result is in the unit of the height constants.
/// Near-vertical sight lines are not clamped.
pub fn estimate_distance(geometry: &GeometricConstants, vertical_offset: f64) -> f64 {
    let angle = (geometry.camera_mount_angle + vertical_offset).to_radians();
    (geometry.target_height - geometry.camera_height) / angle.tan()
}

/// Vision target tracking subsystem
#[derive(Debug)]
pub struct VisionTargetSubsystem {
    table: TelemetryTable,
    dashboard: TelemetryTable,
    config: VisionConfig,
    state: VisionState,
    target: TargetTelemetry,
    /// Refreshes performed while running
    refreshes: u64,
}

impl VisionTargetSubsystem {
    pub fn new(telemetry: &TelemetryHub, config: VisionConfig) -> Self {
        debug!(
            "VisionTargetSubsystem: table '{}', geometry {:?}",
            config.table, config.geometry
        );

        Self {
            table: telemetry.table(&config.table),
            dashboard: telemetry.table(&config.dashboard_table),
            config,
            state: VisionState::Stopped,
            target: TargetTelemetry::default(),
            refreshes: 0,
        }
    }

    /// Start or stop refreshing. Stopping clears the cached target and turns
    /// illumination off.
    pub fn set_running(&mut self, running: bool) {
        let next = if running {
            VisionState::Running
        } else {
            VisionState::Stopped
        };
        if next == self.state {
            return;
        }

        info!("VisionTargetSubsystem: {:?} -> {:?}", self.state, next);
        self.state = next;
        if next == VisionState::Stopped {
            self.target = TargetTelemetry::default();
            self.set_illumination(false);
        }
    }

    pub fn state(&self) -> VisionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == VisionState::Running
    }

    /// Switch illumination and camera mode together.
    ///
    /// On: LEDs lit, camera in vision-processing mode. Off: LEDs dark,
    /// camera in passthrough mode. Both fields land in one table write.
    pub fn set_illumination(&mut self, enabled: bool) {
        let (led, camera) = if enabled {
            (LED_ON, CAMERA_VISION)
        } else {
            (LED_OFF, CAMERA_PASSTHROUGH)
        };

        debug!("VisionTargetSubsystem: Illumination {}", if enabled { "on" } else { "off" });
        self.table.set_many(&[
            (self.config.led_mode_key.as_str(), led),
            (self.config.camera_mode_key.as_str(), camera),
        ]);
    }

    /// Horizontal offset in degrees, 0 when no target is visible
    pub fn horizontal_offset(&self) -> f64 {
        if self.target.visible {
            self.target.horizontal_offset
        } else {
            0.0
        }
    }

    /// Vertical offset in degrees as last read, visible or not
    pub fn vertical_offset(&self) -> f64 {
        self.target.vertical_offset
    }

    pub fn visible(&self) -> bool {
        self.target.visible
    }

    /// Estimated floor distance to the target, [`NO_TARGET_DISTANCE`] when
    /// no target is visible
    pub fn estimated_distance(&self) -> f64 {
        if !self.target.visible {
            return NO_TARGET_DISTANCE;
        }
        estimate_distance(&self.config.geometry, self.target.vertical_offset)
    }

    pub fn geometry(&self) -> &GeometricConstants {
        &self.config.geometry
    }

    /// Raw cached reading
    pub fn target(&self) -> TargetTelemetry {
        self.target
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    fn read_target(&self) -> TargetTelemetry {
        let [x, y, v] = self.table.get_many([
            self.config.horizontal_key.as_str(),
            self.config.vertical_key.as_str(),
            self.config.visible_key.as_str(),
        ]);

        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        let (x, y, v) = (finite(x), finite(y), finite(v));
        let complete = x.is_some() && y.is_some();

        TargetTelemetry {
            horizontal_offset: x.unwrap_or(0.0),
            vertical_offset: y.unwrap_or(0.0),
            visible: complete && v.is_some_and(|v| v != 0.0),
        }
    }
}

impl Subsystem for VisionTargetSubsystem {
    fn name(&self) -> &'static str {
        "vision"
    }

    fn refresh(&mut self) {
        if self.state != VisionState::Running {
            return;
        }

        let target = self.read_target();
        if target.visible != self.target.visible {
            debug!(
                "VisionTargetSubsystem: Target {}",
                if target.visible { "acquired" } else { "lost" }
            );
        }
        self.target = target;
        self.refreshes += 1;

        self.dashboard.set_many(&[
            ("vision/x", target.horizontal_offset),
            ("vision/y", target.vertical_offset),
            ("vision/visible", if target.visible { 1.0 } else { 0.0 }),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn running(hub: &TelemetryHub) -> VisionTargetSubsystem {
        let mut vision = VisionTargetSubsystem::new(hub, VisionConfig::default());
        vision.set_running(true);
        vision
    }

    fn publish(hub: &TelemetryHub, x: f64, y: f64, v: f64) {
        hub.table("limelight")
            .set_many(&[("tx", x), ("ty", y), ("tv", v)]);
    }

    #[test]
    fn test_defaults_to_stopped() {
        let hub = TelemetryHub::new();
        let mut vision = VisionTargetSubsystem::new(&hub, VisionConfig::default());
        publish(&hub, 5.0, 3.0, 1.0);

        vision.refresh();
        assert_eq!(vision.state(), VisionState::Stopped);
        assert!(!vision.visible());
        assert_eq!(vision.refreshes(), 0);
    }

    #[test]
    fn test_hidden_target_reports_sentinels() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        publish(&hub, 12.5, 4.0, 0.0);

        vision.refresh();
        assert!(!vision.visible());
        assert_eq!(vision.horizontal_offset(), 0.0);
        assert_eq!(vision.vertical_offset(), 4.0);
        assert_eq!(vision.estimated_distance(), NO_TARGET_DISTANCE);
        assert_eq!(vision.target().horizontal_offset, 12.5);
    }

    #[test]
    fn test_missing_fields_mean_not_visible() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        hub.table("limelight").set("tv", 1.0);

        vision.refresh();
        assert!(!vision.visible());
        assert_eq!(vision.estimated_distance(), NO_TARGET_DISTANCE);
    }

    #[test]
    fn test_non_finite_reading_means_not_visible() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        publish(&hub, f64::NAN, 2.0, 1.0);

        vision.refresh();
        assert!(!vision.visible());
        assert_eq!(vision.horizontal_offset(), 0.0);
    }

    #[test]
    fn test_visible_distance() {
        let hub = TelemetryHub::new();
        let mut config = VisionConfig::default();
        config.geometry = GeometricConstants {
            target_height: 85.0,
            camera_height: 25.0,
            camera_mount_angle: 20.0,
        };
        let mut vision = VisionTargetSubsystem::new(&hub, config);
        vision.set_running(true);
        publish(&hub, -3.0, 10.0, 1.0);

        vision.refresh();
        assert!(vision.visible());
        assert_eq!(vision.horizontal_offset(), -3.0);
        assert_relative_eq!(vision.estimated_distance(), 103.923, epsilon = 1e-3);
    }

    #[test]
    fn test_level_sight_line_distance_is_infinite() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        publish(&hub, 1.0, -20.0, 1.0);

        vision.refresh();
        assert!(vision.visible());
        assert!(vision.estimated_distance().is_infinite());
    }

    #[test]
    fn test_vertical_sight_line_distance_near_zero() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        publish(&hub, 1.0, 70.0, 1.0);

        vision.refresh();
        let distance = vision.estimated_distance();
        assert!(distance.is_finite());
        assert!(distance.abs() < 1e-6, "{distance}");
    }

    #[test]
    fn test_visibility_flicker_gates_offset() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        let mut offsets = Vec::new();

        for v in [0.0, 1.0, 0.0] {
            publish(&hub, 7.25, 1.0, v);
            vision.refresh();
            offsets.push(vision.horizontal_offset());
        }

        assert_eq!(offsets, vec![0.0, 7.25, 0.0]);
    }

    #[test]
    fn test_illumination_writes_both_fields_once() {
        let hub = TelemetryHub::new();
        let mut vision = VisionTargetSubsystem::new(&hub, VisionConfig::default());
        let table = hub.table("limelight");

        vision.set_illumination(true);
        assert_eq!(table.get_many(["ledMode", "camMode"]), [Some(0.0), Some(0.0)]);
        vision.set_illumination(false);
        assert_eq!(table.get_many(["ledMode", "camMode"]), [Some(1.0), Some(1.0)]);
        assert_eq!(table.writes(), 2);
    }

    #[test]
    fn test_stopping_turns_illumination_off() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        vision.set_illumination(true);

        vision.set_running(false);
        assert_eq!(hub.table("limelight").get("ledMode"), Some(1.0));
        assert!(!vision.is_running());
    }

    #[test]
    fn test_stopping_clears_cached_target() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        publish(&hub, 6.5, 3.0, 1.0);
        vision.refresh();
        assert_eq!(vision.horizontal_offset(), 6.5);

        vision.set_running(false);
        vision.refresh();
        assert!(!vision.visible());
        assert_eq!(vision.horizontal_offset(), 0.0);
        assert_eq!(vision.estimated_distance(), NO_TARGET_DISTANCE);
        assert_eq!(vision.target(), TargetTelemetry::default());
    }

    #[test]
    fn test_refresh_publishes_dashboard() {
        let hub = TelemetryHub::new();
        let mut vision = running(&hub);
        publish(&hub, 2.0, -1.5, 1.0);

        vision.refresh();
        let dashboard = hub.table("dashboard");
        assert_eq!(dashboard.get("vision/x"), Some(2.0));
        assert_eq!(dashboard.get("vision/y"), Some(-1.5));
        assert_eq!(dashboard.get("vision/visible"), Some(1.0));
    }
}
