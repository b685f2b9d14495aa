//! Match phase transition tests
//!
//! Phase entry side effects for every relevant capability combination.
//!
//! Run with: `cargo test --test match_phases`

mod common;

use common::{PRIMARY, rig_with};
use sarathi::input::{Axis, GamepadState};
use sarathi::{Capability, MatchPhase};

#[test]
fn teleop_turns_illumination_off_and_starts_manual_drive() {
    let mut rig = rig_with(&[Capability::Drive, Capability::Vision]);
    let manual = rig.robot.drive().unwrap().manual;

    rig.robot.enter_teleop().unwrap();

    let limelight = rig.telemetry.table("limelight");
    assert_eq!(limelight.get("ledMode"), Some(1.0));
    assert_eq!(limelight.get("camMode"), Some(1.0));
    assert!(rig.robot.scheduler().is_scheduled(manual));
    assert_eq!(rig.robot.phase(), MatchPhase::Teleop);

    rig.inputs
        .update(PRIMARY, GamepadState::new().with_axis(Axis::LeftY, -1.0));
    // Commands run after subsystems refresh, so demands publish one tick later
    rig.tick();
    rig.tick();
    assert_eq!(rig.actuator("drive/left"), Some(0.75));
}

#[test]
fn teleop_with_vision_only_still_turns_illumination_off() {
    let mut rig = rig_with(&[Capability::Vision]);
    rig.robot.enter_teleop().unwrap();

    let limelight = rig.telemetry.table("limelight");
    assert_eq!(limelight.get_many(["ledMode", "camMode"]), [Some(1.0), Some(1.0)]);
}

#[test]
fn autonomous_without_vision_is_noop() {
    let mut rig = rig_with(&[Capability::Drive]);
    let limelight = rig.telemetry.table("limelight");

    rig.robot.enter_autonomous().unwrap();

    assert_eq!(limelight.writes(), 0);
    assert!(rig.robot.scheduler().running().is_empty());
    assert!(rig.robot.vision().is_none());
}

#[test]
fn autonomous_requires_drive_and_vision() {
    let mut rig = rig_with(&[Capability::Vision]);
    let limelight = rig.telemetry.table("limelight");

    rig.robot.enter_autonomous().unwrap();

    assert_eq!(limelight.writes(), 0);
    assert!(rig.robot.vision().unwrap().align.is_none());
    assert!(rig.robot.scheduler().running().is_empty());
}

#[test]
fn autonomous_illuminates_and_aligns() {
    let mut rig = rig_with(&[Capability::Drive, Capability::Vision]);
    let drive = rig.robot.drive().unwrap().clone();
    let align = rig.robot.vision().unwrap().align.unwrap();

    rig.robot.enter_autonomous().unwrap();
    let limelight = rig.telemetry.table("limelight");
    assert_eq!(limelight.get_many(["ledMode", "camMode"]), [Some(0.0), Some(0.0)]);
    assert!(rig.robot.scheduler().is_scheduled(align));

    // Target to the right: turn clockwise
    rig.see(15.0, 5.0, true);
    rig.tick();
    let (left, right) = drive.subsystem.lock().output();
    assert!(left > 0.0 && right < 0.0);

    // Aligned: command finishes and the default drive command takes over
    rig.see(0.2, 5.0, true);
    rig.tick();
    assert!(!rig.robot.scheduler().is_scheduled(align));
    assert!(rig.robot.scheduler().is_scheduled(drive.manual));
}

#[test]
fn disabled_cancels_commands_and_darkens() {
    let mut rig = rig_with(&[Capability::Drive, Capability::Vision]);
    let align = rig.robot.vision().unwrap().align.unwrap();

    rig.robot.enter_autonomous().unwrap();
    rig.tick();
    rig.robot.enter_disabled();

    assert!(!rig.robot.scheduler().is_scheduled(align));
    assert!(rig.robot.scheduler().running().is_empty());
    assert_eq!(rig.telemetry.table("limelight").get("ledMode"), Some(1.0));

    // Commands stay idle while disabled; subsystems keep refreshing
    rig.see(3.0, 1.0, true);
    for _ in 0..3 {
        rig.tick();
    }
    assert!(rig.robot.scheduler().running().is_empty());
    assert!(rig.robot.vision().unwrap().subsystem.lock().visible());
    assert_eq!(rig.actuator("drive/left"), Some(0.0));
}

#[test]
fn phase_entries_are_idempotent() {
    let mut rig = rig_with(&[Capability::Drive, Capability::Vision]);
    let manual = rig.robot.drive().unwrap().manual;

    rig.robot.enter(MatchPhase::Teleop).unwrap();
    rig.robot.enter(MatchPhase::Teleop).unwrap();
    assert_eq!(rig.robot.scheduler().running(), &[manual]);

    rig.robot.enter(MatchPhase::Disabled).unwrap();
    rig.robot.enter(MatchPhase::Disabled).unwrap();
    assert_eq!(rig.robot.phase(), MatchPhase::Disabled);
    let limelight = rig.telemetry.table("limelight");
    assert_eq!(limelight.get_many(["ledMode", "camMode"]), [Some(1.0), Some(1.0)]);
}

#[test]
fn no_capabilities_means_nothing_to_do() {
    let mut rig = rig_with(&[]);

    for phase in [MatchPhase::Autonomous, MatchPhase::Teleop, MatchPhase::Disabled] {
        rig.robot.enter(phase).unwrap();
        rig.tick();
    }

    assert!(rig.robot.registry().is_empty());
    assert!(rig.robot.scheduler().is_empty());
    assert!(rig.robot.bindings().is_empty());
    assert!(rig.telemetry.table_names().is_empty());
}
