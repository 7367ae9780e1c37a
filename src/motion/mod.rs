//! Actuator command layer.
//!
//! Translates high-level intents into bounded sequences of
//! [`MotionCommand`]s against a [`Robot`] handle. Input validation and
//! clamping happen here, before any command is sent; pose axes themselves
//! are not clamped (physical limits are the motion system's job).
//!
//! Connection and command-send failures propagate unhandled: they are
//! infrastructure failures, not business-logic outcomes.

pub mod emotion;

pub use emotion::Emotion;

use crate::robot::{AntennaTarget, HeadPose, MotionCommand, Robot};
use anyhow::{ensure, Result};

pub const DEFAULT_HEAD_DURATION: f64 = 1.0;
pub const DEFAULT_ANTENNA_DURATION: f64 = 0.5;
pub const DEFAULT_RESET_DURATION: f64 = 1.5;

/// Send one head pose command. Axes default to zero upstream; no clamping.
pub fn move_head(robot: &dyn Robot, pose: HeadPose, duration: f64) -> Result<()> {
    ensure!(duration > 0.0, "duration must be > 0 (got {duration})");
    robot.goto_target(&MotionCommand::head(pose, duration))
}

/// Clamp both antenna angles to the physical range, then send. Returns the
/// clamped target so callers observe the effective command.
pub fn move_antennas(
    robot: &dyn Robot,
    right: f64,
    left: f64,
    duration: f64,
) -> Result<AntennaTarget> {
    ensure!(duration > 0.0, "duration must be > 0 (got {duration})");
    let target = AntennaTarget::new(right, left).clamped();
    robot.goto_target(&MotionCommand::antennas(target, duration))?;
    Ok(target)
}

/// Forward a world-frame point directly; no transformation.
pub fn look_at(robot: &dyn Robot, x: f64, y: f64, z: f64, duration: f64) -> Result<()> {
    ensure!(duration > 0.0, "duration must be > 0 (got {duration})");
    robot.look_at_world(x, y, z, duration)
}

/// Neutral head pose plus zeroed antennas in one command.
pub fn reset_position(robot: &dyn Robot, duration: f64) -> Result<()> {
    ensure!(duration > 0.0, "duration must be > 0 (got {duration})");
    robot.goto_target(&MotionCommand::both(
        HeadPose::neutral(),
        AntennaTarget::zero(),
        duration,
    ))
}

/// Nod: a pitch oscillation repeated `cycles` times, then back to neutral.
/// Inputs are clamped (cycles 1..=5, speed 0.1..=1.0 seconds per phase);
/// the clamped values are returned.
pub fn nod(robot: &dyn Robot, cycles: u32, speed: f64) -> Result<(u32, f64)> {
    let cycles = cycles.clamp(1, 5);
    let speed = speed.clamp(0.1, 1.0);
    for _ in 0..cycles {
        robot.goto_target(&MotionCommand::head(
            HeadPose {
                pitch: 15.0,
                ..HeadPose::default()
            },
            speed,
        ))?;
        robot.goto_target(&MotionCommand::head(
            HeadPose {
                pitch: -10.0,
                ..HeadPose::default()
            },
            speed,
        ))?;
    }
    robot.goto_target(&MotionCommand::head(HeadPose::neutral(), speed))?;
    Ok((cycles, speed))
}

/// Shake head: a yaw oscillation repeated `cycles` times, then back to
/// neutral. Same clamping contract as [`nod`].
pub fn shake_head(robot: &dyn Robot, cycles: u32, speed: f64) -> Result<(u32, f64)> {
    let cycles = cycles.clamp(1, 5);
    let speed = speed.clamp(0.1, 1.0);
    for _ in 0..cycles {
        robot.goto_target(&MotionCommand::head(HeadPose::with_yaw(-20.0), speed))?;
        robot.goto_target(&MotionCommand::head(HeadPose::with_yaw(20.0), speed))?;
    }
    robot.goto_target(&MotionCommand::head(HeadPose::neutral(), speed))?;
    Ok((cycles, speed))
}

/// Fixed four-command choreography: tilt, two antenna wiggles, reset.
pub fn barrel_roll(robot: &dyn Robot) -> Result<()> {
    robot.goto_target(&MotionCommand::head(
        HeadPose {
            z: 20.0,
            roll: 10.0,
            ..HeadPose::default()
        },
        1.0,
    ))?;
    robot.goto_target(&MotionCommand::antennas(AntennaTarget::new(0.6, -0.6), 0.3))?;
    robot.goto_target(&MotionCommand::antennas(AntennaTarget::new(-0.6, 0.6), 0.3))?;
    robot.goto_target(&MotionCommand::both(
        HeadPose::neutral(),
        AntennaTarget::zero(),
        1.0,
    ))
}

/// Look up the emotion for `emoji` and, if mapped, play its sound (when the
/// sequence has one) and execute its command sequence in order.
///
/// Returns `None` for unmapped emoji without touching the robot's motion or
/// sound methods.
pub fn express_emotion(robot: &dyn Robot, emoji: &str) -> Result<Option<Emotion>> {
    let Some(emotion) = Emotion::from_emoji(emoji) else {
        return Ok(None);
    };
    if let Some(sound) = emotion.sound() {
        robot.play_sound(sound)?;
    }
    for command in emotion.commands() {
        robot.goto_target(&command)?;
    }
    Ok(Some(emotion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{RobotCall, SimRobot};

    #[test]
    fn move_antennas_clamps_before_sending() {
        let sim = SimRobot::new();
        let target = move_antennas(&sim, 5.0, -4.0, 0.5).unwrap();
        assert_eq!(target, AntennaTarget::new(3.14, -3.14));

        let commands = sim.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].antennas, Some(AntennaTarget::new(3.14, -3.14)));
        assert_eq!(commands[0].duration, 0.5);
    }

    #[test]
    fn move_antennas_passes_in_range_values_through() {
        let sim = SimRobot::new();
        let target = move_antennas(&sim, 3.14, -3.14, 0.5).unwrap();
        assert_eq!(target, AntennaTarget::new(3.14, -3.14));
    }

    #[test]
    fn move_head_sends_exactly_one_command() {
        let sim = SimRobot::new();
        let pose = HeadPose {
            x: 10.0,
            y: 5.0,
            z: 15.0,
            roll: 10.0,
            pitch: -5.0,
            yaw: 20.0,
        };
        move_head(&sim, pose, 1.5).unwrap();

        let commands = sim.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].head, Some(pose));
        assert_eq!(commands[0].duration, 1.5);
        assert!(commands[0].antennas.is_none());
    }

    #[test]
    fn move_head_rejects_nonpositive_duration() {
        let sim = SimRobot::new();
        assert!(move_head(&sim, HeadPose::neutral(), 0.0).is_err());
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn nod_issues_two_commands_per_cycle_plus_neutral() {
        let sim = SimRobot::new();
        let (cycles, speed) = nod(&sim, 2, 0.3).unwrap();
        assert_eq!((cycles, speed), (2, 0.3));
        assert_eq!(sim.commands().len(), 5);
        // Final command returns to neutral at the same duration.
        let last = *sim.commands().last().unwrap();
        assert_eq!(last.head, Some(HeadPose::neutral()));
        assert_eq!(last.duration, 0.3);
    }

    #[test]
    fn nod_clamps_cycles_and_speed() {
        let sim = SimRobot::new();
        let (cycles, speed) = nod(&sim, 99, 7.0).unwrap();
        assert_eq!((cycles, speed), (5, 1.0));
        assert_eq!(sim.commands().len(), 11);
    }

    #[test]
    fn shake_head_oscillates_yaw() {
        let sim = SimRobot::new();
        shake_head(&sim, 1, 0.3).unwrap();
        let commands = sim.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].head.unwrap().yaw, -20.0);
        assert_eq!(commands[1].head.unwrap().yaw, 20.0);
        assert_eq!(commands[2].head, Some(HeadPose::neutral()));
    }

    #[test]
    fn barrel_roll_is_four_commands() {
        let sim = SimRobot::new();
        barrel_roll(&sim).unwrap();
        assert_eq!(sim.commands().len(), 4);
    }

    #[test]
    fn reset_position_sends_neutral_and_zero() {
        let sim = SimRobot::new();
        reset_position(&sim, 1.5).unwrap();
        let commands = sim.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].head, Some(HeadPose::neutral()));
        assert_eq!(commands[0].antennas, Some(AntennaTarget::zero()));
    }

    #[test]
    fn unsupported_emoji_touches_nothing() {
        let sim = SimRobot::new();
        let outcome = express_emotion(&sim, "🔥").unwrap();
        assert!(outcome.is_none());
        assert!(sim.log().lock().is_empty());
    }

    #[test]
    fn impatient_is_three_antenna_commands_no_sound() {
        let sim = SimRobot::new();
        let outcome = express_emotion(&sim, "😤").unwrap();
        assert_eq!(outcome, Some(Emotion::Impatient));

        let calls = sim.log();
        let calls = calls.lock();
        assert!(!calls.iter().any(|c| matches!(c, RobotCall::PlaySound(_))));
        drop(calls);
        let commands = sim.commands();
        assert_eq!(commands.len(), 3);
        assert!(commands.iter().all(|c| c.head.is_none() && c.antennas.is_some()));
    }

    #[test]
    fn celebrate_is_two_combined_commands_and_one_sound() {
        let sim = SimRobot::new();
        let outcome = express_emotion(&sim, "🎉").unwrap();
        assert_eq!(outcome, Some(Emotion::Celebrate));

        let calls = sim.log();
        let calls = calls.lock();
        assert_eq!(
            calls
                .iter()
                .filter(|c| matches!(c, RobotCall::PlaySound(_)))
                .count(),
            1
        );
        drop(calls);
        let commands = sim.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| c.head.is_some() && c.antennas.is_some()));
    }
}
