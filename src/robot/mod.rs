//! Robot capability interface.
//!
//! The actuator/motion SDK is an external collaborator: everything this crate
//! needs from it is expressed by the [`Robot`] trait. Sessions are acquired
//! through a [`RobotConnector`] and released exactly once when the returned
//! [`RobotSession`] is dropped, on every exit path.
//!
//! The only in-tree implementation is [`sim::SimRobot`], which records issued
//! commands and serves synthetic (or scripted) camera frames; it backs both
//! CLI subcommands until a real SDK binding implements the same two traits.

pub mod sim;
pub mod types;

pub use sim::{RobotCall, SimConnector, SimRobot};
pub use types::{AntennaTarget, Frame, HeadPose, MotionCommand};

use anyhow::Result;
use std::ops::Deref;
use tracing::warn;

/// Blocking handle to one connected robot.
///
/// Commands are issued and awaited strictly in call order; the trait is
/// deliberately synchronous because the underlying motion system completes
/// each command before accepting the next.
pub trait Robot: Send + Sync {
    /// Send one atomic head/antenna motion command.
    fn goto_target(&self, command: &MotionCommand) -> Result<()>;

    /// Play the built-in wake-up animation.
    fn wake_up(&self) -> Result<()>;

    /// Play the built-in sleep animation.
    fn goto_sleep(&self) -> Result<()>;

    /// Orient the head toward a world-frame point (meters).
    fn look_at_world(&self, x: f64, y: f64, z: f64, duration: f64) -> Result<()>;

    /// Play a built-in sound by name, or an audio file by path.
    fn play_sound(&self, name: &str) -> Result<()>;

    /// Capture one camera frame. `None` means the camera produced nothing.
    fn get_frame(&self) -> Result<Option<Frame>>;

    /// Estimate direction of arrival of sound: (angle in radians, speech?).
    /// `None` when the audio backend does not support DoA.
    fn get_sound_direction(&self) -> Result<Option<(f64, bool)>>;

    /// Close the connection. Called exactly once by [`RobotSession`] on drop.
    fn disconnect(&self) -> Result<()>;
}

/// Factory for robot sessions. One session per unit of work; concurrent
/// sessions against the same physical robot are unsupported.
pub trait RobotConnector: Send + Sync {
    fn connect(&self) -> Result<RobotSession>;
}

/// Scoped ownership of one open robot connection.
///
/// Derefs to `dyn Robot`; disconnects on drop so the handle is released on
/// normal return, early return, and panic alike.
pub struct RobotSession {
    robot: Box<dyn Robot>,
}

impl RobotSession {
    pub fn new(robot: Box<dyn Robot>) -> Self {
        Self { robot }
    }
}

impl Deref for RobotSession {
    type Target = dyn Robot;

    fn deref(&self) -> &Self::Target {
        self.robot.as_ref()
    }
}

impl Drop for RobotSession {
    fn drop(&mut self) {
        if let Err(e) = self.robot.disconnect() {
            warn!("robot disconnect failed: {e:#}");
        }
    }
}
