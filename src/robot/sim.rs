//! Simulated robot backend.
//!
//! Records every issued call and serves synthetic (or scripted) camera
//! frames. The default backend for both CLI subcommands and the test double
//! throughout the crate.

use super::types::{Frame, MotionCommand};
use super::{Robot, RobotConnector, RobotSession};
use anyhow::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// One recorded robot call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotCall {
    Goto(MotionCommand),
    WakeUp,
    Sleep,
    LookAt { x: f64, y: f64, z: f64, duration: f64 },
    PlaySound(String),
    GetFrame,
    GetSoundDirection,
    Disconnect,
}

#[derive(Clone)]
pub struct SimRobot {
    log: Arc<Mutex<Vec<RobotCall>>>,
    scripted_frames: Arc<Mutex<VecDeque<Option<Frame>>>>,
    default_frame: Option<Frame>,
    sound_direction: Option<(f64, bool)>,
}

impl SimRobot {
    /// Simulator with a synthetic test-card frame and a fixed DoA reading.
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            scripted_frames: Arc::new(Mutex::new(VecDeque::new())),
            default_frame: Some(test_card_frame(640, 480)),
            sound_direction: Some((0.52, false)),
        }
    }

    /// Simulator whose camera never returns a frame.
    pub fn without_camera() -> Self {
        Self {
            default_frame: None,
            ..Self::new()
        }
    }

    /// Replace the default frame served by `get_frame`.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.default_frame = Some(frame);
        self
    }

    /// Disable the DoA capability.
    pub fn without_sound_direction(mut self) -> Self {
        self.sound_direction = None;
        self
    }

    /// Queue frames consumed before the default frame; `None` entries
    /// simulate capture failures.
    pub fn script_frames(&self, frames: Vec<Option<Frame>>) {
        self.scripted_frames.lock().extend(frames);
    }

    /// Shared call log, for assertions.
    pub fn log(&self) -> Arc<Mutex<Vec<RobotCall>>> {
        self.log.clone()
    }

    /// Snapshot of the motion commands issued so far.
    pub fn commands(&self) -> Vec<MotionCommand> {
        self.log
            .lock()
            .iter()
            .filter_map(|c| match c {
                RobotCall::Goto(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RobotCall) {
        debug!(?call, "sim robot call");
        self.log.lock().push(call);
    }
}

impl Default for SimRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl Robot for SimRobot {
    fn goto_target(&self, command: &MotionCommand) -> Result<()> {
        self.record(RobotCall::Goto(*command));
        Ok(())
    }

    fn wake_up(&self) -> Result<()> {
        self.record(RobotCall::WakeUp);
        Ok(())
    }

    fn goto_sleep(&self) -> Result<()> {
        self.record(RobotCall::Sleep);
        Ok(())
    }

    fn look_at_world(&self, x: f64, y: f64, z: f64, duration: f64) -> Result<()> {
        self.record(RobotCall::LookAt { x, y, z, duration });
        Ok(())
    }

    fn play_sound(&self, name: &str) -> Result<()> {
        self.record(RobotCall::PlaySound(name.to_string()));
        Ok(())
    }

    fn get_frame(&self) -> Result<Option<Frame>> {
        self.record(RobotCall::GetFrame);
        if let Some(scripted) = self.scripted_frames.lock().pop_front() {
            return Ok(scripted);
        }
        Ok(self.default_frame.clone())
    }

    fn get_sound_direction(&self) -> Result<Option<(f64, bool)>> {
        self.record(RobotCall::GetSoundDirection);
        Ok(self.sound_direction)
    }

    fn disconnect(&self) -> Result<()> {
        self.record(RobotCall::Disconnect);
        Ok(())
    }
}

/// Connector yielding sessions over one shared [`SimRobot`].
pub struct SimConnector {
    robot: SimRobot,
}

impl SimConnector {
    pub fn new() -> Self {
        Self {
            robot: SimRobot::new(),
        }
    }

    pub fn with_robot(robot: SimRobot) -> Self {
        Self { robot }
    }

    pub fn robot(&self) -> &SimRobot {
        &self.robot
    }
}

impl Default for SimConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotConnector for SimConnector {
    fn connect(&self) -> Result<RobotSession> {
        Ok(RobotSession::new(Box::new(self.robot.clone())))
    }
}

/// Synthetic BGR test card: horizontal hue bands over a luminance gradient,
/// enough structure for JPEG encoding and sharpness scoring to be exercised.
fn test_card_frame(width: u32, height: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let band = (y * 6 / height) % 6;
            let ramp = (x * 255 / width.max(1)) as u8;
            let (b, g, r) = match band {
                0 => (ramp, 0, 0),
                1 => (0, ramp, 0),
                2 => (0, 0, ramp),
                3 => (ramp, ramp, 0),
                4 => (0, ramp, ramp),
                _ => (ramp, ramp, ramp),
            };
            data.extend_from_slice(&[b, g, r]);
        }
    }
    Frame::new(width, height, data).expect("test card buffer matches dimensions")
}
