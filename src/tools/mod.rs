//! Tool facade: the named operations exposed to the orchestrating agent.
//!
//! Each tool implements the [`Tool`] trait defined in [`traits`]: a name, a
//! description, a JSON parameter schema, and an async `execute` returning a
//! structured [`ToolResult`]. Tools are thin adapters over the actuator,
//! vision, and TTS layers; they own argument parsing and result phrasing,
//! nothing else.
//!
//! [`all_tools`] assembles the full registry. Robot access is injected as a
//! [`RobotConnector`] so every tool acquires and releases exactly one robot
//! session per invocation.

pub mod capture_image;
pub mod detect_sound_direction;
pub mod do_barrel_roll;
pub mod express_emotion;
pub mod go_to_sleep;
pub mod look_at_point;
pub mod move_antennas;
pub mod move_head;
pub mod nod;
pub mod play_sound;
pub mod reset_position;
pub mod scan_surroundings;
pub mod shake_head;
pub mod speak_text;
pub mod track_face;
pub mod traits;
pub mod wake_up;

pub use capture_image::CaptureImageTool;
pub use detect_sound_direction::DetectSoundDirectionTool;
pub use do_barrel_roll::DoBarrelRollTool;
pub use express_emotion::ExpressEmotionTool;
pub use go_to_sleep::GoToSleepTool;
pub use look_at_point::LookAtPointTool;
pub use move_antennas::MoveAntennasTool;
pub use move_head::MoveHeadTool;
pub use nod::NodTool;
pub use play_sound::PlaySoundTool;
pub use reset_position::ResetPositionTool;
pub use scan_surroundings::ScanSurroundingsTool;
pub use shake_head::ShakeHeadTool;
pub use speak_text::SpeakTextTool;
pub use track_face::TrackFaceTool;
pub use traits::{ImageContent, Tool, ToolResult, ToolSpec};
pub use wake_up::WakeUpTool;

use crate::robot::RobotConnector;
use crate::vision::FaceDetector;
use std::sync::Arc;

/// Create the full tool registry.
pub fn all_tools(
    connector: Arc<dyn RobotConnector>,
    detector: Arc<dyn FaceDetector>,
) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(MoveHeadTool::new(connector.clone())),
        Box::new(MoveAntennasTool::new(connector.clone())),
        Box::new(LookAtPointTool::new(connector.clone())),
        Box::new(ResetPositionTool::new(connector.clone())),
        Box::new(NodTool::new(connector.clone())),
        Box::new(ShakeHeadTool::new(connector.clone())),
        Box::new(DoBarrelRollTool::new(connector.clone())),
        Box::new(ExpressEmotionTool::new(connector.clone())),
        Box::new(WakeUpTool::new(connector.clone())),
        Box::new(GoToSleepTool::new(connector.clone())),
        Box::new(PlaySoundTool::new(connector.clone())),
        Box::new(SpeakTextTool::new(connector.clone())),
        Box::new(DetectSoundDirectionTool::new(connector.clone())),
        Box::new(CaptureImageTool::new(connector.clone())),
        Box::new(ScanSurroundingsTool::new(connector.clone())),
        Box::new(TrackFaceTool::new(connector, detector)),
    ]
}
