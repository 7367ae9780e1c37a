use super::traits::{Tool, ToolResult};
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Read the microphone array's direction-of-arrival estimate.
pub struct DetectSoundDirectionTool {
    connector: Arc<dyn RobotConnector>,
}

impl DetectSoundDirectionTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for DetectSoundDirectionTool {
    fn name(&self) -> &str {
        "detect_sound_direction"
    }

    fn description(&self) -> &str {
        "Estimate the direction an incoming sound arrives from, using Reachy's microphone array."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let session = self.connector.connect()?;
        match session.get_sound_direction()? {
            Some((angle, is_speech)) => Ok(ToolResult::ok(format!(
                "Sound direction: {angle:.2} rad ({:.0}°){}",
                angle.to_degrees(),
                if is_speech { ", speech detected" } else { "" }
            ))),
            None => Ok(ToolResult::fail(
                "Sound direction detection not available on this robot",
            )),
        }
    }
}
