use super::traits::{ImageContent, Tool, ToolResult};
use crate::robot::RobotConnector;
use crate::vision;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Capture one camera frame as a JPEG.
pub struct CaptureImageTool {
    connector: Arc<dyn RobotConnector>,
}

impl CaptureImageTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for CaptureImageTool {
    fn name(&self) -> &str {
        "capture_image"
    }

    fn description(&self) -> &str {
        "Capture one frame from Reachy's camera and return it as a JPEG image."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "quality": { "type": "integer", "description": "JPEG quality (default 90, clamped to 1-100)" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let quality = args
            .get("quality")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(90);

        let session = self.connector.connect()?;
        let captured = vision::capture_image(&*session, quality)?;

        Ok(ToolResult::ok(format!(
            "Captured {}x{} JPEG (quality {})",
            captured.width, captured.height, captured.quality
        ))
        .with_image(ImageContent::jpeg(&captured.jpeg)))
    }
}
