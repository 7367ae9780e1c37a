use super::traits::{ImageContent, Tool, ToolResult};
use crate::robot::RobotConnector;
use crate::vision::{self, ScanEntry};
use async_trait::async_trait;
use serde_json::json;
use std::fmt::Write;
use std::sync::Arc;

/// Panoramic sweep: capture a JPEG at evenly spaced yaw angles.
pub struct ScanSurroundingsTool {
    connector: Arc<dyn RobotConnector>,
}

impl ScanSurroundingsTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for ScanSurroundingsTool {
    fn name(&self) -> &str {
        "scan_surroundings"
    }

    fn description(&self) -> &str {
        "Sweep Reachy's head across a yaw range, capturing a JPEG at each stop. Individual capture failures are reported per angle without aborting the sweep."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "steps": { "type": "integer", "description": "Number of capture stops (default 5, clamped to 2-9)" },
                "yaw_range": { "type": "number", "description": "Total yaw sweep in degrees (default 120, clamped to 30-180)" },
                "quality": { "type": "integer", "description": "JPEG quality (default 80, clamped to 1-100)" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let steps = args
            .get("steps")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(5);
        let yaw_range = args
            .get("yaw_range")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(120.0);
        let quality = args
            .get("quality")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(80);

        let session = self.connector.connect()?;
        let entries = vision::scan_surroundings(&*session, steps, yaw_range, quality)?;

        let mut output = String::new();
        let mut images = Vec::new();
        for entry in entries {
            match entry {
                ScanEntry::Capture { label, jpeg } => {
                    let _ = writeln!(output, "captured {label}");
                    images.push(ImageContent::jpeg(&jpeg));
                }
                ScanEntry::Failure { label, reason } => {
                    let _ = writeln!(output, "failed {label}: {reason}");
                }
                ScanEntry::Summary { text } => {
                    let _ = write!(output, "{text}");
                }
            }
        }

        let mut result = ToolResult::ok(output);
        result.images = images;
        Ok(result)
    }
}
