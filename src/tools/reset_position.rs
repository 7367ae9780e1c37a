use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Return head and antennas to neutral.
pub struct ResetPositionTool {
    connector: Arc<dyn RobotConnector>,
}

impl ResetPositionTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for ResetPositionTool {
    fn name(&self) -> &str {
        "reset_position"
    }

    fn description(&self) -> &str {
        "Return Reachy's head to the neutral pose and both antennas to zero."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "duration": { "type": "number", "description": "Movement duration in seconds (default 1.5)" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let duration = args
            .get("duration")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(motion::DEFAULT_RESET_DURATION);

        let session = self.connector.connect()?;
        motion::reset_position(&*session, duration)?;

        Ok(ToolResult::ok(format!(
            "Reset to neutral position over {duration}s"
        )))
    }
}
