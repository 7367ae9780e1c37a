use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Shake the head ("no" gesture).
pub struct ShakeHeadTool {
    connector: Arc<dyn RobotConnector>,
}

impl ShakeHeadTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for ShakeHeadTool {
    fn name(&self) -> &str {
        "shake_head"
    }

    fn description(&self) -> &str {
        "Shake Reachy's head left and right (a 'no' gesture). Cycles clamp to 1-5, speed to 0.1-1.0 seconds per phase."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "cycles": { "type": "integer", "description": "Number of shakes (default 2, clamped to 1-5)" },
                "speed": { "type": "number", "description": "Seconds per phase (default 0.3, clamped to 0.1-1.0)" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let cycles = args
            .get("cycles")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(2)
            .max(0) as u32;
        let speed = args
            .get("speed")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.3);

        let session = self.connector.connect()?;
        let (cycles, speed) = motion::shake_head(&*session, cycles, speed)?;

        Ok(ToolResult::ok(format!(
            "Shook head {cycles} times (speed {speed}s per phase)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::SimConnector;

    #[tokio::test]
    async fn oscillates_yaw_then_returns_to_neutral() {
        let connector = Arc::new(SimConnector::new());
        let tool = ShakeHeadTool::new(connector.clone());

        let result = tool.execute(json!({"cycles": 1})).await.unwrap();
        assert!(result.output.contains("Shook head 1 times"));

        let commands = connector.robot().commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].head.unwrap().yaw, -20.0);
        assert_eq!(commands[2].head.unwrap().yaw, 0.0);
    }
}
