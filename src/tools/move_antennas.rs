use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Move both antennas, clamped to the physical range.
pub struct MoveAntennasTool {
    connector: Arc<dyn RobotConnector>,
}

impl MoveAntennasTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for MoveAntennasTool {
    fn name(&self) -> &str {
        "move_antennas"
    }

    fn description(&self) -> &str {
        "Move Reachy's antennas to the given angles in radians. Angles are clamped to [-3.14, 3.14]; the result reports the effective (clamped) values."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "right": { "type": "number", "description": "Right antenna angle in radians" },
                "left": { "type": "number", "description": "Left antenna angle in radians" },
                "duration": { "type": "number", "description": "Movement duration in seconds (default 0.5)" }
            },
            "required": ["right", "left"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let right = args
            .get("right")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| anyhow::anyhow!("Missing 'right' parameter"))?;
        let left = args
            .get("left")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| anyhow::anyhow!("Missing 'left' parameter"))?;
        let duration = args
            .get("duration")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(motion::DEFAULT_ANTENNA_DURATION);

        let session = self.connector.connect()?;
        let target = motion::move_antennas(&*session, right, left, duration)?;

        Ok(ToolResult::ok(format!(
            "Moved antennas to right={}, left={} (rad) over {duration}s",
            target.right, target.left
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{AntennaTarget, SimConnector};

    #[tokio::test]
    async fn out_of_range_angles_report_clamped_values() {
        let connector = Arc::new(SimConnector::new());
        let tool = MoveAntennasTool::new(connector.clone());

        let result = tool
            .execute(json!({"right": 5.0, "left": 4.0}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("right=3.14, left=3.14"));

        let commands = connector.robot().commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].antennas, Some(AntennaTarget::new(3.14, 3.14)));
        assert_eq!(commands[0].duration, 0.5);
    }

    #[tokio::test]
    async fn boundary_values_pass_unchanged() {
        let connector = Arc::new(SimConnector::new());
        let tool = MoveAntennasTool::new(connector.clone());
        let result = tool
            .execute(json!({"right": 3.14, "left": -3.14, "duration": 0.2}))
            .await
            .unwrap();
        assert!(result.output.contains("right=3.14, left=-3.14"));
        assert_eq!(connector.robot().commands()[0].duration, 0.2);
    }

    #[tokio::test]
    async fn missing_angles_are_an_error() {
        let tool = MoveAntennasTool::new(Arc::new(SimConnector::new()));
        assert!(tool.execute(json!({"right": 1.0})).await.is_err());
        assert!(tool.execute(json!({})).await.is_err());
    }
}
