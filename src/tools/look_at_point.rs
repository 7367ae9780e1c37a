use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Orient the head toward a world-frame point.
pub struct LookAtPointTool {
    connector: Arc<dyn RobotConnector>,
}

impl LookAtPointTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for LookAtPointTool {
    fn name(&self) -> &str {
        "look_at_point"
    }

    fn description(&self) -> &str {
        "Point Reachy's head toward a 3D point in the robot's world frame (meters, x forward, y left, z up)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "x": { "type": "number", "description": "Forward distance in meters" },
                "y": { "type": "number", "description": "Leftward distance in meters" },
                "z": { "type": "number", "description": "Upward distance in meters" },
                "duration": { "type": "number", "description": "Movement duration in seconds (default 1.0)" }
            },
            "required": ["x", "y", "z"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let coord = |key: &str| {
            args.get(key)
                .and_then(serde_json::Value::as_f64)
                .ok_or_else(|| anyhow::anyhow!("Missing '{key}' parameter"))
        };
        let (x, y, z) = (coord("x")?, coord("y")?, coord("z")?);
        let duration = args
            .get("duration")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(motion::DEFAULT_HEAD_DURATION);

        let session = self.connector.connect()?;
        motion::look_at(&*session, x, y, z, duration)?;

        Ok(ToolResult::ok(format!(
            "Looking at point ({x}, {y}, {z}) over {duration}s"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{RobotCall, SimConnector};

    #[tokio::test]
    async fn forwards_point_untransformed() {
        let connector = Arc::new(SimConnector::new());
        let tool = LookAtPointTool::new(connector.clone());

        let result = tool
            .execute(json!({"x": 0.5, "y": -0.2, "z": 0.3}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("(0.5, -0.2, 0.3)"));

        let log = connector.robot().log();
        let log = log.lock();
        assert!(log.contains(&RobotCall::LookAt {
            x: 0.5,
            y: -0.2,
            z: 0.3,
            duration: 1.0
        }));
    }

    #[tokio::test]
    async fn missing_coordinate_is_an_error() {
        let tool = LookAtPointTool::new(Arc::new(SimConnector::new()));
        assert!(tool.execute(json!({"x": 0.5, "y": 0.0})).await.is_err());
    }
}
