use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::{HeadPose, RobotConnector};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Move the head to a six-axis pose relative to neutral.
pub struct MoveHeadTool {
    connector: Arc<dyn RobotConnector>,
}

impl MoveHeadTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for MoveHeadTool {
    fn name(&self) -> &str {
        "move_head"
    }

    fn description(&self) -> &str {
        "Move Reachy's head to a position offset (mm) and rotation (degrees) relative to neutral. Unspecified axes stay at zero."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "x": { "type": "number", "description": "Forward/backward offset in mm (default 0)" },
                "y": { "type": "number", "description": "Left/right offset in mm (default 0)" },
                "z": { "type": "number", "description": "Up/down offset in mm (default 0)" },
                "roll": { "type": "number", "description": "Roll in degrees (default 0)" },
                "pitch": { "type": "number", "description": "Pitch in degrees (default 0)" },
                "yaw": { "type": "number", "description": "Yaw in degrees (default 0)" },
                "duration": { "type": "number", "description": "Movement duration in seconds (default 1.0)" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let axis = |key: &str| args.get(key).and_then(serde_json::Value::as_f64).unwrap_or(0.0);
        let pose = HeadPose {
            x: axis("x"),
            y: axis("y"),
            z: axis("z"),
            roll: axis("roll"),
            pitch: axis("pitch"),
            yaw: axis("yaw"),
        };
        let duration = args
            .get("duration")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(motion::DEFAULT_HEAD_DURATION);

        let session = self.connector.connect()?;
        motion::move_head(&*session, pose, duration)?;

        Ok(ToolResult::ok(format!(
            "Moved head to pos({}, {}, {})mm rot({}, {}, {}) over {duration}s",
            pose.x, pose.y, pose.z, pose.roll, pose.pitch, pose.yaw
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::SimConnector;

    fn tool_with_sim() -> (MoveHeadTool, Arc<SimConnector>) {
        let connector = Arc::new(SimConnector::new());
        (MoveHeadTool::new(connector.clone()), connector)
    }

    #[test]
    fn schema_lists_all_axes() {
        let (tool, _) = tool_with_sim();
        let schema = tool.parameters_schema();
        for axis in ["x", "y", "z", "roll", "pitch", "yaw", "duration"] {
            assert!(schema["properties"][axis].is_object(), "{axis}");
        }
    }

    #[tokio::test]
    async fn full_pose_round_trip() {
        let (tool, connector) = tool_with_sim();
        let result = tool
            .execute(json!({
                "x": 10, "y": 5, "z": 15,
                "roll": 10, "pitch": -5, "yaw": 20,
                "duration": 1.5
            }))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("pos(10, 5, 15)mm"));
        assert!(result.output.contains("rot(10, -5, 20)"));

        let commands = connector.robot().commands();
        assert_eq!(commands.len(), 1);
        let head = commands[0].head.unwrap();
        assert_eq!(
            (head.x, head.y, head.z, head.roll, head.pitch, head.yaw),
            (10.0, 5.0, 15.0, 10.0, -5.0, 20.0)
        );
        assert_eq!(commands[0].duration, 1.5);
    }

    #[tokio::test]
    async fn missing_axes_default_to_zero() {
        let (tool, connector) = tool_with_sim();
        tool.execute(json!({"yaw": 30})).await.unwrap();
        let head = connector.robot().commands()[0].head.unwrap();
        assert_eq!(head, HeadPose::with_yaw(30.0));
        assert_eq!(connector.robot().commands()[0].duration, 1.0);
    }
}
