use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Nod the head ("yes" gesture).
pub struct NodTool {
    connector: Arc<dyn RobotConnector>,
}

impl NodTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for NodTool {
    fn name(&self) -> &str {
        "nod"
    }

    fn description(&self) -> &str {
        "Nod Reachy's head up and down (a 'yes' gesture). Cycles clamp to 1-5, speed to 0.1-1.0 seconds per phase."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "cycles": { "type": "integer", "description": "Number of nods (default 2, clamped to 1-5)" },
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
        let (cycles, speed) = motion::nod(&*session, cycles, speed)?;

        Ok(ToolResult::ok(format!(
            "Nodded {cycles} times (speed {speed}s per phase)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::SimConnector;

    #[tokio::test]
    async fn defaults_to_two_cycles() {
        let connector = Arc::new(SimConnector::new());
        let tool = NodTool::new(connector.clone());

        let result = tool.execute(json!({})).await.unwrap();
        assert!(result.output.contains("Nodded 2 times"));
        // 2 commands per cycle plus the return to neutral.
        assert_eq!(connector.robot().commands().len(), 5);
    }

    #[tokio::test]
    async fn reports_clamped_inputs() {
        let connector = Arc::new(SimConnector::new());
        let tool = NodTool::new(connector.clone());
        let result = tool.execute(json!({"cycles": 99, "speed": 9.0})).await.unwrap();
        assert!(result.output.contains("Nodded 5 times"));
        assert!(result.output.contains("speed 1s"));
    }
}
