use super::traits::{Tool, ToolResult};
use crate::motion;
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Fixed tilt-and-wiggle choreography.
pub struct DoBarrelRollTool {
    connector: Arc<dyn RobotConnector>,
}

impl DoBarrelRollTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for DoBarrelRollTool {
    fn name(&self) -> &str {
        "do_barrel_roll"
    }

    fn description(&self) -> &str {
        "Do a barrel roll: head tilt, two antenna wiggles, back to neutral."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let session = self.connector.connect()?;
        motion::barrel_roll(&*session)?;
        Ok(ToolResult::ok("Did the barrel roll!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::SimConnector;

    #[tokio::test]
    async fn runs_the_fixed_choreography() {
        let connector = Arc::new(SimConnector::new());
        let tool = DoBarrelRollTool::new(connector.clone());

        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result.output, "Did the barrel roll!");
        assert_eq!(connector.robot().commands().len(), 4);
    }
}
