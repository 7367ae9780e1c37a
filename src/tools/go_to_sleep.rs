use super::traits::{Tool, ToolResult};
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Play the built-in sleep animation.
pub struct GoToSleepTool {
    connector: Arc<dyn RobotConnector>,
}

impl GoToSleepTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for GoToSleepTool {
    fn name(&self) -> &str {
        "go_to_sleep"
    }

    fn description(&self) -> &str {
        "Put Reachy into the built-in sleep animation and resting pose."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let session = self.connector.connect()?;
        session.goto_sleep()?;
        Ok(ToolResult::ok("Reachy went to sleep"))
    }
}
