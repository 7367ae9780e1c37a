use super::traits::{Tool, ToolResult};
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Play the built-in wake-up animation.
pub struct WakeUpTool {
    connector: Arc<dyn RobotConnector>,
}

impl WakeUpTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for WakeUpTool {
    fn name(&self) -> &str {
        "wake_up"
    }

    fn description(&self) -> &str {
        "Wake Reachy up with the built-in wake animation. Run this before other movements."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let session = self.connector.connect()?;
        session.wake_up()?;
        Ok(ToolResult::ok("Reachy woke up!"))
    }
}
