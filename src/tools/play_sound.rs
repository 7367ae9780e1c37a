use super::traits::{Tool, ToolResult};
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Play a built-in sound by name.
pub struct PlaySoundTool {
    connector: Arc<dyn RobotConnector>,
}

impl PlaySoundTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for PlaySoundTool {
    fn name(&self) -> &str {
        "play_sound"
    }

    fn description(&self) -> &str {
        "Play one of Reachy's built-in sounds by name (see the reachy://sounds resource for the list)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Built-in sound name, e.g. 'happy1' or 'dance1'" }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let name = args
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing 'name' parameter"))?;

        let session = self.connector.connect()?;
        session.play_sound(name)?;

        Ok(ToolResult::ok(format!("Played sound: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{RobotCall, SimConnector};

    #[tokio::test]
    async fn plays_the_named_sound() {
        let connector = Arc::new(SimConnector::new());
        let tool = PlaySoundTool::new(connector.clone());

        let result = tool.execute(json!({"name": "happy1"})).await.unwrap();
        assert_eq!(result.output, "Played sound: happy1");

        let log = connector.robot().log();
        let log = log.lock();
        assert!(log.contains(&RobotCall::PlaySound("happy1".into())));
    }

    #[tokio::test]
    async fn missing_name_is_an_error() {
        let tool = PlaySoundTool::new(Arc::new(SimConnector::new()));
        assert!(tool.execute(json!({})).await.is_err());
    }
}
