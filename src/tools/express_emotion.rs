use super::traits::{Tool, ToolResult};
use crate::motion::{self, Emotion};
use crate::robot::RobotConnector;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Run the motion/sound sequence mapped to an emoji.
pub struct ExpressEmotionTool {
    connector: Arc<dyn RobotConnector>,
}

impl ExpressEmotionTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }

    fn supported_list() -> String {
        Emotion::ALL
            .iter()
            .map(|e| e.emoji())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Tool for ExpressEmotionTool {
    fn name(&self) -> &str {
        "express_emotion"
    }

    fn description(&self) -> &str {
        "Express an emotion with a motion and sound sequence keyed by an emoji (😊 😢 😠 😲 😴 🤔 🎉 😕 ❤️ 😤)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "emoji": { "type": "string", "description": "One of the supported emoji" }
            },
            "required": ["emoji"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let emoji = args
            .get("emoji")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing 'emoji' parameter"))?;

        // The handle is acquired even for unmapped emoji; only the motion
        // and sound methods stay untouched.
        let session = self.connector.connect()?;
        match motion::express_emotion(&*session, emoji)? {
            Some(emotion) => Ok(ToolResult::ok(format!(
                "Reachy expressed: {} ({})",
                emotion.name(),
                emotion.emoji()
            ))),
            None => Ok(ToolResult::ok(format!(
                "Unsupported emoji: {emoji}. Supported: {}",
                Self::supported_list()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{RobotCall, SimConnector};

    #[tokio::test]
    async fn supported_emoji_reports_name_and_emoji() {
        let connector = Arc::new(SimConnector::new());
        let tool = ExpressEmotionTool::new(connector.clone());

        let result = tool.execute(json!({"emoji": "🎉"})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "Reachy expressed: celebrate (🎉)");

        let log = connector.robot().log();
        let log = log.lock();
        assert_eq!(
            log.iter()
                .filter(|c| matches!(c, RobotCall::PlaySound(_)))
                .count(),
            1
        );
        assert_eq!(
            log.iter().filter(|c| matches!(c, RobotCall::Goto(_))).count(),
            2
        );
    }

    #[tokio::test]
    async fn unsupported_emoji_is_a_normal_result_with_zero_commands() {
        let connector = Arc::new(SimConnector::new());
        let tool = ExpressEmotionTool::new(connector.clone());

        let result = tool.execute(json!({"emoji": "🔥"})).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("Unsupported emoji"));
        assert!(result.output.contains("😊"));

        // Handle acquired and released; no motion or sound issued.
        let log = connector.robot().log();
        let log = log.lock();
        assert_eq!(*log, vec![RobotCall::Disconnect]);
    }

    #[tokio::test]
    async fn missing_emoji_is_an_error() {
        let tool = ExpressEmotionTool::new(Arc::new(SimConnector::new()));
        assert!(tool.execute(json!({})).await.is_err());
    }
}
