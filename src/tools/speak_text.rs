use super::traits::{Tool, ToolResult};
use crate::robot::RobotConnector;
use crate::tts::{self, ConfigOverrides, VoiceSettings};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Synthesize text through the TTS provider and play it on the robot.
pub struct SpeakTextTool {
    connector: Arc<dyn RobotConnector>,
}

impl SpeakTextTool {
    pub fn new(connector: Arc<dyn RobotConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Tool for SpeakTextTool {
    fn name(&self) -> &str {
        "speak_text"
    }

    fn description(&self) -> &str {
        "Make Reachy speak arbitrary text using ElevenLabs text-to-speech. Requires an API key in the environment."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to speak" },
                "voice_id": { "type": "string", "description": "ElevenLabs voice id (default from env or built-in)" },
                "model_id": { "type": "string", "description": "ElevenLabs model id (default eleven_multilingual_v2)" },
                "stability": { "type": "number", "description": "Voice stability 0.0-1.0" },
                "similarity_boost": { "type": "number", "description": "Similarity boost 0.0-1.0" },
                "style": { "type": "number", "description": "Style exaggeration 0.0-1.0" },
                "use_speaker_boost": { "type": "boolean", "description": "Speaker boost (default true)" },
                "output_format": { "type": "string", "description": "Audio output format (default mp3_44100_128)" }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let text = args
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing 'text' parameter"))?;
        let string_arg = |key: &str| {
            args.get(key)
                .and_then(|v| v.as_str())
                .map(ToString::to_string)
        };

        let config = tts::load_config(&ConfigOverrides {
            api_key: None,
            voice_id: string_arg("voice_id"),
            model_id: string_arg("model_id"),
            output_format: string_arg("output_format"),
        })?;
        let settings = VoiceSettings {
            stability: args.get("stability").and_then(serde_json::Value::as_f64),
            similarity_boost: args
                .get("similarity_boost")
                .and_then(serde_json::Value::as_f64),
            style: args.get("style").and_then(serde_json::Value::as_f64),
            use_speaker_boost: Some(
                args.get("use_speaker_boost")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(true),
            ),
            speed: None,
        };

        let session = self.connector.connect()?;
        let path = tts::synthesize_to_temp_file(text, &config, Some(&settings)).await?;
        let played = session.play_sound(&path.to_string_lossy());
        // Cleanup runs on the failure path too; the playback error wins.
        if let Err(e) = tts::remove_temp_audio(&path) {
            warn!("failed to remove temp audio {}: {e}", path.display());
        }
        played?;

        Ok(ToolResult::ok(format!("Reachy said: {text}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::SimConnector;

    #[tokio::test]
    async fn missing_text_is_an_error() {
        let tool = SpeakTextTool::new(Arc::new(SimConnector::new()));
        assert!(tool.execute(json!({})).await.is_err());
    }

    #[test]
    fn schema_requires_only_text() {
        let tool = SpeakTextTool::new(Arc::new(SimConnector::new()));
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["text"]));
        assert!(schema["properties"]["use_speaker_boost"].is_object());
    }
}
