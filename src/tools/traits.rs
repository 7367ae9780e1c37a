use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named operation exposed to the orchestrating agent.
///
/// Every tool declares a JSON schema for its parameters and returns a
/// structured [`ToolResult`]. Domain outcomes (including "unsupported
/// input") come back as `Ok` results; infrastructure failures (robot
/// unreachable, camera dead, provider rejection) propagate as errors so the
/// caller can tell "the robot said no" from "I could not reach the robot".
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Result of one tool execution: a human-readable text plus zero or more
/// captured images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageContent>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageContent) -> Self {
        self.images.push(image);
        self
    }
}

/// Base64-encoded image payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub data: String,
    pub mime_type: String,
}

impl ImageContent {
    pub fn jpeg(bytes: &[u8]) -> Self {
        use base64::Engine;
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// Serializable tool description for protocol-level listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
