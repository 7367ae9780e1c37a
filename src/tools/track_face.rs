use super::traits::{Tool, ToolResult};
use crate::robot::RobotConnector;
use crate::vision::{self, FaceDetector, TrackOutcome};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Detect the largest face in view and turn the head toward it.
pub struct TrackFaceTool {
    connector: Arc<dyn RobotConnector>,
    detector: Arc<dyn FaceDetector>,
}

impl TrackFaceTool {
    pub fn new(connector: Arc<dyn RobotConnector>, detector: Arc<dyn FaceDetector>) -> Self {
        Self {
            connector,
            detector,
        }
    }
}

#[async_trait]
impl Tool for TrackFaceTool {
    fn name(&self) -> &str {
        "track_face"
    }

    fn description(&self) -> &str {
        "Capture a frame, detect the largest face, and turn Reachy's head toward it. Reports 'No face detected' when the view is empty."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "duration": { "type": "number", "description": "Corrective move duration in seconds (default 0.4)" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let duration = args
            .get("duration")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.4);

        let session = self.connector.connect()?;
        match vision::track_face(&*session, self.detector.as_ref(), duration)? {
            TrackOutcome::Moved { yaw, pitch } => Ok(ToolResult::ok(format!(
                "Tracking face: moved yaw {yaw:.1}°, pitch {pitch:.1}°"
            ))),
            TrackOutcome::NoFace => Ok(ToolResult::ok("No face detected")),
            TrackOutcome::CameraUnavailable => {
                Ok(ToolResult::fail("Camera not available: no frame returned"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{SimConnector, SimRobot};
    use crate::vision::detector::StubDetector;
    use crate::vision::FaceBox;

    #[tokio::test]
    async fn empty_view_reports_no_face_and_no_movement() {
        let connector = Arc::new(SimConnector::new());
        let tool = TrackFaceTool::new(connector.clone(), Arc::new(StubDetector { boxes: vec![] }));

        let result = tool.execute(json!({})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "No face detected");
        assert!(connector.robot().commands().is_empty());
    }

    #[tokio::test]
    async fn face_in_view_moves_the_head() {
        let connector = Arc::new(SimConnector::new());
        // Face right of center in the quarter-scale frame.
        let detector = Arc::new(StubDetector {
            boxes: vec![FaceBox {
                x: 110.0,
                y: 50.0,
                width: 20.0,
                height: 20.0,
            }],
        });
        let tool = TrackFaceTool::new(connector.clone(), detector);

        let result = tool.execute(json!({"duration": 0.5})).await.unwrap();
        assert!(result.success);
        assert!(result.output.starts_with("Tracking face: moved yaw"));

        let commands = connector.robot().commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].head.unwrap().yaw < 0.0);
        assert_eq!(commands[0].duration, 0.5);
    }

    #[tokio::test]
    async fn dead_camera_is_a_failure_result_not_an_error() {
        let connector = Arc::new(SimConnector::with_robot(SimRobot::without_camera()));
        let tool = TrackFaceTool::new(connector, Arc::new(StubDetector { boxes: vec![] }));

        let result = tool.execute(json!({})).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Camera not available"));
    }
}
