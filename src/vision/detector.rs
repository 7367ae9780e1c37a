//! Face detector seam.
//!
//! Detection runs on a downscaled luma plane; boxes come back in that
//! downscaled coordinate frame and must be rescaled by the caller.

use super::VisionError;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/seeta_fd_frontal_v1.0.bin";
pub const MODEL_PATH_ENV: &str = "REACHY_FACE_MODEL";

/// Axis-aligned face bounding box, in the coordinate frame it was detected in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rescale all coordinates by `factor` (e.g. 1/0.25 to map a box from
    /// the downscaled frame back to the original).
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

pub trait FaceDetector: Send + Sync {
    /// Detect faces in a single-channel luma buffer, in enumeration order.
    fn detect(&self, luma: &[u8], width: u32, height: u32) -> Result<Vec<FaceBox>, VisionError>;
}

/// SeetaFace frontal-face cascade via the `rustface` crate.
///
/// The cascade is loaded per call; `track_face` runs at most once per tool
/// invocation, and a load failure must surface on that call rather than at
/// registry construction.
pub struct SeetaFaceDetector {
    model_path: PathBuf,
}

impl SeetaFaceDetector {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    /// Model path from `REACHY_FACE_MODEL`, falling back to the bundled
    /// default location.
    pub fn from_env() -> Self {
        let path = std::env::var(MODEL_PATH_ENV).unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
        Self::new(path)
    }

    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Attempt to load the cascade without running detection (preflight).
    pub fn probe(&self) -> Result<(), VisionError> {
        self.load().map(|_| ())
    }

    fn load(&self) -> Result<Box<dyn rustface::Detector>, VisionError> {
        let path = self.model_path.to_string_lossy();
        let mut detector = rustface::create_detector(path.as_ref())
            .map_err(|e| VisionError::Detector(format!("failed to load {path}: {e}")))?;
        detector.set_min_face_size(15);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);
        Ok(detector)
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&self, luma: &[u8], width: u32, height: u32) -> Result<Vec<FaceBox>, VisionError> {
        let mut detector = self.load()?;
        let image = rustface::ImageData::new(luma, width, height);
        let faces = detector.detect(&image);
        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox {
                    x: f64::from(bbox.x()),
                    y: f64::from(bbox.y()),
                    width: f64::from(bbox.width()),
                    height: f64::from(bbox.height()),
                }
            })
            .collect())
    }
}

/// Fixed-output detector for tests.
#[cfg(test)]
pub struct StubDetector {
    pub boxes: Vec<FaceBox>,
}

#[cfg(test)]
impl FaceDetector for StubDetector {
    fn detect(&self, _luma: &[u8], _width: u32, _height: u32) -> Result<Vec<FaceBox>, VisionError> {
        Ok(self.boxes.clone())
    }
}
