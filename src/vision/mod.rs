//! Vision pipeline: camera capture, panoramic scan, face tracking.
//!
//! Single-shot capture fails terminally on a missing frame or a failed
//! encode. The panoramic scan degrades per angle instead: a failed capture
//! or encode appends a failure entry for that angle and the sweep continues,
//! always finishing with a return-to-center command and a summary entry.

pub mod detector;

pub use detector::{FaceBox, FaceDetector, SeetaFaceDetector};

use crate::robot::{Frame, HeadPose, MotionCommand, Robot};
use anyhow::{ensure, Result};
use thiserror::Error;
use tracing::info;

/// Camera horizontal field of view, degrees.
pub const HORIZONTAL_FOV_DEG: f64 = 65.0;
/// Camera vertical field of view, degrees.
pub const VERTICAL_FOV_DEG: f64 = 40.0;
/// Frames are downscaled by this factor before detection; detected boxes
/// must be divided back by it before use.
pub const DETECTION_SCALE: f64 = 0.25;

const SCAN_MOVE_DURATION: f64 = 0.6;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("camera not available: no frame returned")]
    CameraUnavailable,
    #[error("JPEG encoding failed: {0}")]
    Encoding(String),
    #[error("face detector unavailable: {0}")]
    Detector(String),
}

/// Result of a single-shot capture.
#[derive(Debug)]
pub struct CapturedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

/// One entry of a panoramic scan, in sweep order. A partial failure never
/// discards the entries captured so far.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEntry {
    Capture { label: String, jpeg: Vec<u8> },
    Failure { label: String, reason: String },
    Summary { text: String },
}

/// Outcome of one face-tracking pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackOutcome {
    CameraUnavailable,
    NoFace,
    Moved { yaw: f64, pitch: f64 },
}

/// Capture one frame and JPEG-encode it. Quality is clamped to 1..=100.
pub fn capture_image(robot: &dyn Robot, quality: i64) -> Result<CapturedImage> {
    let quality = quality.clamp(1, 100) as u8;
    let frame = robot.get_frame()?.ok_or(VisionError::CameraUnavailable)?;
    let jpeg = frame
        .to_jpeg(quality)
        .map_err(|e| VisionError::Encoding(e.to_string()))?;
    Ok(CapturedImage {
        jpeg,
        width: frame.width,
        height: frame.height,
        quality,
    })
}

/// Evenly spaced yaw positions over `[-yaw_range/2, +yaw_range/2]`,
/// inclusive of both endpoints.
pub fn scan_positions(steps: u32, yaw_range: f64) -> Vec<f64> {
    let half = yaw_range / 2.0;
    (0..steps)
        .map(|i| -half + f64::from(i) * yaw_range / f64::from(steps - 1))
        .collect()
}

/// Sweep the head across `yaw_range` degrees in `steps` stops, capturing a
/// JPEG at each. Parameters are clamped (steps 2..=9, yaw range 30..=180,
/// quality 1..=100). A failed capture or encode at one angle appends a
/// failure entry and the sweep continues; the head always returns to center
/// afterwards. Per-step progress goes to the log only and never affects the
/// returned entries.
pub fn scan_surroundings(
    robot: &dyn Robot,
    steps: i64,
    yaw_range: f64,
    quality: i64,
) -> Result<Vec<ScanEntry>> {
    let steps = steps.clamp(2, 9) as u32;
    let yaw_range = yaw_range.clamp(30.0, 180.0);
    let quality = quality.clamp(1, 100) as u8;

    let positions = scan_positions(steps, yaw_range);
    let mut entries = Vec::with_capacity(positions.len() + 1);

    for (idx, &yaw) in positions.iter().enumerate() {
        info!(step = idx + 1, total = steps, yaw, "scan step");
        let label = format!("yaw {yaw:+.0}°");
        robot.goto_target(&MotionCommand::head(
            HeadPose::with_yaw(yaw),
            SCAN_MOVE_DURATION,
        ))?;

        let frame = match robot.get_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                entries.push(ScanEntry::Failure {
                    label,
                    reason: "no frame returned from camera".to_string(),
                });
                continue;
            }
            Err(e) => {
                entries.push(ScanEntry::Failure {
                    label,
                    reason: format!("capture failed: {e:#}"),
                });
                continue;
            }
        };

        match frame.to_jpeg(quality) {
            Ok(jpeg) => entries.push(ScanEntry::Capture { label, jpeg }),
            Err(e) => entries.push(ScanEntry::Failure {
                label,
                reason: format!("JPEG encoding failed: {e}"),
            }),
        }
    }

    // Back to center regardless of how many captures succeeded.
    robot.goto_target(&MotionCommand::head(HeadPose::neutral(), SCAN_MOVE_DURATION))?;

    let first = positions.first().copied().unwrap_or(0.0);
    let last = positions.last().copied().unwrap_or(0.0);
    entries.push(ScanEntry::Summary {
        text: format!(
            "Scanned {steps} positions across {yaw_range:.0}° (yaw {first:+.0}° to {last:+.0}°)"
        ),
    });

    Ok(entries)
}

/// Detect the largest face in one frame and issue a corrective yaw/pitch
/// move toward it.
///
/// Detection runs on a [`DETECTION_SCALE`]-downscaled luma plane; boxes are
/// rescaled to original-frame coordinates before the offset computation.
/// When two faces tie on area, the first in detector output order wins.
/// Positive pixel-x offset means the face is to the image's right, which
/// requires a negative yaw turn in the robot's convention.
pub fn track_face(
    robot: &dyn Robot,
    detector: &dyn FaceDetector,
    duration: f64,
) -> Result<TrackOutcome> {
    ensure!(duration > 0.0, "duration must be > 0 (got {duration})");
    let Some(frame) = robot.get_frame()? else {
        return Ok(TrackOutcome::CameraUnavailable);
    };

    let (luma, small_w, small_h) = frame.downscaled_luma(DETECTION_SCALE);
    let faces = detector.detect(&luma, small_w, small_h)?;

    let Some(largest) = faces
        .iter()
        .fold(None::<&FaceBox>, |best, face| match best {
            Some(b) if b.area() >= face.area() => Some(b),
            _ => Some(face),
        })
    else {
        return Ok(TrackOutcome::NoFace);
    };

    let face = largest.scaled(1.0 / DETECTION_SCALE);
    let (center_x, center_y) = face.center();
    let offset_x = center_x - f64::from(frame.width) / 2.0;
    let offset_y = center_y - f64::from(frame.height) / 2.0;
    let yaw = -(offset_x / f64::from(frame.width)) * HORIZONTAL_FOV_DEG;
    let pitch = (offset_y / f64::from(frame.height)) * VERTICAL_FOV_DEG;

    robot.goto_target(&MotionCommand::head(
        HeadPose {
            yaw,
            pitch,
            ..HeadPose::default()
        },
        duration,
    ))?;

    Ok(TrackOutcome::Moved { yaw, pitch })
}

/// Laplacian-variance sharpness score of a frame's luma plane. Higher is
/// sharper; motion blur right after a head move scores low.
pub fn frame_sharpness(frame: &Frame) -> f64 {
    let luma = frame.to_luma();
    let (w, h) = (frame.width as usize, frame.height as usize);
    if w < 3 || h < 3 {
        return 0.0;
    }

    let mut values = Vec::with_capacity((w - 2) * (h - 2));
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let c = f64::from(luma[y * w + x]);
            let lap = 4.0 * c
                - f64::from(luma[(y - 1) * w + x])
                - f64::from(luma[(y + 1) * w + x])
                - f64::from(luma[y * w + x - 1])
                - f64::from(luma[y * w + x + 1]);
            values.push(lap);
        }
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Capture the sharpest of several candidate frames, discarding warm-up
/// frames first (frames right after a move often contain motion blur).
pub fn capture_best_frame(
    robot: &dyn Robot,
    warmup_frames: u32,
    candidates: u32,
) -> Result<Option<Frame>> {
    for _ in 0..warmup_frames {
        let _ = robot.get_frame()?;
    }

    let mut best: Option<(f64, Frame)> = None;
    for _ in 0..candidates {
        let Some(frame) = robot.get_frame()? else {
            continue;
        };
        let score = frame_sharpness(&frame);
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            best = Some((score, frame));
        }
    }
    Ok(best.map(|(_, frame)| frame))
}
