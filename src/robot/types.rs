//! Shared value types for robot commands and camera frames.

use anyhow::{ensure, Result};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

/// Antenna deflection limit in radians.
pub const ANTENNA_LIMIT_RAD: f64 = 3.14;

/// Six-degree-of-freedom head target, relative to neutral.
///
/// Position offsets in millimeters, rotations in degrees. Always fully
/// specified: unset axes default to zero, never undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl HeadPose {
    /// Neutral pose (all axes zero).
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn with_yaw(yaw: f64) -> Self {
        Self {
            yaw,
            ..Self::default()
        }
    }
}

/// Pair of antenna angles (right, left) in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AntennaTarget {
    pub right: f64,
    pub left: f64,
}

impl AntennaTarget {
    pub fn new(right: f64, left: f64) -> Self {
        Self { right, left }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Clamp both angles to the physical range. Values already in range
    /// (including exactly ±3.14) pass through unchanged.
    pub fn clamped(self) -> Self {
        Self {
            right: self.right.clamp(-ANTENNA_LIMIT_RAD, ANTENNA_LIMIT_RAD),
            left: self.left.clamp(-ANTENNA_LIMIT_RAD, ANTENNA_LIMIT_RAD),
        }
    }
}

/// One atomic motion command: head pose and/or antenna target, over a
/// duration in seconds (must be > 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    pub head: Option<HeadPose>,
    pub antennas: Option<AntennaTarget>,
    pub duration: f64,
}

impl MotionCommand {
    pub fn head(pose: HeadPose, duration: f64) -> Self {
        Self {
            head: Some(pose),
            antennas: None,
            duration,
        }
    }

    pub fn antennas(target: AntennaTarget, duration: f64) -> Self {
        Self {
            head: None,
            antennas: Some(target),
            duration,
        }
    }

    pub fn both(pose: HeadPose, target: AntennaTarget, duration: f64) -> Self {
        Self {
            head: Some(pose),
            antennas: Some(target),
            duration,
        }
    }
}

/// One camera capture: height x width x 3 channels, BGR byte order.
///
/// Ephemeral; owned by the caller for the duration of one processing step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        ensure!(
            data.len() == (width as usize) * (height as usize) * 3,
            "frame buffer size {} does not match {width}x{height}x3",
            data.len()
        );
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert BGR to a single-channel luma buffer (ITU-R BT.601 weights).
    pub fn to_luma(&self) -> Vec<u8> {
        self.data
            .chunks_exact(3)
            .map(|bgr| {
                let (b, g, r) = (f32::from(bgr[0]), f32::from(bgr[1]), f32::from(bgr[2]));
                (0.114 * b + 0.587 * g + 0.299 * r).round().min(255.0) as u8
            })
            .collect()
    }

    /// Downscale the luma plane by `factor` (e.g. 0.25). Returns the scaled
    /// buffer with its dimensions.
    pub fn downscaled_luma(&self, factor: f64) -> (Vec<u8>, u32, u32) {
        let gray = GrayImage::from_raw(self.width, self.height, self.to_luma())
            .expect("luma buffer matches frame dimensions");
        let w = ((f64::from(self.width) * factor).round() as u32).max(1);
        let h = ((f64::from(self.height) * factor).round() as u32).max(1);
        let small = imageops::resize(&gray, w, h, FilterType::Triangle);
        (small.into_raw(), w, h)
    }

    /// Encode as JPEG at the given quality (1..=100).
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let rgb: Vec<u8> = self
            .data
            .chunks_exact(3)
            .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
            .collect();
        let img = RgbImage::from_raw(self.width, self.height, rgb)
            .expect("rgb buffer matches frame dimensions");
        let mut out = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
        encoder.encode_image(&img)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antenna_clamp_caps_out_of_range() {
        let t = AntennaTarget::new(5.0, -4.0).clamped();
        assert_eq!(t.right, 3.14);
        assert_eq!(t.left, -3.14);
    }

    #[test]
    fn antenna_clamp_passes_boundary_unchanged() {
        let t = AntennaTarget::new(3.14, -3.14).clamped();
        assert_eq!(t.right, 3.14);
        assert_eq!(t.left, -3.14);
    }

    #[test]
    fn antenna_clamp_passes_in_range_unchanged() {
        let t = AntennaTarget::new(0.6, -0.6).clamped();
        assert_eq!(t.right, 0.6);
        assert_eq!(t.left, -0.6);
    }

    #[test]
    fn head_pose_defaults_to_neutral() {
        let p = HeadPose::neutral();
        assert_eq!(p, HeadPose::default());
        assert_eq!(p.yaw, 0.0);
    }

    #[test]
    fn frame_rejects_wrong_buffer_size() {
        assert!(Frame::new(4, 4, vec![0; 10]).is_err());
        assert!(Frame::new(4, 4, vec![0; 48]).is_ok());
    }

    #[test]
    fn luma_is_one_byte_per_pixel() {
        let frame = Frame::new(8, 4, vec![128; 8 * 4 * 3]).unwrap();
        let luma = frame.to_luma();
        assert_eq!(luma.len(), 32);
        // Uniform gray input stays uniform gray.
        assert!(luma.iter().all(|&v| v == 128));
    }

    #[test]
    fn downscale_quarters_dimensions() {
        let frame = Frame::new(64, 48, vec![0; 64 * 48 * 3]).unwrap();
        let (buf, w, h) = frame.downscaled_luma(0.25);
        assert_eq!((w, h), (16, 12));
        assert_eq!(buf.len(), 16 * 12);
    }

    #[test]
    fn jpeg_encode_produces_jpeg_magic() {
        let frame = Frame::new(16, 16, vec![200; 16 * 16 * 3]).unwrap();
        let jpeg = frame.to_jpeg(90).unwrap();
        assert!(jpeg.starts_with(&[0xFF, 0xD8, 0xFF]));
    }
}
