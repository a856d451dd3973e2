use crate::{Position, RecorderError, Result};
use image::RgbaImage;

/// A rectangular screen region in global screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Square box of side `2 * radius` centered on `position`, clamped to
    /// non-negative origin coordinates.
    pub fn around(position: Position, radius: u32) -> Self {
        let r = radius as i32;
        Self {
            left: (position.x - r).max(0),
            top: (position.y - r).max(0),
            width: radius * 2,
            height: radius * 2,
        }
    }
}

/// Contract for the screenshot primitive: given optional region bounds,
/// return a raster image of the screen; given none, the full primary screen.
pub trait CaptureProvider: Send + Sync {
    fn capture(&self, region: Option<CaptureRegion>) -> Result<RgbaImage>;
}

/// Capture provider backed by `xcap`.
pub struct ScreenCapture;

impl ScreenCapture {
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> Result<xcap::Monitor> {
        let monitors = xcap::Monitor::all()
            .map_err(|e| RecorderError::Capture(format!("Failed to get monitors: {}", e)))?;
        for monitor in monitors {
            match monitor.is_primary() {
                Ok(true) => return Ok(monitor),
                Ok(false) => continue,
                Err(e) => {
                    return Err(RecorderError::Capture(format!(
                        "Error checking monitor primary status: {}",
                        e
                    )));
                }
            }
        }
        Err(RecorderError::Capture(
            "Could not find primary monitor".to_string(),
        ))
    }

    fn capture_region(region: CaptureRegion) -> Result<RgbaImage> {
        // Resolve the monitor containing the region's center; cross-monitor
        // boxes are clamped to that monitor's bounds (best effort).
        let cx = region.left + region.width as i32 / 2;
        let cy = region.top + region.height as i32 / 2;
        let monitor = match xcap::Monitor::from_point(cx, cy) {
            Ok(monitor) => monitor,
            Err(_) => Self::primary_monitor()?,
        };

        let mon_x = monitor
            .x()
            .map_err(|e| RecorderError::Capture(format!("Failed to get monitor origin: {}", e)))?;
        let mon_y = monitor
            .y()
            .map_err(|e| RecorderError::Capture(format!("Failed to get monitor origin: {}", e)))?;
        let image = monitor
            .capture_image()
            .map_err(|e| RecorderError::Capture(format!("Failed to capture screen: {}", e)))?;

        // Translate into the monitor's local pixel space and clamp.
        let local_x = (region.left - mon_x).max(0) as u32;
        let local_y = (region.top - mon_y).max(0) as u32;
        if local_x >= image.width() || local_y >= image.height() {
            return Err(RecorderError::Capture(format!(
                "Capture region ({}, {}) lies outside the monitor",
                region.left, region.top
            )));
        }
        let width = region.width.min(image.width() - local_x);
        let height = region.height.min(image.height() - local_y);

        Ok(image::imageops::crop_imm(&image, local_x, local_y, width, height).to_image())
    }
}

impl Default for ScreenCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureProvider for ScreenCapture {
    fn capture(&self, region: Option<CaptureRegion>) -> Result<RgbaImage> {
        match region {
            None => Self::primary_monitor()?
                .capture_image()
                .map_err(|e| RecorderError::Capture(format!("Failed to capture screen: {}", e))),
            Some(region) => Self::capture_region(region),
        }
    }
}
