//! Rules shared by several formats
//!
//! Each helper appends to a report and never short-circuits, so a record
//! with several problems gets every one of them reported.

use crate::core::clamped::Clamped;
use crate::core::exif::ExifFields;
use crate::core::frame::AnimationFrame;
use crate::validation::options::ValidationOptions;
use crate::validation::report::ValidationReport;

/// Dimensions must be positive and within the format maximum
pub(crate) fn check_dimensions(report: &mut ValidationReport, width: i32, height: i32, max: i64) {
    check_dimension(report, "width", "Width", width, max);
    check_dimension(report, "height", "Height", height, max);
}

fn check_dimension(report: &mut ValidationReport, name: &str, title: &str, value: i32, max: i64) {
    if value <= 0 {
        report.error(format!(
            "Invalid {}: {}. {} must be greater than 0.",
            name, value, title
        ));
    } else if value as i64 > max {
        report.error(format!(
            "Invalid {}: {}. Maximum {} is {}.",
            name, value, name, max
        ));
    }
}

/// A clamped encoder setting must lie within its range
pub(crate) fn check_clamped<const LO: i32, const HI: i32>(
    report: &mut ValidationReport,
    name: &str,
    title: &str,
    value: Clamped<LO, HI>,
) {
    if !value.in_range() {
        report.error(format!(
            "Invalid {}: {}. {} must be between {} and {}.",
            name, value, title, LO, HI
        ));
    }
}

/// An optional resolution must be a positive finite number
pub(crate) fn check_resolution(report: &mut ValidationReport, axis: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !(v.is_finite() && v > 0.0) {
            report.error(format!(
                "Invalid {} resolution: {}. Resolution must be positive.",
                axis, v
            ));
        }
    }
}

/// Range checks for the decoded EXIF / GPS scalars
pub(crate) fn check_exif_ranges(report: &mut ValidationReport, exif: &ExifFields) {
    check_positive(report, "exposure time", "Exposure time", exif.exposure_time);
    check_positive(report, "F-number", "F-number", exif.f_number);
    if let Some(iso) = exif.iso {
        if iso <= 0 {
            report.error(format!(
                "Invalid ISO speed: {}. ISO speed must be positive.",
                iso
            ));
        }
    }
    check_positive(report, "focal length", "Focal length", exif.focal_length);
    if let Some(orientation) = exif.orientation {
        if !(1..=8).contains(&orientation) {
            report.error(format!(
                "Invalid orientation: {}. Orientation must be between 1 and 8.",
                orientation
            ));
        }
    }
    if let Some(lat) = exif.gps_latitude {
        if !(-90.0..=90.0).contains(&lat) {
            report.error(format!(
                "Invalid GPS latitude: {}. Latitude must be between -90 and 90.",
                lat
            ));
        }
    }
    if let Some(lon) = exif.gps_longitude {
        if !(-180.0..=180.0).contains(&lon) {
            report.error(format!(
                "Invalid GPS longitude: {}. Longitude must be between -180 and 180.",
                lon
            ));
        }
    }
    if let Some(alt) = exif.gps_altitude {
        if !alt.is_finite() {
            report.error(format!(
                "Invalid GPS altitude: {}. Altitude must be a finite number.",
                alt
            ));
        }
    }
}

fn check_positive(report: &mut ValidationReport, name: &str, title: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !(v.is_finite() && v > 0.0) {
            report.error(format!("Invalid {}: {}. {} must be positive.", name, v, title));
        }
    }
}

/// Advisory checks for the decoded EXIF / GPS scalars
pub(crate) fn check_exif_advisory(report: &mut ValidationReport, exif: &ExifFields) {
    match (exif.gps_latitude, exif.gps_longitude) {
        (Some(_), None) => report.warning("GPS latitude is set without a longitude."),
        (None, Some(_)) => report.warning("GPS longitude is set without a latitude."),
        _ => {}
    }
}

/// Warn on very large images
pub(crate) fn check_resolution_advisory(
    report: &mut ValidationReport,
    pixel_count: u64,
    x_dpi: Option<f64>,
    y_dpi: Option<f64>,
    options: &ValidationOptions,
) {
    if pixel_count > options.max_pixel_count {
        report.warning(format!(
            "Very high resolution image: {} pixels exceeds {}.",
            pixel_count, options.max_pixel_count
        ));
    }
    let dpi = x_dpi.unwrap_or(0.0).max(y_dpi.unwrap_or(0.0));
    if dpi > options.high_dpi {
        report.warning(format!(
            "Very high print resolution: {} DPI exceeds {}.",
            dpi, options.high_dpi
        ));
    }
}

/// Frame geometry and timing rules
///
/// Geometry problems are errors; zero-duration frames are warnings.
pub(crate) fn check_frames(
    report: &mut ValidationReport,
    frames: &[AnimationFrame],
    canvas_width: i32,
    canvas_height: i32,
) {
    for (index, frame) in frames.iter().enumerate() {
        if frame.width <= 0 || frame.height <= 0 {
            report.error(format!(
                "Animation frame {} has invalid dimensions: {}x{}.",
                index, frame.width, frame.height
            ));
        }
        if frame.offset_x < 0 || frame.offset_y < 0 {
            report.error(format!(
                "Animation frame {} has negative offset ({}, {}).",
                index, frame.offset_x, frame.offset_y
            ));
        }
        if frame.right() > canvas_width as i64 || frame.bottom() > canvas_height as i64 {
            report.error(format!(
                "Animation frame {} exceeds canvas bounds: offset ({}, {}) with size {}x{} does not fit in {}x{}.",
                index,
                frame.offset_x,
                frame.offset_y,
                frame.width,
                frame.height,
                canvas_width,
                canvas_height
            ));
        }
        if frame.duration_ms == 0 {
            report.warning(format!("Animation frame {} has zero duration.", index));
        }
    }
}
