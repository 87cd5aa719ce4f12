//! Camera and GPS scalar fields
//!
//! These are the decoded EXIF values a pipeline usually cares about.
//! The raw EXIF payload, when present, lives next to them as a blob on the
//! format record.

use chrono::{DateTime, Utc};

use crate::core::size::SizeEstimate;

/// Decoded EXIF / GPS scalars
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExifFields {
    /// Camera manufacturer
    pub camera_make: Option<String>,
    /// Camera model
    pub camera_model: Option<String>,
    /// Lens model
    pub lens_model: Option<String>,
    /// Exposure time in seconds
    pub exposure_time: Option<f64>,
    /// Aperture F-number
    pub f_number: Option<f64>,
    /// ISO speed rating
    pub iso: Option<i32>,
    /// Focal length in millimetres
    pub focal_length: Option<f64>,
    /// EXIF orientation (1-8)
    pub orientation: Option<i32>,
    /// When the picture was taken
    pub date_time_original: Option<DateTime<Utc>>,
    /// GPS latitude in decimal degrees
    pub gps_latitude: Option<f64>,
    /// GPS longitude in decimal degrees
    pub gps_longitude: Option<f64>,
    /// GPS altitude in metres
    pub gps_altitude: Option<f64>,
}

impl ExifFields {
    /// Whether any GPS coordinate is set
    pub fn has_gps(&self) -> bool {
        self.gps_latitude.is_some() || self.gps_longitude.is_some()
    }

    /// Set latitude and longitude together
    pub fn set_gps(&mut self, latitude: f64, longitude: f64) {
        self.gps_latitude = Some(latitude);
        self.gps_longitude = Some(longitude);
    }

    /// Estimated bytes held by the string fields
    pub fn estimated_size(&self) -> u64 {
        SizeEstimate::new()
            .string(self.camera_make.as_deref())
            .string(self.camera_model.as_deref())
            .string(self.lens_model.as_deref())
            .finish()
    }

    /// Reset every field to unset
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
