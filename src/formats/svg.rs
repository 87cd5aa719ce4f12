//! SVG metadata record
//!
//! Unlike the raster formats, an SVG record is usually filled from the
//! document itself with [`SvgMetadata::from_xml`], which scans the markup
//! once with quick-xml and keeps only structural counts and descriptive
//! attributes.

use std::collections::BTreeMap;
use std::fmt;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::base::MetadataCore;
use crate::core::error::{MetaError, MetaResult};
use crate::core::format::ImageFormat;
use crate::core::record::{FieldGroup, MetadataRecord};
use crate::core::size::SizeEstimate;
use crate::validation::{Validate, ValidationOptions, ValidationReport};

/// SVG namespace
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Relative aspect-ratio difference tolerated before warning
const ASPECT_TOLERANCE: f64 = 0.01;

/// The `viewBox` attribute
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewBox {
    /// Left edge in user units
    pub min_x: f64,
    /// Top edge in user units
    pub min_y: f64,
    /// Width in user units
    pub width: f64,
    /// Height in user units
    pub height: f64,
}

impl ViewBox {
    /// Create a view box from its four components
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Parse `min-x min-y width height`, separated by whitespace and/or commas
    pub fn parse(value: &str) -> Option<Self> {
        let numbers = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()?;
        match numbers.as_slice() {
            [x, y, w, h] => Some(Self::new(*x, *y, *w, *h)),
            _ => None,
        }
    }

    /// Whether width and height are positive finite numbers
    pub fn has_positive_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// SVG metadata record
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvgMetadata {
    /// Shared fields; width and height come from the root attributes
    pub core: MetadataCore,
    /// Root `viewBox`, when present and well formed
    pub view_box: Option<ViewBox>,
    /// Root `preserveAspectRatio`, as written
    pub preserve_aspect_ratio: Option<String>,
    /// Number of elements, root included
    pub element_count: usize,
    /// Number of `<path>` elements
    pub path_count: usize,
    /// Total length of all `d` attributes
    pub path_data_length: u64,
    /// Deepest element nesting, the root being 1
    pub max_depth: usize,
    /// A `<script>` element or an `on*` event attribute is present
    pub has_script: bool,
    /// Decoded size of `data:image/*` URIs
    pub embedded_raster_bytes: u64,
    /// Text of the root's `<title>` child
    pub title: Option<String>,
    /// Declared namespaces, prefix to URI (the default namespace has an
    /// empty prefix)
    pub namespaces: BTreeMap<String, String>,
}

impl SvgMetadata {
    /// Create a record with explicit dimensions
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            core: MetadataCore::with_dimensions(width, height),
            ..Default::default()
        }
    }

    /// Scan an SVG document
    ///
    /// # Errors
    ///
    /// [`MetaError::ParseError`] when the markup is malformed or the root
    /// element is not `<svg>`.
    pub fn from_xml(xml: &str) -> MetaResult<Self> {
        let mut reader = Reader::from_str(xml);

        let mut svg = SvgMetadata::default();
        let mut depth = 0usize;
        let mut in_title = false;
        let mut seen_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    depth += 1;
                    svg.visit_element(&e, depth, &mut seen_root)?;
                    in_title =
                        depth == 2 && svg.title.is_none() && e.local_name().as_ref() == b"title";
                    if in_title {
                        svg.title = Some(String::new());
                    }
                }
                Ok(Event::Empty(e)) => {
                    svg.visit_element(&e, depth + 1, &mut seen_root)?;
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                    in_title = false;
                }
                Ok(Event::Text(e)) if in_title => {
                    let raw_text = String::from_utf8_lossy(e.as_ref());
                    let text = match unescape(&raw_text) {
                        Ok(text) => text.to_string(),
                        Err(_) => raw_text.to_string(),
                    };
                    svg.push_title(&text);
                }
                Ok(Event::CData(e)) if in_title => {
                    svg.push_title(&String::from_utf8_lossy(&e));
                }
                Ok(Event::GeneralRef(e)) if in_title => {
                    let name = String::from_utf8_lossy(&e);
                    svg.push_title(&resolve_reference(&name));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(MetaError::ParseError(format!("SVG parsing error: {}", e)));
                }
                _ => {}
            }
        }

        // fragments are joined untrimmed so spaces around entities survive
        svg.title = svg
            .title
            .take()
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty());

        if !seen_root {
            return Err(MetaError::ParseError("No <svg> element found".to_string()));
        }
        log::trace!(
            "Scanned SVG: {} elements, {} paths, depth {}",
            svg.element_count,
            svg.path_count,
            svg.max_depth
        );
        Ok(svg)
    }

    fn push_title(&mut self, text: &str) {
        self.title.get_or_insert_with(String::new).push_str(text);
    }

    fn visit_element(
        &mut self,
        e: &BytesStart<'_>,
        depth: usize,
        seen_root: &mut bool,
    ) -> MetaResult<()> {
        let local = e.local_name();
        let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
        let attrs = collect_attributes(e);

        if !*seen_root {
            if name != "svg" {
                return Err(MetaError::ParseError(format!(
                    "Root element is <{}>, expected <svg>",
                    name
                )));
            }
            *seen_root = true;
            self.read_root_attributes(&attrs);
        }

        self.element_count += 1;
        self.max_depth = self.max_depth.max(depth);

        match name {
            "path" => {
                self.path_count += 1;
                if let Some((_, d)) = attrs.iter().find(|(k, _)| k == "d") {
                    self.path_data_length += d.len() as u64;
                }
            }
            "script" => self.has_script = true,
            "image" => {
                for (key, value) in &attrs {
                    if key == "href" || key.ends_with(":href") {
                        self.embedded_raster_bytes += data_uri_size(value);
                    }
                }
            }
            _ => {}
        }
        if attrs.iter().any(|(k, _)| is_event_attribute(k)) {
            self.has_script = true;
        }
        Ok(())
    }

    fn read_root_attributes(&mut self, attrs: &[(String, String)]) {
        for (key, value) in attrs {
            match key.as_str() {
                "width" => self.core.width = parse_length(value).unwrap_or(0),
                "height" => self.core.height = parse_length(value).unwrap_or(0),
                "viewBox" => self.view_box = ViewBox::parse(value),
                "preserveAspectRatio" => self.preserve_aspect_ratio = Some(value.clone()),
                "xmlns" => {
                    self.namespaces.insert(String::new(), value.clone());
                }
                _ => {
                    if let Some(prefix) = key.strip_prefix("xmlns:") {
                        self.namespaces.insert(prefix.to_string(), value.clone());
                    }
                }
            }
        }
    }

    /// Whether both dimensions are set explicitly
    pub fn has_dimensions(&self) -> bool {
        self.core.width > 0 && self.core.height > 0
    }

    fn check_ranges(&self, report: &mut ValidationReport) {
        if self.view_box.is_none() && !self.has_dimensions() {
            report.error("SVG requires width and height or a viewBox.");
        }
        for (name, title, value) in [
            ("width", "Width", self.core.width),
            ("height", "Height", self.core.height),
        ] {
            if value < 0 {
                report.error(format!(
                    "Invalid {}: {}. {} must not be negative.",
                    name, value, title
                ));
            }
        }
    }

    fn check_structure(&self, report: &mut ValidationReport) {
        if let Some(view_box) = &self.view_box {
            if !view_box.has_positive_size() {
                report.error(format!(
                    "Invalid viewBox size: {}x{}. Width and height must be positive.",
                    view_box.width, view_box.height
                ));
            }
        }
    }

    fn check_advisory(&self, report: &mut ValidationReport, options: &ValidationOptions) {
        if let Some(view_box) = self.view_box.filter(|v| v.has_positive_size()) {
            if self.has_dimensions() {
                let ratio = self.core.width as f64 / self.core.height as f64;
                let expected = view_box.width / view_box.height;
                if ((ratio - expected) / expected).abs() > ASPECT_TOLERANCE {
                    let effect = if self.preserve_aspect_ratio.as_deref() == Some("none") {
                        "stretched"
                    } else {
                        "letterboxed"
                    };
                    report.warning(format!(
                        "Aspect ratio of {}x{} differs from viewBox {}x{}; content will be {}.",
                        self.core.width, self.core.height, view_box.width, view_box.height, effect
                    ));
                }
            }
        }
        if self.has_script {
            report.warning("SVG contains script content.");
        }
        if self.element_count > options.max_svg_elements {
            report.warning(format!(
                "SVG has {} elements, above the advisory limit of {}.",
                self.element_count, options.max_svg_elements
            ));
        }
    }
}

/// Collect attributes with entity-decoded values
fn collect_attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let raw_value = String::from_utf8_lossy(attr.value.as_ref());
            let value = match unescape(&raw_value) {
                Ok(unescaped) => unescaped.to_string(),
                Err(_) => raw_value.to_string(),
            };
            (key, value)
        })
        .collect()
}

/// Parse a user-unit or `px` length; other units and percentages yield `None`
/// Text for an `&name;` reference: a predefined entity or a character
/// reference, otherwise the reference as written
fn resolve_reference(name: &str) -> String {
    if let Some(text) = resolve_predefined_entity(name) {
        return text.to_string();
    }
    let code = match name.strip_prefix('#') {
        Some(hex) if hex.starts_with('x') || hex.starts_with('X') => {
            u32::from_str_radix(&hex[1..], 16).ok()
        }
        Some(dec) => dec.parse::<u32>().ok(),
        None => None,
    };
    match code.and_then(char::from_u32) {
        Some(c) => c.to_string(),
        None => format!("&{};", name),
    }
}

fn parse_length(value: &str) -> Option<i32> {
    let number = value.trim().trim_end_matches("px");
    let parsed = number.parse::<f64>().ok()?;
    if parsed.is_finite() && parsed >= 0.0 && parsed <= i32::MAX as f64 {
        Some(parsed.round() as i32)
    } else {
        None
    }
}

/// Decoded byte size of a base64 `data:image/*` URI, 0 for anything else
fn data_uri_size(value: &str) -> u64 {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return 0;
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return 0;
    };
    if header.ends_with(";base64") {
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        ((payload.len() / 4) * 3).saturating_sub(padding) as u64
    } else {
        payload.len() as u64
    }
}

fn is_event_attribute(key: &str) -> bool {
    key.len() > 2 && key.starts_with("on")
}

impl MetadataRecord for SvgMetadata {
    fn format(&self) -> ImageFormat {
        ImageFormat::Svg
    }

    fn core(&self) -> &MetadataCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MetadataCore {
        &mut self.core
    }

    fn estimated_size(&self) -> u64 {
        SizeEstimate::new()
            .fixed(self.core.estimated_size())
            .string(self.title.as_deref())
            .string(self.preserve_aspect_ratio.as_deref())
            .string_map(&self.namespaces)
            .finish()
    }

    fn clear_group(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::IccProfile | FieldGroup::Exif | FieldGroup::Xmp => {}
            FieldGroup::Collections => self.namespaces.clear(),
            FieldGroup::Scalars => *self = Self::default(),
        }
    }
}

impl Validate for SvgMetadata {
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_ranges(&mut report);
        self.check_structure(&mut report);
        self.check_advisory(&mut report, options);
        report
    }
}
