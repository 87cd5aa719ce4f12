//! Animation frame data shared by WebP (ANMF) and APNG (fcTL/fdAT)

/// What happens to the frame's area before the next frame is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisposalMethod {
    /// Leave the canvas as is
    #[default]
    None,
    /// Clear the frame area to the background color
    Background,
    /// Restore the area to its state before the frame (APNG only)
    Previous,
}

/// How the frame is combined with the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMethod {
    /// Alpha-blend over the existing canvas
    #[default]
    Blend,
    /// Overwrite the canvas area
    NoBlend,
}

/// One animation frame
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationFrame {
    /// Horizontal offset on the canvas
    pub offset_x: i32,
    /// Vertical offset on the canvas
    pub offset_y: i32,
    /// Frame width in pixels
    pub width: i32,
    /// Frame height in pixels
    pub height: i32,
    /// Display duration in milliseconds
    pub duration_ms: u32,
    /// Disposal method
    pub disposal_method: DisposalMethod,
    /// Blend method
    pub blend_method: BlendMethod,
    /// Encoded frame payload
    pub pixel_data: Vec<u8>,
}

impl AnimationFrame {
    /// Create a frame covering `width × height` at the given offset
    pub fn new(offset_x: i32, offset_y: i32, width: i32, height: i32, duration_ms: u32) -> Self {
        Self {
            offset_x,
            offset_y,
            width,
            height,
            duration_ms,
            ..Default::default()
        }
    }

    /// Set the encoded payload
    pub fn with_pixel_data(mut self, data: Vec<u8>) -> Self {
        self.pixel_data = data;
        self
    }

    /// Right edge (`offset_x + width`), widened so it cannot overflow
    pub fn right(&self) -> i64 {
        self.offset_x as i64 + self.width as i64
    }

    /// Bottom edge (`offset_y + height`), widened so it cannot overflow
    pub fn bottom(&self) -> i64 {
        self.offset_y as i64 + self.height as i64
    }
}
