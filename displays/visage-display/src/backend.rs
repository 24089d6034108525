//! Pixel backend trait
//!
//! Defines the interface the renderer paints through. The firmware
//! implements it over an SPI TFT driver; tests implement it over a
//! recording buffer.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Rectangle outside the panel
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// 16-bit RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565::from_rgb(0, 0, 0);
    pub const WHITE: Rgb565 = Rgb565::from_rgb(255, 255, 255);
    pub const RED: Rgb565 = Rgb565::from_rgb(255, 0, 0);

    /// Pack 8-bit channels, dropping the low bits
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u16 & 0xF8) << 8) | ((green as u16 & 0xFC) << 3) | (blue as u16 >> 3))
    }

    /// Big-endian bytes as the panel expects them on the wire
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

/// Pixel-addressed display backend
///
/// Provides a hardware-agnostic interface for solid fills. Coordinates
/// are in panel pixels with the origin at the top-left corner.
pub trait PixelBackend {
    /// Fill the whole panel
    fn fill(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), DisplayError>;

    /// Panel size in pixels (width, height)
    fn dimensions(&self) -> (u16, u16);
}
