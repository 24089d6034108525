//! ST7789 TFT Display Driver
//!
//! Blocking driver for 240x320 ST7789 panels over 4-wire SPI. Only solid
//! fills are needed by the face renderer, so there is no frame buffer:
//! each rectangle is an address window followed by a run of one color.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use visage_display::{DisplayError, PixelBackend, Rgb565};

/// Panel dimensions (portrait)
pub const WIDTH: u16 = 240;
pub const HEIGHT: u16 = 320;

/// Pixels sent per SPI write when streaming a fill
const CHUNK_PIXELS: usize = 64;

/// ST7789 commands
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// ST7789 TFT driver
pub struct St7789<SPI, DC, CS, RST> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    initialized: bool,
}

impl<SPI, DC, CS, RST> St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create a new ST7789 driver
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            initialized: false,
        }
    }

    /// Hardware reset and initialization sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.cs.set_high().map_err(|_| DisplayError::Communication)?;
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);

        self.command(cmd::COLMOD, &[0x55])?; // 16 bits per pixel
        self.command(cmd::MADCTL, &[0x00])?; // Portrait, RGB order
        self.command(cmd::INVON, &[])?; // Most modules are wired inverted
        self.command(cmd::NORON, &[])?;
        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(20);

        self.initialized = true;
        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::Communication)?;
        let result = self.command_selected(command, params);
        self.cs.set_high().map_err(|_| DisplayError::Communication)?;
        result
    }

    fn command_selected(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::Communication)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Communication)?;
            self.spi
                .write(params)
                .map_err(|_| DisplayError::Communication)?;
        }
        self.spi.flush().map_err(|_| DisplayError::Communication)
    }

    /// Set the inclusive address window and start a RAM write
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR, &[])
    }

    /// Stream `count` pixels of one color into the current window
    fn write_pixels(&mut self, color: Rgb565, count: u32) -> Result<(), DisplayError> {
        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }

        self.cs.set_low().map_err(|_| DisplayError::Communication)?;
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        let mut remaining = count;
        let mut result = Ok(());
        while remaining > 0 {
            let n = remaining.min(CHUNK_PIXELS as u32);
            if let Err(_e) = self.spi.write(&chunk[..n as usize * 2]) {
                result = Err(DisplayError::Communication);
                break;
            }
            remaining -= n;
        }
        if result.is_ok() {
            result = self.spi.flush().map_err(|_| DisplayError::Communication);
        }
        self.cs.set_high().map_err(|_| DisplayError::Communication)?;
        result
    }
}

impl<SPI, DC, CS, RST> PixelBackend for St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    fn fill(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.fill_rect(0, 0, WIDTH, HEIGHT, color)
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if width == 0 || height == 0 {
            return Ok(());
        }
        let x_end = x
            .checked_add(width)
            .filter(|&end| end <= WIDTH)
            .ok_or(DisplayError::InvalidCoordinates)?;
        let y_end = y
            .checked_add(height)
            .filter(|&end| end <= HEIGHT)
            .ok_or(DisplayError::InvalidCoordinates)?;

        self.set_window(x, y, x_end - 1, y_end - 1)?;
        self.write_pixels(color, u32::from(width) * u32::from(height))
    }

    fn dimensions(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }
}
