//! Visage - Pixel Face Firmware
//!
//! Main firmware binary for RP2040 boards driving a 12x12 pixel face on
//! an ST7789 panel. Commands arrive as text lines on UART0; replies go
//! back on the same link.
//!
//! Pin assignments:
//! - UART0: TX GPIO0, RX GPIO1 (115200 baud)
//! - SPI1: SCK GPIO10, MOSI GPIO11
//! - Panel: DC GPIO8, CS GPIO9, RST GPIO12, backlight GPIO13

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{SPI1, UART0};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::Delay;
use static_cell::StaticCell;
use visage_display::RenderDiff;
use {defmt_rtt as _, panic_probe as _};

use crate::st7789::St7789;

mod channels;
mod config;
mod st7789;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Concrete panel type owned by the face task
pub type Panel = St7789<
    Spi<'static, SPI1, Blocking>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
>;

/// SPI clock for the panel
const SPI_FREQUENCY_HZ: u32 = 62_500_000;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Visage firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Command link
    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();

    info!("UART initialized for command link");

    // Panel
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let dc = Output::new(p.PIN_8, Level::Low);
    let cs = Output::new(p.PIN_9, Level::High);
    let rst = Output::new(p.PIN_12, Level::High);
    let mut backlight = Output::new(p.PIN_13, Level::Low);

    let mut panel = St7789::new(spi, dc, cs, rst);
    if let Err(e) = panel.init(&mut Delay) {
        error!("Failed to initialize panel: {:?}", e);
    } else {
        backlight.set_high();
        info!("Panel initialized");
    }

    let layout = config::layout();
    if !layout.fits() {
        warn!("Face grid of {} px cells does not fit the panel", layout.cell_size);
    }
    let display = RenderDiff::new(panel, layout);

    // Backlight stays on for the life of the firmware
    core::mem::forget(backlight);

    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::face_task(display)).unwrap();

    info!("All tasks spawned");
}
