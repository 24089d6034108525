//! Command link tasks
//!
//! Moves bytes between the command UART and the face task. Received
//! bytes are queued raw; framing happens in the face task so a slow
//! frame never stalls the UART.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use crate::channels::{REPLIES, RX_BYTES};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - queues every received byte for the face task
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    // Waits while the face task is busy (yawn hold)
                    RX_BYTES.send(byte).await;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Link TX task - writes reply lines back to the host
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let line = REPLIES.receive().await;
        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send reply: {:?}", e);
        } else {
            trace!("Reply sent: {}", line.as_str());
        }
    }
}
