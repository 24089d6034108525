//! Inter-task communication channels

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use visage_protocol::MAX_REPLY_LEN;

/// Capacity of the received-byte queue
pub const RX_QUEUE_LEN: usize = 512;

/// Encoded reply line
pub type ReplyLine = heapless::String<MAX_REPLY_LEN>;

/// Bytes from the command UART, drained by the face task
pub static RX_BYTES: Channel<CriticalSectionRawMutex, u8, RX_QUEUE_LEN> = Channel::new();

/// Reply lines waiting to go out on the command UART
pub static REPLIES: Channel<CriticalSectionRawMutex, ReplyLine, 4> = Channel::new();
