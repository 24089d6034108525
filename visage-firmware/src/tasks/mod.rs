//! Embassy tasks

pub mod face;
pub mod link;

pub use face::face_task;
pub use link::{link_rx_task, link_tx_task};
