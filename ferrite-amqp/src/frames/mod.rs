//! AMQP frame decoding

mod amqp;
mod error;

pub use amqp::{decode_frame, decode_header, Frame, HeaderFrame};
pub use error::FrameError;
