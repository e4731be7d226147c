#![deny(missing_docs, missing_debug_implementations)]

//! Client-side core of the AMQP 1.0 protocol.
//!
//! Two pieces live here: the frame decoder, which interprets the outer
//! described-type envelope of AMQP frames and lifts them to typed
//! performatives, and the link state machine, which drives attach/detach
//! handshakes, credit-based flow control, and delivery bookkeeping inside a
//! session.
//!
//! Transport, SASL, TLS, and the session/connection endpoints are outside
//! this crate. A link talks to its session through two narrow surfaces: a
//! bounded [`tokio::sync::mpsc`] queue of outgoing [`link::LinkFrame`]s, and
//! [`SessionState`] change notifications delivered by the session's event
//! loop.
//!
//! ```rust
//! use ferrite_amqp::link::{Builder, LinkFrame};
//! use ferrite_amqp_types::SessionState;
//! use tokio::sync::mpsc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (tx, mut rx) = mpsc::channel(16);
//! let mut sender = Builder::new("q1", "q1")
//!     .name("sender-link-1")
//!     .build_sender(0, tx);
//!
//! // the session reports MAPPED; the link opens the attach handshake
//! sender.on_session_state_change(SessionState::Mapped).await.unwrap();
//! assert!(matches!(rx.recv().await, Some(LinkFrame::Attach(_))));
//! # }
//! ```

pub mod frames;
pub mod link;

pub use ferrite_amqp_types::SessionState;

/// Type alias for the transfer payload bytes
pub type Payload = bytes::Bytes;
