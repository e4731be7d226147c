#![deny(missing_docs, missing_debug_implementations)]

//! Implementation of the AMQP 1.0 data types: definitions (part 2.8), the
//! link-visible performatives (part 2.7), and the messaging types the link
//! layer touches (part 3).
//!
//! Performatives decode from the untyped field lists produced by the frame
//! decoder and encode back to described-list wire form through
//! [`ferrite_amqp_codec`].

pub mod composite;
pub mod definitions;
pub mod messaging;
pub mod performatives;
pub mod states;

pub use states::SessionState;
