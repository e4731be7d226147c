#![deny(missing_docs, missing_debug_implementations)]

//! Decoder and encoder for the AMQP 1.0 type system.
//!
//! The decoder is a pure, stateless dispatch table over the 8-bit format
//! code: given a window positioned at a constructor byte, [`decode_value`]
//! returns the decoded [`Value`] and the remaining window. The encoder is
//! symmetric; [`encode_value`] and [`to_vec`] write the smallest wire
//! encoding that carries the value.
//!
//! ```rust
//! use ferrite_amqp_codec::{decode_value, to_vec, Value};
//!
//! let buf = to_vec(&Value::UInt(13)).unwrap();
//! let (value, rest) = decode_value(&buf).unwrap();
//! assert_eq!(value, Value::UInt(13));
//! assert!(rest.is_empty());
//! ```
//!
//! # Primitive types
//!
//! All primitive types of the AMQP 1.0 core specification part 1.6 that the
//! decoder dispatches on can be found in mod [`primitives`]. The `char` and
//! decimal families are deliberately not part of the table; their codes
//! decode to [`Error::InvalidFormatCode`].
//!
//! # Described types
//!
//! A described value pairs a descriptor with a wrapped value
//! ([`Described`]). On decode, descriptors naming the delivery outcomes
//! (codes 35 through 39) are projected to a single-entry map keyed
//! `received` / `accepted` / `rejected` / `released` / `modified`; any other
//! descriptor is discarded and the inner value returned as-is.

mod decode;
pub mod described;
mod encode;
mod error;
mod format_code;
pub mod primitives;
mod value;

pub use decode::{decode_value, MAX_NESTING_DEPTH};
pub use described::Described;
pub use encode::{encode_value, to_vec};
pub use error::Error;
pub use format_code::FormatCode;
pub use value::Value;
