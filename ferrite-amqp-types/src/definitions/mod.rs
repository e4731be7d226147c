//! Types defined in AMQP 1.0 specification Part 2.8: Definitions

use ferrite_amqp_codec::{
    primitives::{OrderedMap, Symbol, UInt},
    Value,
};

/// 2.8.1 Role
mod role;
pub use role::Role;

/// 2.8.2 Sender Settle Mode
mod snd_settle_mode;
pub use snd_settle_mode::SenderSettleMode;

/// 2.8.3 Receiver Settle Mode
mod rcv_settle_mode;
pub use rcv_settle_mode::ReceiverSettleMode;

/// 2.8.4 Handle
///
/// An unsigned 32-bit number identifying one link endpoint within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub UInt);

impl Default for Handle {
    fn default() -> Self {
        Handle(u32::MAX)
    }
}

impl From<UInt> for Handle {
    fn from(val: UInt) -> Self {
        Self(val)
    }
}

impl From<Handle> for UInt {
    fn from(val: Handle) -> Self {
        val.0
    }
}

impl From<Handle> for Value {
    fn from(val: Handle) -> Self {
        Value::UInt(val.0)
    }
}

impl TryFrom<Value> for Handle {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Handle)
    }
}

/// 2.8.5 Seconds
pub type Seconds = UInt;

/// 2.8.6 Milliseconds
pub type Milliseconds = UInt;

/// 2.8.7 Delivery Tag
///
/// A delivery-tag can be up to 32 octets of binary data
pub type DeliveryTag = bytes::Bytes;

/// 2.8.8 Delivery Number
pub type DeliveryNumber = SequenceNo;

/// 2.8.9 Transfer Number
pub type TransferNumber = SequenceNo;

/// 2.8.10 Sequence No
pub type SequenceNo = UInt;

/// 2.8.11 Message Format
pub type MessageFormat = UInt;

/// 2.8.13 Fields
pub type Fields = OrderedMap<Symbol, Value>;

/// Converts a decoded map into [`Fields`].
///
/// The decoder yields symbol or string keys depending on the peer's
/// encoding choice; both are accepted.
pub fn fields_from_value(value: Value) -> Result<Fields, Value> {
    let map = match value {
        Value::Map(map) => map,
        other => return Err(other),
    };
    let mut fields = Fields::with_capacity(map.len());
    for (key, val) in map {
        let key = match key {
            Value::Symbol(sym) => sym,
            Value::String(s) => Symbol::from(s),
            other => return Err(other),
        };
        fields.insert(key, val);
    }
    Ok(fields)
}

/// Converts [`Fields`] into an encodable map value.
pub fn fields_to_value(fields: &Fields) -> Value {
    let map = fields
        .iter()
        .map(|(k, v)| (Value::Symbol(k.clone()), v.clone()))
        .collect();
    Value::Map(map)
}

/// 2.8.14 Error
mod error;
pub use error::Error;

mod error_cond;
pub use error_cond::ErrorCondition;

/// 2.8.15 AMQP Error
mod amqp_error;
pub use amqp_error::AmqpError;

/// 2.8.18 Link Error
mod link_error;
pub use link_error::LinkError;
