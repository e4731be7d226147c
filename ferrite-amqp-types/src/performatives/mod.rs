//! Types defined in AMQP 1.0 specification Part 2.7: Performatives
//!
//! Each performative is a described list composite. Decoding starts from
//! the untyped field list the frame decoder produces; encoding goes back to
//! the described-list wire form.

use ferrite_amqp_codec::Value;

use crate::composite::CompositeError;

mod attach;
mod detach;
mod disposition;
mod flow;
mod transfer;

pub use attach::Attach;
pub use detach::Detach;
pub use disposition::Disposition;
pub use flow::Flow;
pub use transfer::Transfer;

/// amqp:open:list descriptor code
pub const OPEN_CODE: u8 = 0x10;
/// amqp:begin:list descriptor code
pub const BEGIN_CODE: u8 = 0x11;
/// amqp:attach:list descriptor code
pub const ATTACH_CODE: u8 = 0x12;
/// amqp:flow:list descriptor code
pub const FLOW_CODE: u8 = 0x13;
/// amqp:transfer:list descriptor code
pub const TRANSFER_CODE: u8 = 0x14;
/// amqp:disposition:list descriptor code
pub const DISPOSITION_CODE: u8 = 0x15;
/// amqp:detach:list descriptor code
pub const DETACH_CODE: u8 = 0x16;
/// amqp:end:list descriptor code
pub const END_CODE: u8 = 0x17;
/// amqp:close:list descriptor code
pub const CLOSE_CODE: u8 = 0x18;

/// A decoded performative.
///
/// The link-visible performatives are fully typed. Open, Begin, End, and
/// Close belong to the connection and session endpoints; their field lists
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Performative {
    /// Attach performative
    Attach(Attach),

    /// Flow performative
    Flow(Flow),

    /// Transfer performative (payload travels beside it)
    Transfer(Transfer),

    /// Disposition performative
    Disposition(Disposition),

    /// Detach performative
    Detach(Detach),

    /// Open performative, untyped
    Open(Vec<Value>),

    /// Begin performative, untyped
    Begin(Vec<Value>),

    /// End performative, untyped
    End(Vec<Value>),

    /// Close performative, untyped
    Close(Vec<Value>),
}

impl Performative {
    /// Builds a performative from a frame's descriptor code and decoded
    /// field list.
    pub fn try_from_parts(code: u8, fields: Vec<Value>) -> Result<Self, CompositeError> {
        match code {
            ATTACH_CODE => Attach::try_from_fields(fields).map(Self::Attach),
            FLOW_CODE => Flow::try_from_fields(fields).map(Self::Flow),
            TRANSFER_CODE => Transfer::try_from_fields(fields).map(Self::Transfer),
            DISPOSITION_CODE => Disposition::try_from_fields(fields).map(Self::Disposition),
            DETACH_CODE => Detach::try_from_fields(fields).map(Self::Detach),
            OPEN_CODE => Ok(Self::Open(fields)),
            BEGIN_CODE => Ok(Self::Begin(fields)),
            END_CODE => Ok(Self::End(fields)),
            CLOSE_CODE => Ok(Self::Close(fields)),
            other => Err(CompositeError::UnknownCode(other)),
        }
    }
}
