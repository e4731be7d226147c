use std::convert::{TryFrom, TryInto};

use ferrite_amqp_codec::primitives::Symbol;

use super::ErrorCondition;

/// 2.8.15 AMQP Error
///
/// Shared error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AmqpError {
    InternalError,
    NotFound,
    UnauthorizedAccess,
    DecodeError,
    ResourceLimitExceeded,
    NotAllowed,
    InvalidField,
    NotImplemented,
    ResourceLocked,
    PreconditionFailed,
    ResourceDeleted,
    IllegalState,
    FrameSizeTooSmall,
}

impl From<AmqpError> for ErrorCondition {
    fn from(err: AmqpError) -> Self {
        ErrorCondition::AmqpError(err)
    }
}

impl From<&AmqpError> for Symbol {
    fn from(value: &AmqpError) -> Self {
        let val = match value {
            AmqpError::InternalError => "amqp:internal-error",
            AmqpError::NotFound => "amqp:not-found",
            AmqpError::UnauthorizedAccess => "amqp:unauthorized-access",
            AmqpError::DecodeError => "amqp:decode-error",
            AmqpError::ResourceLimitExceeded => "amqp:resource-limit-exceeded",
            AmqpError::NotAllowed => "amqp:not-allowed",
            AmqpError::InvalidField => "amqp:invalid-field",
            AmqpError::NotImplemented => "amqp:not-implemented",
            AmqpError::ResourceLocked => "amqp:resource-locked",
            AmqpError::PreconditionFailed => "amqp:precondition-failed",
            AmqpError::ResourceDeleted => "amqp:resource-deleted",
            AmqpError::IllegalState => "amqp:illegal-state",
            AmqpError::FrameSizeTooSmall => "amqp:frame-size-too-small",
        };
        Symbol::from(val)
    }
}

impl TryFrom<Symbol> for AmqpError {
    type Error = Symbol;

    fn try_from(value: Symbol) -> Result<Self, Self::Error> {
        match value.as_str().try_into() {
            Ok(val) => Ok(val),
            Err(_) => Err(value),
        }
    }
}

impl<'a> TryFrom<&'a str> for AmqpError {
    type Error = &'a str;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let val = match value {
            "amqp:internal-error" => AmqpError::InternalError,
            "amqp:not-found" => AmqpError::NotFound,
            "amqp:unauthorized-access" => AmqpError::UnauthorizedAccess,
            "amqp:decode-error" => AmqpError::DecodeError,
            "amqp:resource-limit-exceeded" => AmqpError::ResourceLimitExceeded,
            "amqp:not-allowed" => AmqpError::NotAllowed,
            "amqp:invalid-field" => AmqpError::InvalidField,
            "amqp:not-implemented" => AmqpError::NotImplemented,
            "amqp:resource-locked" => AmqpError::ResourceLocked,
            "amqp:precondition-failed" => AmqpError::PreconditionFailed,
            "amqp:resource-deleted" => AmqpError::ResourceDeleted,
            "amqp:illegal-state" => AmqpError::IllegalState,
            "amqp:frame-size-too-small" => AmqpError::FrameSizeTooSmall,
            _ => return Err(value),
        };
        Ok(val)
    }
}
