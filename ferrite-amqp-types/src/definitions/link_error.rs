use std::convert::{TryFrom, TryInto};

use ferrite_amqp_codec::primitives::Symbol;

use super::ErrorCondition;

/// 2.8.18 Link Error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LinkError {
    DetachForced,
    TransferLimitExceeded,
    MessageSizeExceeded,
    Redirect,
    Stolen,
}

impl From<LinkError> for ErrorCondition {
    fn from(err: LinkError) -> Self {
        ErrorCondition::LinkError(err)
    }
}

impl From<&LinkError> for Symbol {
    fn from(value: &LinkError) -> Self {
        let val = match value {
            LinkError::DetachForced => "amqp:link:detach-forced",
            LinkError::TransferLimitExceeded => "amqp:link:transfer-limit-exceeded",
            LinkError::MessageSizeExceeded => "amqp:link:message-size-exceeded",
            LinkError::Redirect => "amqp:link:redirect",
            LinkError::Stolen => "amqp:link:stolen",
        };
        Symbol::from(val)
    }
}

impl TryFrom<Symbol> for LinkError {
    type Error = Symbol;

    fn try_from(value: Symbol) -> Result<Self, Self::Error> {
        match value.as_str().try_into() {
            Ok(val) => Ok(val),
            Err(_) => Err(value),
        }
    }
}

impl<'a> TryFrom<&'a str> for LinkError {
    type Error = &'a str;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let val = match value {
            "amqp:link:detach-forced" => LinkError::DetachForced,
            "amqp:link:transfer-limit-exceeded" => LinkError::TransferLimitExceeded,
            "amqp:link:message-size-exceeded" => LinkError::MessageSizeExceeded,
            "amqp:link:redirect" => LinkError::Redirect,
            "amqp:link:stolen" => LinkError::Stolen,
            _ => return Err(value),
        };
        Ok(val)
    }
}
