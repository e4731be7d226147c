use ferrite_amqp_codec::{primitives::Symbol, Value};

use super::{AmqpError, LinkError};

/// Archetype error-condition
///
/// The wire form is a symbol; conditions outside the shared and link bands
/// round-trip as [`ErrorCondition::Custom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCondition {
    /// 2.8.15 AMQP Error
    AmqpError(AmqpError),

    /// 2.8.18 Link Error
    LinkError(LinkError),

    /// Any other symbolic condition
    Custom(Symbol),
}

impl From<&ErrorCondition> for Symbol {
    fn from(value: &ErrorCondition) -> Self {
        match value {
            ErrorCondition::AmqpError(err) => Symbol::from(err),
            ErrorCondition::LinkError(err) => Symbol::from(err),
            ErrorCondition::Custom(sym) => sym.clone(),
        }
    }
}

impl From<Symbol> for ErrorCondition {
    fn from(value: Symbol) -> Self {
        if let Ok(err) = AmqpError::try_from(value.as_str()) {
            return ErrorCondition::AmqpError(err);
        }
        if let Ok(err) = LinkError::try_from(value.as_str()) {
            return ErrorCondition::LinkError(err);
        }
        ErrorCondition::Custom(value)
    }
}

impl From<&ErrorCondition> for Value {
    fn from(value: &ErrorCondition) -> Self {
        Value::Symbol(Symbol::from(value))
    }
}

impl TryFrom<Value> for ErrorCondition {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Symbol(sym) => Ok(ErrorCondition::from(sym)),
            Value::String(s) => Ok(ErrorCondition::from(Symbol::from(s))),
            other => Err(other),
        }
    }
}
