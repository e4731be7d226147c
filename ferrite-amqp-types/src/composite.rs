//! Helpers for decoding described list composites.
//!
//! A composite arrives from the decoder as a plain field list (the codec
//! drops the descriptor); absent trailing fields read as null. The iterator
//! applies the per-field typing and default rules of the composite
//! definitions.

use ferrite_amqp_codec::Value;

/// Error converting a decoded field list into a typed composite.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositeError {
    /// The descriptor code is not a composite this crate models
    #[error("Unknown composite code 0x{0:02x}")]
    UnknownCode(u8),

    /// A mandatory field was null or absent
    #[error("{composite} is missing mandatory field {field}")]
    MissingField {
        /// Composite name, e.g. `attach`
        composite: &'static str,
        /// Field name, e.g. `handle`
        field: &'static str,
    },

    /// A field value decoded to an unexpected type
    #[error("{composite} field {field} has an unexpected type")]
    InvalidField {
        /// Composite name
        composite: &'static str,
        /// Field name
        field: &'static str,
    },
}

pub(crate) struct FieldIter {
    composite: &'static str,
    iter: std::vec::IntoIter<Value>,
}

impl FieldIter {
    pub(crate) fn new(composite: &'static str, fields: Vec<Value>) -> Self {
        Self {
            composite,
            iter: fields.into_iter(),
        }
    }

    /// Next raw field; trailing fields a peer omitted read as null.
    pub(crate) fn next_value(&mut self) -> Value {
        self.iter.next().unwrap_or(Value::Null)
    }

    pub(crate) fn optional<T>(&mut self, field: &'static str) -> Result<Option<T>, CompositeError>
    where
        T: TryFrom<Value, Error = Value>,
    {
        match self.next_value() {
            Value::Null => Ok(None),
            value => T::try_from(value).map(Some).map_err(|_| self.invalid(field)),
        }
    }

    pub(crate) fn required<T>(&mut self, field: &'static str) -> Result<T, CompositeError>
    where
        T: TryFrom<Value, Error = Value>,
    {
        self.optional(field)?.ok_or(CompositeError::MissingField {
            composite: self.composite,
            field,
        })
    }

    pub(crate) fn default_or<T>(
        &mut self,
        field: &'static str,
        default: T,
    ) -> Result<T, CompositeError>
    where
        T: TryFrom<Value, Error = Value>,
    {
        Ok(self.optional(field)?.unwrap_or(default))
    }

    pub(crate) fn invalid(&self, field: &'static str) -> CompositeError {
        CompositeError::InvalidField {
            composite: self.composite,
            field,
        }
    }
}
