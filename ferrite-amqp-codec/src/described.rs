//! Definition of the `Described` type

use crate::value::Value;

/// Contains a descriptor and a wrapped value.
///
/// The decoder never yields this type directly: recognized outcome
/// descriptors are projected to a single-entry map and any other descriptor
/// is dropped in favour of the inner value. The encoder accepts it so that
/// composite types (performatives, termini) can be written with their
/// `0x00` constructor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Described {
    /// Descriptor of the described type
    pub descriptor: Value,

    /// The wrapped value
    pub value: Value,
}

impl Described {
    /// Creates a new described value
    pub fn new(descriptor: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            descriptor: descriptor.into(),
            value: value.into(),
        }
    }

    /// Creates a described value with a numeric (ulong) descriptor code
    pub fn from_code(code: u64, value: impl Into<Value>) -> Self {
        Self {
            descriptor: Value::ULong(code),
            value: value.into(),
        }
    }
}

impl From<Described> for Value {
    fn from(value: Described) -> Self {
        Self::Described(Box::new(value))
    }
}
