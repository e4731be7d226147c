use ferrite_amqp_codec::{Described, Value};

use crate::composite::{CompositeError, FieldIter};

use super::{fields_from_value, fields_to_value, ErrorCondition, Fields};

/// Descriptor code of the error composite
pub(crate) const ERROR_CODE: u64 = 0x1d;

/// 2.8.14 Error
///
/// <type name="error" class="composite" source="list">
///     <descriptor name="amqp:error:list" code="0x00000000:0x0000001d"/>
///     <field name="condition" type="symbol" requires="error-condition" mandatory="true"/>
///     <field name="description" type="string"/>
///     <field name="info" type="fields"/>
/// </type>
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    condition: ErrorCondition,
    description: Option<String>,
    info: Option<Fields>,
}

impl Error {
    /// Creates a new error composite
    pub fn new(
        condition: impl Into<ErrorCondition>,
        description: Option<String>,
        info: Option<Fields>,
    ) -> Self {
        Self {
            condition: condition.into(),
            description,
            info,
        }
    }

    /// The symbolic error condition
    pub fn condition(&self) -> &ErrorCondition {
        &self.condition
    }

    /// The human-readable description, if the peer supplied one
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Builds the error from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("error", fields);
        let condition = fields.required::<ErrorCondition>("condition")?;
        let description = fields.optional::<String>("description")?;
        let info = match fields.next_value() {
            Value::Null => None,
            value => Some(fields_from_value(value).map_err(|_| fields.invalid("info"))?),
        };
        Ok(Self {
            condition,
            description,
            info,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            Value::from(&self.condition),
            self.description
                .as_ref()
                .map(|d| Value::String(d.clone()))
                .unwrap_or(Value::Null),
            self.info
                .as_ref()
                .map(fields_to_value)
                .unwrap_or(Value::Null),
        ];
        Value::from(Described::from_code(ERROR_CODE, Value::List(fields)))
    }
}

impl<T> From<T> for Error
where
    T: Into<ErrorCondition>,
{
    fn from(condition: T) -> Self {
        Self {
            condition: condition.into(),
            description: None,
            info: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrite_amqp_codec::{decode_value, to_vec};

    use crate::definitions::AmqpError;

    use super::Error;

    #[test]
    fn error_round_trips_through_the_codec() {
        let expected = Error::new(AmqpError::DecodeError, Some("bad frame".to_string()), None);
        let buf = to_vec(&expected.to_value()).unwrap();
        // the codec unwraps the composite to its field list
        let (value, _) = decode_value(&buf).unwrap();
        let fields = Vec::try_from(value).unwrap();
        let decoded = Error::try_from_fields(fields).unwrap();
        assert_eq!(expected, decoded);
    }
}
