use ferrite_amqp_codec::{Described, Value};

use crate::{
    composite::{CompositeError, FieldIter},
    definitions::{Error, Handle},
};

use super::DETACH_CODE;

/// 2.7.7 Detach
///
/// Detach the link endpoint from the session.
/// <type name="detach" class="composite" source="list" provides="frame">
///     <descriptor name="amqp:detach:list" code="0x00000000:0x00000016"/>
/// </type>
#[derive(Debug, Clone, PartialEq)]
pub struct Detach {
    /// <field name="handle" type="handle" mandatory="true"/>
    pub handle: Handle,

    /// <field name="closed" type="boolean" default="false"/>
    pub closed: bool,

    /// <field name="error" type="error"/>
    pub error: Option<Error>,
}

impl Detach {
    /// Builds the detach from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("detach", fields);
        let handle = fields.required::<Handle>("handle")?;
        let closed = fields.default_or("closed", false)?;
        let error = match fields.next_value() {
            Value::Null => None,
            Value::List(list) => Some(Error::try_from_fields(list)?),
            _ => return Err(fields.invalid("error")),
        };
        Ok(Self {
            handle,
            closed,
            error,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            self.handle.into(),
            Value::Bool(self.closed),
            self.error.as_ref().map(Error::to_value).unwrap_or(Value::Null),
        ];
        Value::from(Described::from_code(
            u64::from(DETACH_CODE),
            Value::List(fields),
        ))
    }
}
