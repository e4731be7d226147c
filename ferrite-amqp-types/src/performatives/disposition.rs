use ferrite_amqp_codec::{Described, Value};

use crate::{
    composite::{CompositeError, FieldIter},
    definitions::{DeliveryNumber, Role},
};

use super::DISPOSITION_CODE;

/// 2.7.6 Disposition
///
/// Inform remote peer of delivery state changes.
/// <type name="disposition" class="composite" source="list" provides="frame">
///     <descriptor name="amqp:disposition:list" code="0x00000000:0x00000015"/>
/// </type>
#[derive(Debug, Clone, PartialEq)]
pub struct Disposition {
    /// <field name="role" type="role" mandatory="true"/>
    pub role: Role,

    /// <field name="first" type="delivery-number" mandatory="true"/>
    pub first: DeliveryNumber,

    /// <field name="last" type="delivery-number"/>
    pub last: Option<DeliveryNumber>,

    /// <field name="settled" type="boolean" default="false"/>
    pub settled: bool,

    /// <field name="state" type="*" requires="delivery-state"/>
    ///
    /// Kept as the decoded outcome projection.
    pub state: Option<Value>,

    /// <field name="batchable" type="boolean" default="false"/>
    pub batchable: bool,
}

impl Disposition {
    /// Builds the disposition from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("disposition", fields);
        let role = fields.required::<Role>("role")?;
        let first = fields.required::<DeliveryNumber>("first")?;
        let last = fields.optional::<DeliveryNumber>("last")?;
        let settled = fields.default_or("settled", false)?;
        let state = match fields.next_value() {
            Value::Null => None,
            value => Some(value),
        };
        let batchable = fields.default_or("batchable", false)?;
        Ok(Self {
            role,
            first,
            last,
            settled,
            state,
            batchable,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            self.role.into(),
            Value::UInt(self.first),
            self.last.map(Value::UInt).unwrap_or(Value::Null),
            Value::Bool(self.settled),
            self.state.clone().unwrap_or(Value::Null),
            Value::Bool(self.batchable),
        ];
        Value::from(Described::from_code(
            u64::from(DISPOSITION_CODE),
            Value::List(fields),
        ))
    }
}

#[cfg(test)]
mod tests {
    use ferrite_amqp_codec::{decode_value, to_vec, Value};

    use crate::definitions::Role;

    use super::Disposition;

    #[test]
    fn disposition_round_trips_as_field_list() {
        let disposition = Disposition {
            role: Role::Receiver,
            first: 0,
            last: Some(2),
            settled: true,
            state: None,
            batchable: false,
        };
        let buf = to_vec(&disposition.to_value()).unwrap();
        let (value, _) = decode_value(&buf).unwrap();
        let decoded = Disposition::try_from_fields(Vec::try_from(value).unwrap()).unwrap();
        assert_eq!(disposition, decoded);
    }

    #[test]
    fn accepted_state_arrives_as_projected_map() {
        use ferrite_amqp_codec::Described;

        let disposition = Disposition {
            role: Role::Receiver,
            first: 5,
            last: None,
            settled: true,
            state: Some(Value::from(Described::from_code(36, Value::List(vec![])))),
            batchable: false,
        };
        let buf = to_vec(&disposition.to_value()).unwrap();
        let (value, _) = decode_value(&buf).unwrap();
        let decoded = Disposition::try_from_fields(Vec::try_from(value).unwrap()).unwrap();
        let state = decoded.state.expect("state should survive the round trip");
        let map = match state {
            Value::Map(map) => map,
            other => panic!("expected projected outcome, got {:?}", other),
        };
        assert!(map.contains_key(&Value::String("accepted".to_string())));
    }
}
