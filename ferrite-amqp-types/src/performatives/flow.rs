use ferrite_amqp_codec::{primitives::UInt, Described, Value};

use crate::{
    composite::{CompositeError, FieldIter},
    definitions::{fields_from_value, fields_to_value, Fields, Handle, SequenceNo, TransferNumber},
};

use super::FLOW_CODE;

/// 2.7.4 Flow
///
/// Update link state.
/// <type name="flow" class="composite" source="list" provides="frame">
///     <descriptor name="amqp:flow:list" code="0x00000000:0x00000013"/>
/// </type>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flow {
    /// <field name="next-incoming-id" type="transfer-number"/>
    ///
    /// This value MUST be set if the peer has received the begin frame for
    /// the session, and MUST NOT be set if it has not.
    pub next_incoming_id: Option<TransferNumber>,

    /// <field name="incoming-window" type="uint" mandatory="true"/>
    pub incoming_window: UInt,

    /// <field name="next-outgoing-id" type="transfer-number" mandatory="true"/>
    pub next_outgoing_id: TransferNumber,

    /// <field name="outgoing-window" type="uint" mandatory="true"/>
    pub outgoing_window: UInt,

    /// <field name="handle" type="handle"/>
    ///
    /// If set, the flow frame carries flow state for the link endpoint
    /// associated with the handle; if not set, only session state.
    pub handle: Option<Handle>,

    /// <field name="delivery-count" type="sequence-no"/>
    ///
    /// When the handle field is not set, this field MUST NOT be set.
    pub delivery_count: Option<SequenceNo>,

    /// <field name="link-credit" type="uint"/>
    ///
    /// The current maximum number of messages that can be handled at the
    /// receiver endpoint of the link. Only the receiver endpoint can
    /// independently set this value.
    pub link_credit: Option<UInt>,

    /// <field name="available" type="uint"/>
    ///
    /// The number of messages awaiting credit at the link sender endpoint.
    pub available: Option<UInt>,

    /// <field name="drain" type="boolean" default="false"/>
    pub drain: bool,

    /// <field name="echo" type="boolean" default="false"/>
    pub echo: bool,

    /// <field name="properties" type="fields"/>
    pub properties: Option<Fields>,
}

impl Flow {
    /// Builds the flow from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("flow", fields);
        let next_incoming_id = fields.optional::<TransferNumber>("next-incoming-id")?;
        let incoming_window = fields.required::<UInt>("incoming-window")?;
        let next_outgoing_id = fields.required::<TransferNumber>("next-outgoing-id")?;
        let outgoing_window = fields.required::<UInt>("outgoing-window")?;
        let handle = fields.optional::<Handle>("handle")?;
        let delivery_count = fields.optional::<SequenceNo>("delivery-count")?;
        let link_credit = fields.optional::<UInt>("link-credit")?;
        let available = fields.optional::<UInt>("available")?;
        let drain = fields.default_or("drain", false)?;
        let echo = fields.default_or("echo", false)?;
        let properties = match fields.next_value() {
            Value::Null => None,
            value => Some(fields_from_value(value).map_err(|_| fields.invalid("properties"))?),
        };
        Ok(Self {
            next_incoming_id,
            incoming_window,
            next_outgoing_id,
            outgoing_window,
            handle,
            delivery_count,
            link_credit,
            available,
            drain,
            echo,
            properties,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            self.next_incoming_id.map(Value::UInt).unwrap_or(Value::Null),
            Value::UInt(self.incoming_window),
            Value::UInt(self.next_outgoing_id),
            Value::UInt(self.outgoing_window),
            self.handle.map(Value::from).unwrap_or(Value::Null),
            self.delivery_count.map(Value::UInt).unwrap_or(Value::Null),
            self.link_credit.map(Value::UInt).unwrap_or(Value::Null),
            self.available.map(Value::UInt).unwrap_or(Value::Null),
            Value::Bool(self.drain),
            Value::Bool(self.echo),
            self.properties
                .as_ref()
                .map(fields_to_value)
                .unwrap_or(Value::Null),
        ];
        Value::from(Described::from_code(u64::from(FLOW_CODE), Value::List(fields)))
    }
}

#[cfg(test)]
mod tests {
    use ferrite_amqp_codec::{decode_value, to_vec};

    use super::Flow;

    #[test]
    fn flow_round_trips_as_field_list() {
        let flow = Flow {
            next_incoming_id: Some(4),
            incoming_window: 2048,
            next_outgoing_id: 9,
            outgoing_window: 2048,
            handle: Some(1.into()),
            delivery_count: Some(7),
            link_credit: Some(300),
            available: None,
            drain: false,
            echo: false,
            properties: None,
        };
        let buf = to_vec(&flow.to_value()).unwrap();
        let (value, _) = decode_value(&buf).unwrap();
        let decoded = Flow::try_from_fields(Vec::try_from(value).unwrap()).unwrap();
        assert_eq!(flow, decoded);
    }
}
