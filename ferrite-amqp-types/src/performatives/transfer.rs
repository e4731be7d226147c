use ferrite_amqp_codec::{Described, Value};

use crate::{
    composite::{CompositeError, FieldIter},
    definitions::{
        DeliveryNumber, DeliveryTag, Handle, MessageFormat, ReceiverSettleMode,
    },
};

use super::TRANSFER_CODE;

/// 2.7.5 Transfer
///
/// Transfer a message.
/// <type name="transfer" class="composite" source="list" provides="frame">
///     <descriptor name="amqp:transfer:list" code="0x00000000:0x00000014"/>
/// </type>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transfer {
    /// <field name="handle" type="handle" mandatory="true"/>
    ///
    /// Specifies the link on which the message is transferred.
    pub handle: Handle,

    /// <field name="delivery-id" type="delivery-number"/>
    ///
    /// The delivery-id MUST be supplied on the first transfer of a
    /// multi-transfer delivery.
    pub delivery_id: Option<DeliveryNumber>,

    /// <field name="delivery-tag" type="delivery-tag"/>
    ///
    /// Uniquely identifies the delivery attempt for a given message on this
    /// link.
    pub delivery_tag: Option<DeliveryTag>,

    /// <field name="message-format" type="message-format"/>
    pub message_format: Option<MessageFormat>,

    /// <field name="settled" type="boolean"/>
    ///
    /// If not set on the first (or only) transfer for a delivery, the
    /// settled flag MUST be interpreted as being false.
    pub settled: Option<bool>,

    /// <field name="more" type="boolean" default="false"/>
    pub more: bool,

    /// <field name="rcv-settle-mode" type="receiver-settle-mode"/>
    ///
    /// If not set, this value is defaulted to the value negotiated on link
    /// attach.
    pub rcv_settle_mode: Option<ReceiverSettleMode>,

    /// <field name="state" type="*" requires="delivery-state"/>
    ///
    /// Kept as the decoded outcome projection.
    pub state: Option<Value>,

    /// <field name="resume" type="boolean" default="false"/>
    pub resume: bool,

    /// <field name="aborted" type="boolean" default="false"/>
    pub aborted: bool,

    /// <field name="batchable" type="boolean" default="false"/>
    pub batchable: bool,
}

impl Transfer {
    /// Builds the transfer from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("transfer", fields);
        let handle = fields.required::<Handle>("handle")?;
        let delivery_id = fields.optional::<DeliveryNumber>("delivery-id")?;
        let delivery_tag = fields.optional::<DeliveryTag>("delivery-tag")?;
        let message_format = fields.optional::<MessageFormat>("message-format")?;
        let settled = fields.optional::<bool>("settled")?;
        let more = fields.default_or("more", false)?;
        let rcv_settle_mode = fields.optional::<ReceiverSettleMode>("rcv-settle-mode")?;
        let state = match fields.next_value() {
            Value::Null => None,
            value => Some(value),
        };
        let resume = fields.default_or("resume", false)?;
        let aborted = fields.default_or("aborted", false)?;
        let batchable = fields.default_or("batchable", false)?;
        Ok(Self {
            handle,
            delivery_id,
            delivery_tag,
            message_format,
            settled,
            more,
            rcv_settle_mode,
            state,
            resume,
            aborted,
            batchable,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            self.handle.into(),
            self.delivery_id.map(Value::UInt).unwrap_or(Value::Null),
            self.delivery_tag
                .clone()
                .map(Value::Binary)
                .unwrap_or(Value::Null),
            self.message_format.map(Value::UInt).unwrap_or(Value::Null),
            self.settled.map(Value::Bool).unwrap_or(Value::Null),
            Value::Bool(self.more),
            self.rcv_settle_mode.map(Value::from).unwrap_or(Value::Null),
            self.state.clone().unwrap_or(Value::Null),
            Value::Bool(self.resume),
            Value::Bool(self.aborted),
            Value::Bool(self.batchable),
        ];
        Value::from(Described::from_code(
            u64::from(TRANSFER_CODE),
            Value::List(fields),
        ))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use ferrite_amqp_codec::{decode_value, to_vec};

    use super::Transfer;

    #[test]
    fn transfer_round_trips_as_field_list() {
        let transfer = Transfer {
            handle: 2.into(),
            delivery_id: Some(41),
            delivery_tag: Some(Bytes::from_static(b"tag-41")),
            message_format: Some(0),
            settled: Some(false),
            more: false,
            rcv_settle_mode: None,
            state: None,
            resume: false,
            aborted: false,
            batchable: false,
        };
        let buf = to_vec(&transfer.to_value()).unwrap();
        let (value, _) = decode_value(&buf).unwrap();
        let decoded = Transfer::try_from_fields(Vec::try_from(value).unwrap()).unwrap();
        assert_eq!(transfer, decoded);
    }
}
