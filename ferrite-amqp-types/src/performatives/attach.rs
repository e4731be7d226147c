use ferrite_amqp_codec::{
    primitives::{Array, OrderedMap, Symbol, ULong},
    Described, Value,
};

use crate::{
    composite::{CompositeError, FieldIter},
    definitions::{
        fields_from_value, fields_to_value, Fields, Handle, ReceiverSettleMode, Role,
        SenderSettleMode, SequenceNo,
    },
    messaging::{symbol_array_to_value, Source, Target},
};

use super::ATTACH_CODE;

/// 2.7.3 Attach
///
/// Attach a link to a session.
/// <type name="attach" class="composite" source="list" provides="frame">
///     <descriptor name="amqp:attach:list" code="0x00000000:0x00000012"/>
///     <field name="name" type="string" mandatory="true"/>
///     <field name="handle" type="handle" mandatory="true"/>
///     <field name="role" type="role" mandatory="true"/>
///     <field name="snd-settle-mode" type="sender-settle-mode" default="mixed"/>
///     <field name="rcv-settle-mode" type="receiver-settle-mode" default="first"/>
///     <field name="source" type="*" requires="source"/>
///     <field name="target" type="*" requires="target"/>
///     <field name="unsettled" type="map"/>
///     <field name="incomplete-unsettled" type="boolean" default="false"/>
///     <field name="initial-delivery-count" type="sequence-no"/>
///     <field name="max-message-size" type="ulong"/>
///     <field name="offered-capabilities" type="symbol" multiple="true"/>
///     <field name="desired-capabilities" type="symbol" multiple="true"/>
///     <field name="properties" type="fields"/>
/// </type>
#[derive(Debug, Clone, PartialEq)]
pub struct Attach {
    /// <field name="name" type="string" mandatory="true"/>
    pub name: String,

    /// <field name="handle" type="handle" mandatory="true"/>
    pub handle: Handle,

    /// <field name="role" type="role" mandatory="true"/>
    pub role: Role,

    /// <field name="snd-settle-mode" type="sender-settle-mode" default="mixed"/>
    pub snd_settle_mode: SenderSettleMode,

    /// <field name="rcv-settle-mode" type="receiver-settle-mode" default="first"/>
    pub rcv_settle_mode: ReceiverSettleMode,

    /// <field name="source" type="*" requires="source"/>
    ///
    /// A link with no source will never produce outgoing messages.
    pub source: Option<Source>,

    /// <field name="target" type="*" requires="target"/>
    ///
    /// A link with no target will never permit incoming messages.
    pub target: Option<Target>,

    /// <field name="unsettled" type="map"/>
    ///
    /// Delivery-tag keyed recovery hints, kept untyped.
    pub unsettled: Option<OrderedMap<Value, Value>>,

    /// <field name="incomplete-unsettled" type="boolean" default="false"/>
    pub incomplete_unsettled: bool,

    /// <field name="initial-delivery-count" type="sequence-no"/>
    ///
    /// This MUST NOT be null if role is sender, and it is ignored if the
    /// role is receiver. See subsection 2.6.7.
    pub initial_delivery_count: Option<SequenceNo>,

    /// <field name="max-message-size" type="ulong"/>
    pub max_message_size: Option<ULong>,

    /// <field name="offered-capabilities" type="symbol" multiple="true"/>
    pub offered_capabilities: Option<Array<Symbol>>,

    /// <field name="desired-capabilities" type="symbol" multiple="true"/>
    pub desired_capabilities: Option<Array<Symbol>>,

    /// <field name="properties" type="fields"/>
    pub properties: Option<Fields>,
}

impl Attach {
    /// Builds the attach from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("attach", fields);
        let name = fields.required::<String>("name")?;
        let handle = fields.required::<Handle>("handle")?;
        let role = fields.required::<Role>("role")?;
        let snd_settle_mode = fields.default_or("snd-settle-mode", SenderSettleMode::default())?;
        let rcv_settle_mode = fields.default_or("rcv-settle-mode", ReceiverSettleMode::default())?;
        let source = match fields.next_value() {
            Value::Null => None,
            Value::List(list) => Some(Source::try_from_fields(list)?),
            _ => return Err(fields.invalid("source")),
        };
        let target = match fields.next_value() {
            Value::Null => None,
            Value::List(list) => Some(Target::try_from_fields(list)?),
            _ => return Err(fields.invalid("target")),
        };
        let unsettled = fields.optional::<OrderedMap<Value, Value>>("unsettled")?;
        let incomplete_unsettled = fields.default_or("incomplete-unsettled", false)?;
        let initial_delivery_count = fields.optional::<SequenceNo>("initial-delivery-count")?;
        let max_message_size = fields.optional::<ULong>("max-message-size")?;
        let offered_capabilities = match fields.next_value() {
            Value::Null => None,
            value => Some(
                crate::messaging::symbol_array_from_value(value)
                    .map_err(|_| fields.invalid("offered-capabilities"))?,
            ),
        };
        let desired_capabilities = match fields.next_value() {
            Value::Null => None,
            value => Some(
                crate::messaging::symbol_array_from_value(value)
                    .map_err(|_| fields.invalid("desired-capabilities"))?,
            ),
        };
        let properties = match fields.next_value() {
            Value::Null => None,
            value => Some(fields_from_value(value).map_err(|_| fields.invalid("properties"))?),
        };
        Ok(Self {
            name,
            handle,
            role,
            snd_settle_mode,
            rcv_settle_mode,
            source,
            target,
            unsettled,
            incomplete_unsettled,
            initial_delivery_count,
            max_message_size,
            offered_capabilities,
            desired_capabilities,
            properties,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            Value::String(self.name.clone()),
            self.handle.into(),
            self.role.into(),
            self.snd_settle_mode.into(),
            self.rcv_settle_mode.into(),
            self.source.as_ref().map(Source::to_value).unwrap_or(Value::Null),
            self.target.as_ref().map(Target::to_value).unwrap_or(Value::Null),
            self.unsettled
                .as_ref()
                .map(|map| Value::Map(map.clone()))
                .unwrap_or(Value::Null),
            Value::Bool(self.incomplete_unsettled),
            self.initial_delivery_count
                .map(Value::UInt)
                .unwrap_or(Value::Null),
            self.max_message_size.map(Value::ULong).unwrap_or(Value::Null),
            self.offered_capabilities
                .as_ref()
                .map(symbol_array_to_value)
                .unwrap_or(Value::Null),
            self.desired_capabilities
                .as_ref()
                .map(symbol_array_to_value)
                .unwrap_or(Value::Null),
            self.properties
                .as_ref()
                .map(fields_to_value)
                .unwrap_or(Value::Null),
        ];
        Value::from(Described::from_code(u64::from(ATTACH_CODE), Value::List(fields)))
    }
}

#[cfg(test)]
mod tests {
    use ferrite_amqp_codec::{decode_value, to_vec};

    use crate::{
        definitions::{ReceiverSettleMode, Role, SenderSettleMode},
        messaging::{Source, Target},
    };

    use super::Attach;

    #[test]
    fn attach_round_trips_as_field_list() {
        let attach = Attach {
            name: "sender-link-1".into(),
            handle: 0.into(),
            role: Role::Sender,
            snd_settle_mode: SenderSettleMode::Unsettled,
            rcv_settle_mode: ReceiverSettleMode::First,
            source: Some(Source::from("q1")),
            target: Some(Target::from("q1")),
            unsettled: None,
            incomplete_unsettled: false,
            initial_delivery_count: Some(0),
            max_message_size: Some(65536),
            offered_capabilities: None,
            desired_capabilities: None,
            properties: None,
        };
        let buf = to_vec(&attach.to_value()).unwrap();
        let (value, _) = decode_value(&buf).unwrap();
        let decoded = Attach::try_from_fields(Vec::try_from(value).unwrap()).unwrap();
        assert_eq!(attach, decoded);
    }

    #[test]
    fn omitted_trailing_fields_take_defaults() {
        use ferrite_amqp_codec::Value;

        let fields = vec![
            Value::String("r".to_string()),
            Value::UInt(5),
            Value::Bool(true),
        ];
        let attach = Attach::try_from_fields(fields).unwrap();
        assert_eq!(attach.role, Role::Receiver);
        assert_eq!(attach.snd_settle_mode, SenderSettleMode::Mixed);
        assert_eq!(attach.rcv_settle_mode, ReceiverSettleMode::First);
        assert!(!attach.incomplete_unsettled);
        assert!(attach.source.is_none());
    }
}
