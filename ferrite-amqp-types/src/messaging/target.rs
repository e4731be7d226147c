use ferrite_amqp_codec::{
    primitives::{Array, Symbol},
    Described, Value,
};

use crate::{
    composite::{CompositeError, FieldIter},
    definitions::{fields_from_value, fields_to_value, Fields, Seconds},
};

use super::{
    symbol_array_from_value, symbol_array_to_value, Address, TerminusDurability,
    TerminusExpiryPolicy,
};

pub(crate) const TARGET_CODE: u64 = 0x29;

/// 3.5.4 Target
///
/// <type name="target" class="composite" source="list" provides="target">
///     <descriptor name="amqp:target:list" code="0x00000000:0x00000029"/>
/// </type>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    /// <field name="address" type="*" requires="address"/>
    pub address: Option<Address>,

    /// <field name="durable" type="terminus-durability" default="none"/>
    pub durable: TerminusDurability,

    /// <field name="expiry-policy" type="terminus-expiry-policy" default="session-end"/>
    pub expiry_policy: TerminusExpiryPolicy,

    /// <field name="timeout" type="seconds" default="0"/>
    pub timeout: Seconds,

    /// <field name="dynamic" type="boolean" default="false"/>
    pub dynamic: bool,

    /// <field name="dynamic-node-properties" type="node-properties"/>
    pub dynamic_node_properties: Option<Fields>,

    /// <field name="capabilities" type="symbol" multiple="true"/>
    pub capabilities: Option<Array<Symbol>>,
}

impl Target {
    /// Creates a [`Target`] builder
    pub fn builder() -> TargetBuilder {
        TargetBuilder::new()
    }

    /// Builds the target from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("target", fields);
        let address = fields.optional::<String>("address")?;
        let durable = fields.default_or("durable", TerminusDurability::default())?;
        let expiry_policy = fields.default_or("expiry-policy", TerminusExpiryPolicy::default())?;
        let timeout = fields.default_or("timeout", 0)?;
        let dynamic = fields.default_or("dynamic", false)?;
        let dynamic_node_properties = match fields.next_value() {
            Value::Null => None,
            value => Some(
                fields_from_value(value)
                    .map_err(|_| fields.invalid("dynamic-node-properties"))?,
            ),
        };
        let capabilities = match fields.next_value() {
            Value::Null => None,
            value => {
                Some(symbol_array_from_value(value).map_err(|_| fields.invalid("capabilities"))?)
            }
        };
        Ok(Self {
            address,
            durable,
            expiry_policy,
            timeout,
            dynamic,
            dynamic_node_properties,
            capabilities,
        })
    }

    /// The described-list wire form
    pub fn to_value(&self) -> Value {
        let fields = vec![
            self.address.clone().map(Value::String).unwrap_or(Value::Null),
            self.durable.into(),
            self.expiry_policy.into(),
            Value::UInt(self.timeout),
            Value::Bool(self.dynamic),
            self.dynamic_node_properties
                .as_ref()
                .map(fields_to_value)
                .unwrap_or(Value::Null),
            self.capabilities
                .as_ref()
                .map(symbol_array_to_value)
                .unwrap_or(Value::Null),
        ];
        Value::from(Described::from_code(TARGET_CODE, Value::List(fields)))
    }
}

impl From<&str> for Target {
    fn from(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            ..Default::default()
        }
    }
}

/// [`Target`] builder
#[derive(Debug, Clone, Default)]
pub struct TargetBuilder {
    target: Target,
}

impl TargetBuilder {
    /// Creates a [`Target`] builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the "address" field
    pub fn address(mut self, address: impl Into<Address>) -> Self {
        self.target.address = Some(address.into());
        self
    }

    /// Set the "durable" field
    pub fn durable(mut self, durability: TerminusDurability) -> Self {
        self.target.durable = durability;
        self
    }

    /// Set the "expiry-policy" field
    pub fn expiry_policy(mut self, policy: TerminusExpiryPolicy) -> Self {
        self.target.expiry_policy = policy;
        self
    }

    /// Set the "timeout" field
    pub fn timeout(mut self, timeout: Seconds) -> Self {
        self.target.timeout = timeout;
        self
    }

    /// Set the "dynamic" field
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.target.dynamic = dynamic;
        self
    }

    /// Set the "dynamic-node-properties" field
    pub fn dynamic_node_properties(mut self, properties: Fields) -> Self {
        self.target.dynamic_node_properties = Some(properties);
        self
    }

    /// Set the "capabilities" field
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Symbol>) -> Self {
        self.target.capabilities = Some(capabilities.into_iter().collect());
        self
    }

    /// Build the [`Target`]
    pub fn build(self) -> Target {
        self.target
    }
}
