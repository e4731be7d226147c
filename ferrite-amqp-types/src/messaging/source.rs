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

pub(crate) const SOURCE_CODE: u64 = 0x28;

/// 3.5.3 Source
///
/// <type name="source" class="composite" source="list" provides="source">
///     <descriptor name="amqp:source:list" code="0x00000000:0x00000028"/>
/// </type>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Source {
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
    ///
    /// If the dynamic field is not set to true this field MUST be left unset.
    pub dynamic_node_properties: Option<Fields>,

    /// <field name="distribution-mode" type="symbol" requires="distribution-mode"/>
    pub distribution_mode: Option<Symbol>,

    /// <field name="filter" type="filter-set"/>
    pub filter: Option<Fields>,

    /// <field name="default-outcome" type="*" requires="outcome"/>
    ///
    /// Kept as the decoded outcome projection; the link does not interpret
    /// it.
    pub default_outcome: Option<Value>,

    /// <field name="outcomes" type="symbol" multiple="true"/>
    pub outcomes: Option<Array<Symbol>>,

    /// <field name="capabilities" type="symbol" multiple="true"/>
    pub capabilities: Option<Array<Symbol>>,
}

impl Source {
    /// Creates a [`Source`] builder
    pub fn builder() -> SourceBuilder {
        SourceBuilder::new()
    }

    /// Builds the source from its decoded field list
    pub fn try_from_fields(fields: Vec<Value>) -> Result<Self, CompositeError> {
        let mut fields = FieldIter::new("source", fields);
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
        let distribution_mode = fields.optional::<Symbol>("distribution-mode")?;
        let filter = match fields.next_value() {
            Value::Null => None,
            value => Some(fields_from_value(value).map_err(|_| fields.invalid("filter"))?),
        };
        let default_outcome = match fields.next_value() {
            Value::Null => None,
            value => Some(value),
        };
        let outcomes = match fields.next_value() {
            Value::Null => None,
            value => Some(symbol_array_from_value(value).map_err(|_| fields.invalid("outcomes"))?),
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
            distribution_mode,
            filter,
            default_outcome,
            outcomes,
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
            self.distribution_mode
                .clone()
                .map(Value::Symbol)
                .unwrap_or(Value::Null),
            self.filter
                .as_ref()
                .map(fields_to_value)
                .unwrap_or(Value::Null),
            self.default_outcome.clone().unwrap_or(Value::Null),
            self.outcomes
                .as_ref()
                .map(symbol_array_to_value)
                .unwrap_or(Value::Null),
            self.capabilities
                .as_ref()
                .map(symbol_array_to_value)
                .unwrap_or(Value::Null),
        ];
        Value::from(Described::from_code(SOURCE_CODE, Value::List(fields)))
    }
}

impl From<&str> for Source {
    fn from(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            ..Default::default()
        }
    }
}

/// [`Source`] builder
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    source: Source,
}

impl SourceBuilder {
    /// Creates a [`Source`] builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the "address" field
    pub fn address(mut self, address: impl Into<Address>) -> Self {
        self.source.address = Some(address.into());
        self
    }

    /// Set the "durable" field
    pub fn durable(mut self, durability: TerminusDurability) -> Self {
        self.source.durable = durability;
        self
    }

    /// Set the "expiry-policy" field
    pub fn expiry_policy(mut self, policy: TerminusExpiryPolicy) -> Self {
        self.source.expiry_policy = policy;
        self
    }

    /// Set the "timeout" field
    pub fn timeout(mut self, timeout: Seconds) -> Self {
        self.source.timeout = timeout;
        self
    }

    /// Set the "dynamic" field
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.source.dynamic = dynamic;
        self
    }

    /// Set the "dynamic-node-properties" field
    pub fn dynamic_node_properties(mut self, properties: Fields) -> Self {
        self.source.dynamic_node_properties = Some(properties);
        self
    }

    /// Set the "distribution-mode" field
    pub fn distribution_mode(mut self, mode: impl Into<Symbol>) -> Self {
        self.source.distribution_mode = Some(mode.into());
        self
    }

    /// Set the "filter" field
    pub fn filter(mut self, filter: Fields) -> Self {
        self.source.filter = Some(filter);
        self
    }

    /// Set the "default-outcome" field
    pub fn default_outcome(mut self, outcome: Value) -> Self {
        self.source.default_outcome = Some(outcome);
        self
    }

    /// Set the "outcomes" field
    pub fn outcomes(mut self, outcomes: impl IntoIterator<Item = Symbol>) -> Self {
        self.source.outcomes = Some(outcomes.into_iter().collect());
        self
    }

    /// Set the "capabilities" field
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Symbol>) -> Self {
        self.source.capabilities = Some(capabilities.into_iter().collect());
        self
    }

    /// Build the [`Source`]
    pub fn build(self) -> Source {
        self.source
    }
}
