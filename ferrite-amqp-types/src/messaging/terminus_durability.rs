use ferrite_amqp_codec::Value;

/// 3.5.5 Terminus Durability
///
/// Durability policy for a terminus.
/// <type name="terminus-durability" class="restricted" source="uint">
/// </type>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminusDurability {
    /// <choice name="none" value="0"/>
    #[default]
    None,

    /// <choice name="configuration" value="1"/>
    Configuration,

    /// <choice name="unsettled-state" value="2"/>
    UnsettledState,
}

impl From<TerminusDurability> for u32 {
    fn from(value: TerminusDurability) -> Self {
        match value {
            TerminusDurability::None => 0,
            TerminusDurability::Configuration => 1,
            TerminusDurability::UnsettledState => 2,
        }
    }
}

impl From<TerminusDurability> for Value {
    fn from(value: TerminusDurability) -> Self {
        Value::UInt(value.into())
    }
}

impl TryFrom<Value> for TerminusDurability {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw = match &value {
            Value::UInt(val) => *val,
            Value::UByte(val) => u32::from(*val),
            _ => return Err(value),
        };
        match raw {
            0 => Ok(TerminusDurability::None),
            1 => Ok(TerminusDurability::Configuration),
            2 => Ok(TerminusDurability::UnsettledState),
            _ => Err(value),
        }
    }
}
