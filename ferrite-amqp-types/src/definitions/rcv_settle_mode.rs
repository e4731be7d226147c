use ferrite_amqp_codec::Value;

/// 2.8.3 Receiver Settle Mode
///
/// Settlement policy for a receiver.
/// <type name="receiver-settle-mode" class="restricted" source="ubyte">
/// </type>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiverSettleMode {
    /// <choice name="first" value="0"/>
    #[default]
    First,

    /// <choice name="second" value="1"/>
    Second,
}

impl From<ReceiverSettleMode> for u8 {
    fn from(mode: ReceiverSettleMode) -> Self {
        match mode {
            ReceiverSettleMode::First => 0,
            ReceiverSettleMode::Second => 1,
        }
    }
}

impl TryFrom<u8> for ReceiverSettleMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let mode = match value {
            0 => ReceiverSettleMode::First,
            1 => ReceiverSettleMode::Second,
            _ => return Err(value),
        };
        Ok(mode)
    }
}

impl From<ReceiverSettleMode> for Value {
    fn from(mode: ReceiverSettleMode) -> Self {
        Value::UByte(mode.into())
    }
}

impl TryFrom<Value> for ReceiverSettleMode {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw = match value {
            Value::UByte(val) => val,
            other => return Err(other),
        };
        ReceiverSettleMode::try_from(raw).map_err(Value::UByte)
    }
}
