use ferrite_amqp_codec::{primitives::Symbol, Value};

/// 3.5.6 Terminus Expiry Policy
///
/// <type name="terminus-expiry-policy" class="restricted" source="symbol">
/// </type>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminusExpiryPolicy {
    /// <choice name="link-detach" value="link-detach"/>
    LinkDetach,

    /// <choice name="session-end" value="session-end"/>
    #[default]
    SessionEnd,

    /// <choice name="connection-close" value="connection-close"/>
    ConnectionClose,

    /// <choice name="never" value="never"/>
    Never,
}

impl From<TerminusExpiryPolicy> for Symbol {
    fn from(value: TerminusExpiryPolicy) -> Self {
        let val = match value {
            TerminusExpiryPolicy::LinkDetach => "link-detach",
            TerminusExpiryPolicy::SessionEnd => "session-end",
            TerminusExpiryPolicy::ConnectionClose => "connection-close",
            TerminusExpiryPolicy::Never => "never",
        };
        Symbol::from(val)
    }
}

impl From<TerminusExpiryPolicy> for Value {
    fn from(value: TerminusExpiryPolicy) -> Self {
        Value::Symbol(value.into())
    }
}

impl<'a> TryFrom<&'a str> for TerminusExpiryPolicy {
    type Error = &'a str;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let policy = match value {
            "link-detach" => TerminusExpiryPolicy::LinkDetach,
            "session-end" => TerminusExpiryPolicy::SessionEnd,
            "connection-close" => TerminusExpiryPolicy::ConnectionClose,
            "never" => TerminusExpiryPolicy::Never,
            _ => return Err(value),
        };
        Ok(policy)
    }
}

impl TryFrom<Value> for TerminusExpiryPolicy {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let policy = match &value {
            Value::Symbol(sym) => TerminusExpiryPolicy::try_from(sym.as_str()).ok(),
            Value::String(s) => TerminusExpiryPolicy::try_from(s.as_str()).ok(),
            _ => None,
        };
        policy.ok_or(value)
    }
}
