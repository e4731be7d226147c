use ferrite_amqp_codec::Value;

/// 2.8.1 Role
///
/// Link endpoint role.
/// <type name="role" class="restricted" source="boolean">
///     <choice name="sender" value="false"/>
///     <choice name="receiver" value="true"/>
/// </type>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// <choice name="sender" value="false"/>
    Sender,

    /// <choice name="receiver" value="true"/>
    Receiver,
}

impl Role {
    /// Whether this is the sender role
    pub fn is_sender(&self) -> bool {
        matches!(self, Role::Sender)
    }

    /// Whether this is the receiver role
    pub fn is_receiver(&self) -> bool {
        matches!(self, Role::Receiver)
    }
}

impl From<Role> for bool {
    fn from(role: Role) -> Self {
        match role {
            Role::Sender => false,
            Role::Receiver => true,
        }
    }
}

impl From<bool> for Role {
    fn from(value: bool) -> Self {
        match value {
            false => Role::Sender,
            true => Role::Receiver,
        }
    }
}

impl From<Role> for Value {
    fn from(role: Role) -> Self {
        Value::Bool(role.into())
    }
}

impl TryFrom<Value> for Role {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        bool::try_from(value).map(Role::from)
    }
}
