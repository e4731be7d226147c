//! Builder for link instances

use std::collections::HashMap;
use std::marker::PhantomData;

use ferrite_amqp_codec::{
    primitives::{Array, OrderedMap, Symbol},
    Value,
};
use ferrite_amqp_types::{
    definitions::{Fields, Handle, ReceiverSettleMode, Seconds, SenderSettleMode, SequenceNo},
    messaging::{Source, Target, TerminusDurability, TerminusExpiryPolicy},
};
use tokio::sync::mpsc;

use super::{
    delivery::PendingSettlement, role, Link, LinkFrame, LinkState, ReceiverLink, SenderLink,
    DEFAULT_LINK_CREDIT,
};

/// Builder for a [`SenderLink`] or [`ReceiverLink`].
///
/// Source and target addresses are fixed at construction; everything else
/// starts from the protocol defaults (credit quantum
/// [`DEFAULT_LINK_CREDIT`], settle modes mixed/first, initial delivery
/// count 0, a fresh UUID for the name).
#[derive(Debug, Clone)]
pub struct Builder {
    name: Option<String>,
    source: Source,
    target: Target,
    link_credit: SequenceNo,
    snd_settle_mode: SenderSettleMode,
    rcv_settle_mode: ReceiverSettleMode,
    unsettled: Option<OrderedMap<Value, Value>>,
    incomplete_unsettled: bool,
    initial_delivery_count: SequenceNo,
    max_message_size: Option<u64>,
    available: Option<u32>,
    properties: Option<Fields>,
    desired_capabilities: Option<Array<Symbol>>,
}

impl Builder {
    /// Creates a builder for a link between the given source and target
    /// addresses.
    pub fn new(source_address: impl Into<String>, target_address: impl Into<String>) -> Self {
        Self {
            name: None,
            source: Source::builder().address(source_address).build(),
            target: Target::builder().address(target_address).build(),
            link_credit: DEFAULT_LINK_CREDIT,
            snd_settle_mode: SenderSettleMode::default(),
            rcv_settle_mode: ReceiverSettleMode::default(),
            unsettled: None,
            incomplete_unsettled: false,
            initial_delivery_count: 0,
            max_message_size: None,
            available: None,
            properties: None,
            desired_capabilities: None,
        }
    }

    /// The stable link name; defaults to a fresh UUID
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Credit replenishment quantum
    pub fn link_credit(mut self, link_credit: SequenceNo) -> Self {
        self.link_credit = link_credit;
        self
    }

    /// Settlement policy for the sender
    pub fn sender_settle_mode(mut self, mode: SenderSettleMode) -> Self {
        self.snd_settle_mode = mode;
        self
    }

    /// Settlement policy for the receiver
    pub fn receiver_settle_mode(mut self, mode: ReceiverSettleMode) -> Self {
        self.rcv_settle_mode = mode;
        self
    }

    /// Unsettled delivery recovery hints carried in the attach
    pub fn unsettled(mut self, unsettled: OrderedMap<Value, Value>) -> Self {
        self.unsettled = Some(unsettled);
        self
    }

    /// Whether the unsettled map is known to be incomplete
    pub fn incomplete_unsettled(mut self, incomplete: bool) -> Self {
        self.incomplete_unsettled = incomplete;
        self
    }

    /// Starting value for the delivery count; sent in the attach when the
    /// link is a sender
    pub fn initial_delivery_count(mut self, count: SequenceNo) -> Self {
        self.initial_delivery_count = count;
        self
    }

    /// Local maximum message size
    pub fn max_message_size(mut self, size: u64) -> Self {
        self.max_message_size = Some(size);
        self
    }

    /// Number of messages awaiting credit
    pub fn available(mut self, available: u32) -> Self {
        self.available = Some(available);
        self
    }

    /// Link properties
    pub fn properties(mut self, properties: Fields) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Capabilities desired from the peer
    pub fn desired_capabilities(
        mut self,
        capabilities: impl IntoIterator<Item = Symbol>,
    ) -> Self {
        self.desired_capabilities = Some(capabilities.into_iter().collect());
        self
    }

    /// Source durability
    pub fn source_durable(mut self, durable: TerminusDurability) -> Self {
        self.source.durable = durable;
        self
    }

    /// Source expiry policy
    pub fn source_expiry_policy(mut self, policy: TerminusExpiryPolicy) -> Self {
        self.source.expiry_policy = policy;
        self
    }

    /// Source timeout
    pub fn source_timeout(mut self, timeout: Seconds) -> Self {
        self.source.timeout = timeout;
        self
    }

    /// Whether the source node is dynamically created
    pub fn source_dynamic(mut self, dynamic: bool) -> Self {
        self.source.dynamic = dynamic;
        self
    }

    /// Properties of the dynamically created source node
    pub fn source_dynamic_node_properties(mut self, properties: Fields) -> Self {
        self.source.dynamic_node_properties = Some(properties);
        self
    }

    /// Source distribution mode
    pub fn source_distribution_mode(mut self, mode: impl Into<Symbol>) -> Self {
        self.source.distribution_mode = Some(mode.into());
        self
    }

    /// Source filter set
    pub fn source_filters(mut self, filter: Fields) -> Self {
        self.source.filter = Some(filter);
        self
    }

    /// Source default outcome
    pub fn source_default_outcome(mut self, outcome: Value) -> Self {
        self.source.default_outcome = Some(outcome);
        self
    }

    /// Outcomes the source supports
    pub fn source_outcomes(mut self, outcomes: impl IntoIterator<Item = Symbol>) -> Self {
        self.source.outcomes = Some(outcomes.into_iter().collect());
        self
    }

    /// Source capabilities
    pub fn source_capabilities(mut self, capabilities: impl IntoIterator<Item = Symbol>) -> Self {
        self.source.capabilities = Some(capabilities.into_iter().collect());
        self
    }

    /// Target durability
    pub fn target_durable(mut self, durable: TerminusDurability) -> Self {
        self.target.durable = durable;
        self
    }

    /// Target expiry policy
    pub fn target_expiry_policy(mut self, policy: TerminusExpiryPolicy) -> Self {
        self.target.expiry_policy = policy;
        self
    }

    /// Target timeout
    pub fn target_timeout(mut self, timeout: Seconds) -> Self {
        self.target.timeout = timeout;
        self
    }

    /// Whether the target node is dynamically created
    pub fn target_dynamic(mut self, dynamic: bool) -> Self {
        self.target.dynamic = dynamic;
        self
    }

    /// Properties of the dynamically created target node
    pub fn target_dynamic_node_properties(mut self, properties: Fields) -> Self {
        self.target.dynamic_node_properties = Some(properties);
        self
    }

    /// Target capabilities
    pub fn target_capabilities(mut self, capabilities: impl IntoIterator<Item = Symbol>) -> Self {
        self.target.capabilities = Some(capabilities.into_iter().collect());
        self
    }

    /// Builds the sending end of the link.
    pub fn build_sender(
        self,
        handle: impl Into<Handle>,
        outgoing: mpsc::Sender<LinkFrame>,
    ) -> SenderLink {
        self.build(handle.into(), outgoing)
    }

    /// Builds the receiving end of the link.
    pub fn build_receiver(
        self,
        handle: impl Into<Handle>,
        outgoing: mpsc::Sender<LinkFrame>,
    ) -> ReceiverLink {
        self.build(handle.into(), outgoing)
    }

    fn build<R, M>(self, handle: Handle, outgoing: mpsc::Sender<LinkFrame>) -> Link<R, M>
    where
        R: role::IntoRole,
        M: PendingSettlement,
    {
        Link {
            role: PhantomData,
            state: LinkState::Detached,
            name: self
                .name
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            handle,
            remote_handle: None,
            snd_settle_mode: self.snd_settle_mode,
            rcv_settle_mode: self.rcv_settle_mode,
            source: Some(self.source),
            target: Some(self.target),
            link_credit: self.link_credit,
            current_link_credit: self.link_credit,
            initial_delivery_count: self.initial_delivery_count,
            delivery_count: self.initial_delivery_count,
            received_delivery_id: None,
            unsettled: self.unsettled,
            incomplete_unsettled: self.incomplete_unsettled,
            max_message_size: self.max_message_size,
            remote_max_message_size: None,
            available: self.available,
            offered_capabilities: None,
            desired_capabilities: self.desired_capabilities,
            properties: self.properties,
            is_closed: false,
            pending_deliveries: HashMap::new(),
            outgoing,
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use crate::link::{LinkState, DEFAULT_LINK_CREDIT};

    use super::Builder;

    #[test]
    fn defaults_follow_the_protocol() {
        let (tx, _rx) = mpsc::channel(1);
        let link = Builder::new("q1", "q2").build_sender(0, tx);

        assert_eq!(link.state(), LinkState::Detached);
        assert_eq!(link.current_link_credit(), DEFAULT_LINK_CREDIT);
        assert_eq!(link.delivery_count(), 0);
        assert!(!link.is_closed());
        assert_eq!(
            link.source.as_ref().unwrap().address.as_deref(),
            Some("q1")
        );
        assert_eq!(
            link.target.as_ref().unwrap().address.as_deref(),
            Some("q2")
        );
        // the default name is a fresh UUID
        assert_eq!(link.name().len(), 36);
    }

    #[test]
    fn explicit_name_is_kept() {
        let (tx, _rx) = mpsc::channel(1);
        let link = Builder::new("q1", "q2")
            .name("sender-link-1")
            .build_receiver(1, tx);
        assert_eq!(link.name(), "sender-link-1");
        assert_eq!(u32::from(link.handle()), 1);
    }
}
