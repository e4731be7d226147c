//! Delivery settlement bookkeeping for the sender side.

use ferrite_amqp_codec::Value;
use ferrite_amqp_types::definitions::DeliveryNumber;
use tokio::sync::oneshot;

/// Why a pending delivery left the unsettled map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleReason {
    /// The peer reported a delivery state through a disposition
    DispositionReceived,

    /// The delivery was sent pre-settled
    Settled,

    /// The link detached or the session was discarded before the peer
    /// reported anything
    NotDelivered,

    /// The delivery timed out waiting for settlement
    Timeout,

    /// The caller cancelled the delivery
    Cancelled,
}

/// The terminal report for one delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    /// Why the delivery settled
    pub reason: SettleReason,

    /// The delivery state the peer reported, if any
    pub state: Option<Value>,
}

/// How a sent delivery will resolve.
#[derive(Debug)]
pub enum Settlement {
    /// The delivery went out pre-settled; nothing further will arrive
    Settled,

    /// The delivery awaits a peer disposition (or a detach)
    Unsettled {
        /// The delivery id the transfer carried
        delivery_id: DeliveryNumber,

        /// Resolves when the delivery settles
        outcome: oneshot::Receiver<DeliveryOutcome>,
    },
}

/// A sender-side in-flight delivery awaiting settlement.
#[derive(Debug)]
pub struct PendingDelivery {
    delivery_id: DeliveryNumber,
    notifier: oneshot::Sender<DeliveryOutcome>,
}

impl PendingDelivery {
    pub(crate) fn new(delivery_id: DeliveryNumber) -> (Self, oneshot::Receiver<DeliveryOutcome>) {
        let (notifier, outcome) = oneshot::channel();
        (
            Self {
                delivery_id,
                notifier,
            },
            outcome,
        )
    }

    pub(crate) fn delivery_id(&self) -> DeliveryNumber {
        self.delivery_id
    }

    /// Report the terminal state; the receiving end may already be gone,
    /// which is not an error.
    pub(crate) fn settle(self, reason: SettleReason, state: Option<Value>) {
        let _ = self.notifier.send(DeliveryOutcome { reason, state });
    }
}

/// Uninhabited pending record for roles that keep no in-flight deliveries.
#[derive(Debug)]
pub enum NoPending {}

pub(crate) trait PendingSettlement {
    fn delivery_id(&self) -> DeliveryNumber;

    fn settle(self, reason: SettleReason, state: Option<Value>);
}

impl PendingSettlement for PendingDelivery {
    fn delivery_id(&self) -> DeliveryNumber {
        PendingDelivery::delivery_id(self)
    }

    fn settle(self, reason: SettleReason, state: Option<Value>) {
        PendingDelivery::settle(self, reason, state)
    }
}

impl PendingSettlement for NoPending {
    fn delivery_id(&self) -> DeliveryNumber {
        match *self {}
    }

    fn settle(self, _reason: SettleReason, _state: Option<Value>) {
        match self {}
    }
}
