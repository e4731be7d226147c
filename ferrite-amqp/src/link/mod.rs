//! Implements the AMQP 1.0 link state machine
//!
//! A link is a uni-directional conduit between one endpoint on each peer,
//! distinguished by handle within a session. The state machine here drives
//! the attach/detach handshakes, credit-based flow control, and delivery
//! bookkeeping; everything it emits goes through the session's outgoing
//! queue, and everything it reacts to is handed in by the session's
//! dispatcher.

mod frame;
use std::{collections::HashMap, marker::PhantomData};

use ferrite_amqp_codec::{
    primitives::{Array, OrderedMap, Symbol},
    Value,
};
use ferrite_amqp_types::{
    definitions::{
        self, DeliveryNumber, DeliveryTag, Fields, Handle, ReceiverSettleMode, Role,
        SenderSettleMode, SequenceNo,
    },
    messaging::{Source, Target},
    performatives::{Attach, Detach},
    SessionState,
};
pub use frame::{LinkFlow, LinkFrame};

pub mod builder;
pub mod delivery;
mod error;
mod receiver;
mod sender;

pub(crate) mod state;

pub use builder::Builder;
pub use error::*;
pub use state::LinkState;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace};

use self::delivery::{NoPending, PendingDelivery, PendingSettlement, SettleReason};

/// Default amount of link credit
pub const DEFAULT_LINK_CREDIT: SequenceNo = 300;

/// Type alias for the link driving the sending end
pub type SenderLink = Link<role::Sender, PendingDelivery>;

/// Type alias for the link driving the receiving end
pub type ReceiverLink = Link<role::Receiver, NoPending>;

pub mod role {
    //! Type state definition of link role

    use ferrite_amqp_types::definitions::Role;

    /// Type state for the sending end of a link
    #[derive(Debug)]
    pub struct Sender {}

    /// Type state for the receiving end of a link
    #[derive(Debug)]
    pub struct Receiver {}

    pub(crate) trait IntoRole {
        fn into_role() -> Role;
    }

    impl IntoRole for Sender {
        fn into_role() -> Role {
            Role::Sender
        }
    }

    impl IntoRole for Receiver {
        fn into_role() -> Role {
            Role::Receiver
        }
    }
}

/// Manages the link state
///
/// # Type Parameters
///
/// R: role
///
/// M: pending delivery record; only the sender specialization keeps
/// in-flight deliveries, the receiver's record type is uninhabited
#[derive(Debug)]
pub struct Link<R, M> {
    pub(crate) role: PhantomData<R>,

    pub(crate) state: LinkState,

    pub(crate) name: String,

    /// Local handle number
    pub(crate) handle: Handle,

    /// Peer's handle, learned on incoming attach
    pub(crate) remote_handle: Option<Handle>,

    pub(crate) snd_settle_mode: SenderSettleMode,
    pub(crate) rcv_settle_mode: ReceiverSettleMode,

    pub(crate) source: Option<Source>,
    pub(crate) target: Option<Target>,

    /// Configured credit replenishment quantum
    pub(crate) link_credit: SequenceNo,

    /// Remaining credit before the next flow
    pub(crate) current_link_credit: SequenceNo,

    pub(crate) initial_delivery_count: SequenceNo,
    pub(crate) delivery_count: SequenceNo,
    pub(crate) received_delivery_id: Option<DeliveryNumber>,

    /// Recovery hints carried in the attach
    pub(crate) unsettled: Option<OrderedMap<Value, Value>>,
    pub(crate) incomplete_unsettled: bool,

    pub(crate) max_message_size: Option<u64>,
    pub(crate) remote_max_message_size: Option<u64>,

    pub(crate) available: Option<u32>,

    pub(crate) offered_capabilities: Option<Array<Symbol>>,
    pub(crate) desired_capabilities: Option<Array<Symbol>>,
    pub(crate) properties: Option<Fields>,

    /// Terminal flag, set after a closing detach goes out
    pub(crate) is_closed: bool,

    pub(crate) pending_deliveries: HashMap<DeliveryTag, M>,

    /// The session's outgoing queue; every frame emission suspends here
    pub(crate) outgoing: mpsc::Sender<LinkFrame>,
}

impl<R, M> Link<R, M> {
    /// Current link state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The stable link name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local handle number
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The peer's handle, once an attach arrived
    pub fn remote_handle(&self) -> Option<Handle> {
        self.remote_handle
    }

    /// The peer's advertised max message size, once an attach arrived
    pub fn remote_max_message_size(&self) -> Option<u64> {
        self.remote_max_message_size
    }

    /// Whether a closing detach has been emitted
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Remaining credit before the next flow
    pub fn current_link_credit(&self) -> SequenceNo {
        self.current_link_credit
    }

    /// Running delivery count
    pub fn delivery_count(&self) -> SequenceNo {
        self.delivery_count
    }

    /// Last delivery-id observed on an incoming transfer
    pub fn received_delivery_id(&self) -> Option<DeliveryNumber> {
        self.received_delivery_id
    }

    /// Number of deliveries awaiting settlement
    pub fn pending_delivery_count(&self) -> usize {
        self.pending_deliveries.len()
    }
}

impl<R, M> Link<R, M>
where
    R: role::IntoRole,
    M: PendingSettlement,
{
    /// Updates the link state and yields once so state observers are not
    /// starved.
    async fn set_state(&mut self, new_state: LinkState) {
        let previous_state = self.state;
        self.state = new_state;
        debug!(link = %self.name, ?previous_state, ?new_state, "link state changed");
        tokio::task::yield_now().await;
    }

    /// Notifies every pending delivery that it will not be delivered, then
    /// clears the map. The notifications are joined before control returns.
    async fn remove_pending_deliveries(&mut self) {
        let notifications: Vec<_> = self
            .pending_deliveries
            .drain()
            .map(|(_, delivery)| async move {
                delivery.settle(SettleReason::NotDelivered, None);
            })
            .collect();
        join_all(notifications).await;
    }

    /// Replenishes credit and emits a flow once the current credit is spent.
    pub(crate) async fn evaluate_status(&mut self) -> Result<(), LinkStateError> {
        if self.current_link_credit == 0 {
            self.current_link_credit = self.link_credit;
            self.outgoing_flow().await?;
        }
        Ok(())
    }

    async fn outgoing_flow(&mut self) -> Result<(), LinkStateError> {
        let flow = LinkFlow {
            handle: self.handle,
            delivery_count: Some(self.delivery_count),
            link_credit: Some(self.current_link_credit),
            available: None,
            drain: false,
            echo: false,
            properties: None,
        };
        self.outgoing
            .send(LinkFrame::Flow(flow))
            .await
            .map_err(|_| LinkStateError::IllegalSessionState)
    }

    async fn outgoing_attach(&mut self) -> Result<(), AttachError> {
        // the running count restarts from the configured initial value at
        // every (re-)attach
        self.delivery_count = self.initial_delivery_count;
        let attach = Attach {
            name: self.name.clone(),
            handle: self.handle,
            role: R::into_role(),
            snd_settle_mode: self.snd_settle_mode,
            rcv_settle_mode: self.rcv_settle_mode,
            source: self.source.clone(),
            target: self.target.clone(),
            unsettled: self.unsettled.clone(),
            incomplete_unsettled: self.incomplete_unsettled,
            initial_delivery_count: match R::into_role() {
                Role::Sender => Some(self.initial_delivery_count),
                Role::Receiver => None,
            },
            max_message_size: self.max_message_size,
            // offered only when answering a peer's attach, desired only
            // when opening the handshake
            offered_capabilities: match self.state {
                LinkState::AttachReceived => self.offered_capabilities.clone(),
                _ => None,
            },
            desired_capabilities: match self.state {
                LinkState::Detached => self.desired_capabilities.clone(),
                _ => None,
            },
            properties: self.properties.clone(),
        };
        trace!(link = %self.name, attach = ?attach, "sending attach");
        self.outgoing
            .send(LinkFrame::Attach(attach))
            .await
            .map_err(|_| AttachError::IllegalSessionState)
    }

    async fn outgoing_detach(
        &mut self,
        closed: bool,
        error: Option<definitions::Error>,
    ) -> Result<(), DetachError> {
        let detach = Detach {
            handle: self.handle,
            closed,
            error,
        };
        trace!(link = %self.name, detach = ?detach, "sending detach");
        self.outgoing
            .send(LinkFrame::Detach(detach))
            .await
            .map_err(|_| DetachError::IllegalSessionState)?;
        if closed {
            self.is_closed = true;
        }
        Ok(())
    }

    /// Opens the attach handshake from the local side.
    ///
    /// The error state is terminal; re-attaching requires a fresh link.
    pub async fn attach(&mut self) -> Result<(), AttachError> {
        if self.is_closed {
            return Err(AttachError::LinkClosed);
        }
        if self.state == LinkState::Error {
            return Err(AttachError::IllegalState);
        }
        self.outgoing_attach().await?;
        match self.state {
            LinkState::AttachReceived => self.set_state(LinkState::Attached).await,
            _ => self.set_state(LinkState::AttachSent).await,
        }
        Ok(())
    }

    /// Detaches the link; a closing detach makes the closure permanent.
    #[instrument(skip_all, fields(link = %self.name))]
    pub async fn detach(
        &mut self,
        close: bool,
        error: Option<definitions::Error>,
    ) -> Result<(), DetachError> {
        if self.is_closed {
            return Err(DetachError::LinkClosed);
        }
        self.remove_pending_deliveries().await;
        match self.state {
            LinkState::AttachSent | LinkState::AttachReceived => {
                self.outgoing_detach(close, error).await?;
                self.set_state(LinkState::Detached).await;
            }
            LinkState::Attached => {
                self.outgoing_detach(close, error).await?;
                // half-closed: the handshake completes when the peer's
                // reciprocal detach arrives
                self.set_state(LinkState::AttachSent).await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handles the peer's attach.
    ///
    /// A peer that omits source or target never produces or accepts
    /// messages; the link clears its pendings and refuses the attach. No
    /// detach is transmitted for it, matching the behavior this
    /// implementation is ported against.
    pub async fn on_incoming_attach(&mut self, attach: Attach) -> Result<(), AttachError> {
        if self.is_closed {
            return Err(AttachError::LinkClosed);
        }
        if attach.source.is_none() {
            debug!(link = %self.name, "peer attach carried no source, detaching");
            self.remove_pending_deliveries().await;
            self.set_state(LinkState::Detached).await;
            return Err(AttachError::IncompleteSource);
        }
        if attach.target.is_none() {
            debug!(link = %self.name, "peer attach carried no target, detaching");
            self.remove_pending_deliveries().await;
            self.set_state(LinkState::Detached).await;
            return Err(AttachError::IncompleteTarget);
        }

        self.remote_handle = Some(attach.handle);
        self.remote_max_message_size = attach.max_message_size;
        self.offered_capabilities = attach.offered_capabilities;
        // peer values win on key conflict
        if let Some(peer_properties) = attach.properties {
            match &mut self.properties {
                Some(properties) => {
                    for (key, value) in peer_properties {
                        properties.insert(key, value);
                    }
                }
                None => self.properties = Some(peer_properties),
            }
        }

        match self.state {
            LinkState::Detached => self.set_state(LinkState::AttachReceived).await,
            LinkState::AttachSent => self.set_state(LinkState::Attached).await,
            _ => {}
        }
        Ok(())
    }

    /// Handles the peer's detach.
    #[instrument(skip_all, fields(link = %self.name))]
    pub async fn on_incoming_detach(&mut self, detach: Detach) -> Result<(), LinkStateError> {
        trace!(detach = ?detach);
        if self.state == LinkState::Attached {
            // reply with a detach mirroring the closed flag
            self.outgoing_detach(detach.closed, None).await?;
        } else if detach.closed
            && !self.is_closed
            && matches!(
                self.state,
                LinkState::AttachSent | LinkState::AttachReceived
            )
        {
            // Received a closing detach after we sent a non-closing detach.
            // We MUST signal that we closed by reattaching and then sending
            // a closing detach.
            self.outgoing_attach().await.map_err(LinkStateError::from)?;
            self.outgoing_detach(true, None).await?;
        }
        self.remove_pending_deliveries().await;
        match detach.error {
            Some(error) => {
                self.set_state(LinkState::Error).await;
                Err(LinkStateError::RemoteDetachedWithError(error))
            }
            None => {
                self.set_state(LinkState::Detached).await;
                Ok(())
            }
        }
    }

    /// Reacts to a session state change reported by the session's event
    /// loop.
    pub async fn on_session_state_change(
        &mut self,
        session_state: SessionState,
    ) -> Result<(), AttachError> {
        match session_state {
            SessionState::Mapped => {
                if !self.is_closed && self.state == LinkState::Detached {
                    self.outgoing_attach().await?;
                    self.set_state(LinkState::AttachSent).await;
                }
            }
            SessionState::Discarding => {
                self.remove_pending_deliveries().await;
                self.set_state(LinkState::Detached).await;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ferrite_amqp_types::definitions::{AmqpError, Role};
    use tokio::sync::mpsc;

    use super::*;

    fn remote_attach(handle: u32) -> Attach {
        Attach {
            name: "peer".to_string(),
            handle: handle.into(),
            role: Role::Receiver,
            snd_settle_mode: Default::default(),
            rcv_settle_mode: Default::default(),
            source: Some(Source::from("q1")),
            target: Some(Target::from("q1")),
            unsettled: None,
            incomplete_unsettled: false,
            initial_delivery_count: None,
            max_message_size: Some(65536),
            offered_capabilities: None,
            desired_capabilities: None,
            properties: None,
        }
    }

    #[tokio::test]
    async fn session_mapped_triggers_attach() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1")
            .initial_delivery_count(7)
            .build_sender(0, tx);

        link.on_session_state_change(SessionState::Mapped)
            .await
            .unwrap();

        assert_eq!(link.state(), LinkState::AttachSent);
        match rx.try_recv().unwrap() {
            LinkFrame::Attach(attach) => {
                assert_eq!(attach.initial_delivery_count, Some(7));
                assert_eq!(attach.role, Role::Sender);
            }
            other => panic!("expected attach, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn incoming_attach_completes_the_handshake() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);

        link.attach().await.unwrap();
        let _ = rx.try_recv().unwrap();
        assert_eq!(link.state(), LinkState::AttachSent);

        link.on_incoming_attach(remote_attach(3)).await.unwrap();
        assert_eq!(link.state(), LinkState::Attached);
        assert_eq!(link.remote_handle(), Some(3.into()));
        assert_eq!(link.remote_max_message_size(), Some(65536));
    }

    #[tokio::test]
    async fn incoming_attach_before_local_attach_is_recorded() {
        let (tx, _rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_receiver(0, tx);

        link.on_incoming_attach(remote_attach(9)).await.unwrap();
        assert_eq!(link.state(), LinkState::AttachReceived);
    }

    #[tokio::test]
    async fn incoming_attach_without_source_is_an_invalid_link() {
        let (tx, _rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);
        link.attach().await.unwrap();

        let mut attach = remote_attach(3);
        attach.source = None;
        let err = link.on_incoming_attach(attach).await.unwrap_err();
        assert_eq!(err, AttachError::IncompleteSource);
        assert_eq!(link.state(), LinkState::Detached);
        assert_eq!(link.pending_delivery_count(), 0);
    }

    #[tokio::test]
    async fn peer_properties_win_on_conflict() {
        use ferrite_amqp_codec::Value;

        let mut properties = Fields::new();
        properties.insert(Symbol::new("ttl"), Value::UInt(1));
        properties.insert(Symbol::new("mine"), Value::Bool(true));

        let (tx, _rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1")
            .properties(properties)
            .build_sender(0, tx);
        link.attach().await.unwrap();

        let mut attach = remote_attach(3);
        let mut peer_properties = Fields::new();
        peer_properties.insert(Symbol::new("ttl"), Value::UInt(9));
        attach.properties = Some(peer_properties);
        link.on_incoming_attach(attach).await.unwrap();

        let merged = link.properties.as_ref().unwrap();
        assert_eq!(merged.get(&Symbol::new("ttl")), Some(&Value::UInt(9)));
        assert_eq!(merged.get(&Symbol::new("mine")), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn attached_incoming_detach_is_mirrored() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);
        link.attach().await.unwrap();
        link.on_incoming_attach(remote_attach(3)).await.unwrap();
        let _ = rx.try_recv().unwrap();

        let detach = Detach {
            handle: 3.into(),
            closed: false,
            error: None,
        };
        link.on_incoming_detach(detach).await.unwrap();

        assert_eq!(link.state(), LinkState::Detached);
        match rx.try_recv().unwrap() {
            LinkFrame::Detach(reply) => assert!(!reply.closed),
            other => panic!("expected detach, got {:?}", other),
        }
        assert!(!link.is_closed());
    }

    #[tokio::test]
    async fn closing_detach_after_non_closing_detach_reattaches_then_closes() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);
        link.attach().await.unwrap();
        link.on_incoming_attach(remote_attach(3)).await.unwrap();
        let _ = rx.try_recv().unwrap();

        // we detach without closing; half-closed handshake
        link.detach(false, None).await.unwrap();
        assert_eq!(link.state(), LinkState::AttachSent);
        let _ = rx.try_recv().unwrap();

        // peer answers with a closing detach
        let detach = Detach {
            handle: 3.into(),
            closed: true,
            error: None,
        };
        link.on_incoming_detach(detach).await.unwrap();

        // the protocol's symmetry demands attach then closing detach
        match rx.try_recv().unwrap() {
            LinkFrame::Attach(_) => {}
            other => panic!("expected attach, got {:?}", other),
        }
        match rx.try_recv().unwrap() {
            LinkFrame::Detach(reply) => assert!(reply.closed),
            other => panic!("expected detach, got {:?}", other),
        }
        assert_eq!(link.state(), LinkState::Detached);
        assert!(link.is_closed());
    }

    #[tokio::test]
    async fn incoming_detach_with_error_is_terminal() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);
        link.attach().await.unwrap();
        link.on_incoming_attach(remote_attach(3)).await.unwrap();
        let _ = rx.try_recv().unwrap();

        let detach = Detach {
            handle: 3.into(),
            closed: false,
            error: Some(definitions::Error::new(
                AmqpError::InternalError,
                Some("broker shutting down".to_string()),
                None,
            )),
        };
        let err = link.on_incoming_detach(detach).await.unwrap_err();
        assert!(matches!(err, LinkStateError::RemoteDetachedWithError(_)));
        assert_eq!(link.state(), LinkState::Error);

        // the error state is terminal; a fresh link is required
        assert_eq!(link.attach().await.unwrap_err(), AttachError::IllegalState);
    }

    #[tokio::test]
    async fn session_discarding_clears_the_link() {
        let (tx, _rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);
        link.attach().await.unwrap();
        link.on_incoming_attach(remote_attach(3)).await.unwrap();

        link.on_session_state_change(SessionState::Discarding)
            .await
            .unwrap();
        assert_eq!(link.state(), LinkState::Detached);
        assert_eq!(link.pending_delivery_count(), 0);
    }

    #[tokio::test]
    async fn closed_link_refuses_to_attach() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut link = Builder::new("q1", "q1").build_sender(0, tx);
        link.attach().await.unwrap();
        link.on_incoming_attach(remote_attach(3)).await.unwrap();
        let _ = rx.try_recv().unwrap();

        link.detach(true, None).await.unwrap();
        assert!(link.is_closed());
        assert_eq!(link.attach().await.unwrap_err(), AttachError::LinkClosed);
        assert_eq!(
            link.detach(true, None).await.unwrap_err(),
            DetachError::LinkClosed
        );
    }
}
