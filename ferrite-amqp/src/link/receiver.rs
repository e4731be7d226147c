//! Receiver side of the link

use ferrite_amqp_codec::Value;
use ferrite_amqp_types::{
    definitions::{DeliveryNumber, Role},
    messaging::Sections,
    performatives::{Disposition, Flow, Transfer},
};
use tracing::trace;

use super::{LinkFrame, LinkState, LinkStateError, ReceiverLink};

impl ReceiverLink {
    /// Books an incoming transfer against the link's credit and hands the
    /// delivery back to the caller.
    ///
    /// Spending the last credit replenishes it and emits a flow.
    pub async fn on_incoming_transfer(
        &mut self,
        transfer: Transfer,
        sections: Option<Sections>,
    ) -> Result<(Transfer, Option<Sections>), LinkStateError> {
        if self.state != LinkState::Attached {
            return Err(LinkStateError::IllegalState);
        }
        trace!(link = %self.name, delivery_id = ?transfer.delivery_id, "incoming transfer");

        if let Some(delivery_id) = transfer.delivery_id {
            self.received_delivery_id = Some(delivery_id);
        }
        self.current_link_credit = self.current_link_credit.saturating_sub(1);
        self.delivery_count = self.delivery_count.wrapping_add(1);
        self.evaluate_status().await?;

        Ok((transfer, sections))
    }

    /// Reports a delivery state for one received delivery.
    pub async fn send_disposition(
        &mut self,
        delivery_id: DeliveryNumber,
        state: Option<Value>,
        settled: bool,
    ) -> Result<(), LinkStateError> {
        let disposition = Disposition {
            role: Role::Receiver,
            first: delivery_id,
            last: None,
            settled,
            state,
            batchable: false,
        };
        self.outgoing
            .send(LinkFrame::Disposition(disposition))
            .await
            .map_err(|_| LinkStateError::IllegalSessionState)
    }

    /// Records the sender's view carried by an incoming flow.
    pub async fn on_incoming_flow(&mut self, flow: Flow) {
        if flow.handle.is_none() {
            return;
        }
        // despite its name the delivery-count is a sequence number owned by
        // the sender; the receiver tracks the last known value
        if let Some(delivery_count) = flow.delivery_count {
            self.delivery_count = delivery_count;
        }
        if let Some(available) = flow.available {
            self.available = Some(available);
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use ferrite_amqp_types::{
        messaging::{Source, Target},
        performatives::Attach,
    };
    use tokio::sync::mpsc;

    use crate::link::Builder;

    use super::*;

    async fn attached_receiver(
        credit: u32,
    ) -> (ReceiverLink, mpsc::Receiver<LinkFrame>) {
        let (tx, mut rx) = mpsc::channel(32);
        let mut link = Builder::new("q1", "q1")
            .name("receiver-link-1")
            .link_credit(credit)
            .build_receiver(0, tx);
        link.attach().await.unwrap();
        let _ = rx.try_recv().unwrap();
        let attach = Attach {
            name: "peer".to_string(),
            handle: 3.into(),
            role: Role::Sender,
            snd_settle_mode: Default::default(),
            rcv_settle_mode: Default::default(),
            source: Some(Source::from("q1")),
            target: Some(Target::from("q1")),
            unsettled: None,
            incomplete_unsettled: false,
            initial_delivery_count: Some(0),
            max_message_size: None,
            offered_capabilities: None,
            desired_capabilities: None,
            properties: None,
        };
        link.on_incoming_attach(attach).await.unwrap();
        (link, rx)
    }

    fn transfer(delivery_id: u32) -> Transfer {
        Transfer {
            handle: 3.into(),
            delivery_id: Some(delivery_id),
            delivery_tag: Some(Bytes::from_static(b"tag")),
            message_format: Some(0),
            settled: Some(false),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn transfer_is_booked_against_credit() {
        let (mut link, _rx) = attached_receiver(10).await;

        link.on_incoming_transfer(transfer(5), None).await.unwrap();

        assert_eq!(link.received_delivery_id(), Some(5));
        assert_eq!(link.current_link_credit(), 9);
        assert_eq!(link.delivery_count(), 1);
    }

    #[tokio::test]
    async fn exhausted_credit_is_replenished_with_a_flow() {
        let (mut link, mut rx) = attached_receiver(2).await;

        link.on_incoming_transfer(transfer(0), None).await.unwrap();
        link.on_incoming_transfer(transfer(1), None).await.unwrap();

        match rx.try_recv().unwrap() {
            LinkFrame::Flow(flow) => {
                assert_eq!(flow.link_credit, Some(2));
                assert_eq!(flow.delivery_count, Some(2));
            }
            other => panic!("expected flow, got {:?}", other),
        }
        assert_eq!(link.current_link_credit(), 2);
    }

    #[tokio::test]
    async fn disposition_reports_the_delivery_state() {
        use ferrite_amqp_codec::{primitives::OrderedMap, Value};

        let (mut link, mut rx) = attached_receiver(10).await;
        link.on_incoming_transfer(transfer(0), None).await.unwrap();

        let mut accepted = OrderedMap::new();
        accepted.insert(
            Value::String("accepted".to_string()),
            Value::List(Vec::new()),
        );
        link.send_disposition(0, Some(Value::Map(accepted.clone())), true)
            .await
            .unwrap();

        match rx.try_recv().unwrap() {
            LinkFrame::Disposition(disposition) => {
                assert_eq!(disposition.role, Role::Receiver);
                assert_eq!(disposition.first, 0);
                assert!(disposition.settled);
                assert_eq!(disposition.state, Some(Value::Map(accepted)));
            }
            other => panic!("expected disposition, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sender_flow_updates_the_last_known_count() {
        let (mut link, _rx) = attached_receiver(10).await;

        let flow = Flow {
            next_incoming_id: Some(0),
            incoming_window: 64,
            next_outgoing_id: 0,
            outgoing_window: 64,
            handle: Some(0.into()),
            delivery_count: Some(12),
            link_credit: None,
            available: Some(3),
            drain: false,
            echo: false,
            properties: None,
        };
        link.on_incoming_flow(flow).await;
        assert_eq!(link.delivery_count(), 12);
        assert_eq!(link.available, Some(3));
    }
}
