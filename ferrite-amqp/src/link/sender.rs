//! Sender side of the link

use ferrite_amqp_types::{
    definitions::DeliveryTag,
    performatives::{Disposition, Flow, Transfer},
};
use tracing::trace;

use crate::Payload;

use super::{
    delivery::{PendingDelivery, SettleReason, Settlement},
    LinkFrame, LinkState, LinkStateError, SenderLink,
};

impl SenderLink {
    /// Sends one delivery as a single transfer frame.
    ///
    /// Consumes one credit and advances the delivery count. An unsettled
    /// delivery is parked in the pending map until the peer's disposition
    /// (or a detach) settles it; a pre-settled delivery resolves
    /// immediately.
    pub async fn send_transfer(
        &mut self,
        delivery_tag: DeliveryTag,
        payload: Payload,
        settled: bool,
    ) -> Result<Settlement, LinkStateError> {
        if self.is_closed {
            return Err(LinkStateError::LinkClosed);
        }
        if self.state != LinkState::Attached {
            return Err(LinkStateError::IllegalState);
        }

        let delivery_id = self.delivery_count;
        self.delivery_count = self.delivery_count.wrapping_add(1);
        self.current_link_credit = self.current_link_credit.saturating_sub(1);

        let transfer = Transfer {
            handle: self.handle,
            delivery_id: Some(delivery_id),
            delivery_tag: Some(delivery_tag.clone()),
            message_format: Some(0),
            settled: Some(settled),
            ..Default::default()
        };
        trace!(link = %self.name, delivery_id, "sending transfer");
        self.outgoing
            .send(LinkFrame::Transfer {
                performative: transfer,
                payload,
            })
            .await
            .map_err(|_| LinkStateError::IllegalSessionState)?;

        let settlement = if settled {
            Settlement::Settled
        } else {
            let (pending, outcome) = PendingDelivery::new(delivery_id);
            self.pending_deliveries.insert(delivery_tag, pending);
            Settlement::Unsettled {
                delivery_id,
                outcome,
            }
        };

        self.evaluate_status().await?;
        Ok(settlement)
    }

    /// Settles pending deliveries covered by the peer's disposition range.
    pub async fn on_incoming_disposition(&mut self, disposition: Disposition) {
        let last = disposition.last.unwrap_or(disposition.first);
        let range = disposition.first..=last;
        let tags: Vec<DeliveryTag> = self
            .pending_deliveries
            .iter()
            .filter(|(_, pending)| range.contains(&pending.delivery_id()))
            .map(|(tag, _)| tag.clone())
            .collect();
        for tag in tags {
            if let Some(pending) = self.pending_deliveries.remove(&tag) {
                pending.settle(SettleReason::DispositionReceived, disposition.state.clone());
            }
        }
    }

    /// Applies the receiver's credit grant.
    ///
    /// link-credit_snd := delivery-count_rcv + link-credit_rcv -
    /// delivery-count_snd. If the receiver does not yet know the
    /// delivery-count, the initial value from the attach applies.
    pub async fn on_incoming_flow(&mut self, flow: Flow) {
        if flow.handle.is_none() {
            // session-scoped flow state, nothing link-local to apply
            return;
        }
        let delivery_count_rcv = flow.delivery_count.unwrap_or(self.initial_delivery_count);
        if let Some(link_credit_rcv) = flow.link_credit {
            self.current_link_credit = delivery_count_rcv
                .wrapping_add(link_credit_rcv)
                .wrapping_sub(self.delivery_count);
        }
    }
}
