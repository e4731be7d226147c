use ferrite_amqp_types::{
    definitions::{Fields, Handle, SequenceNo},
    performatives::{Attach, Detach, Disposition, Flow, Transfer},
};

use crate::Payload;

/// Frames a link hands to its session's outgoing queue.
///
/// The session owns the window fields of the flow performative and the
/// channel assignment; the link only supplies the handle-scoped state.
#[derive(Debug)]
pub enum LinkFrame {
    /// Attach performative
    Attach(Attach),

    /// Handle-scoped flow state
    Flow(LinkFlow),

    /// Transfer performative with its payload
    Transfer {
        /// Transfer performative
        performative: Transfer,

        /// Binary payload
        payload: Payload,
    },

    /// Disposition performative
    Disposition(Disposition),

    /// Detach performative
    Detach(Detach),
}

/// A subset of the fields in the Flow performative
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LinkFlow {
    /// Link handle
    pub handle: Handle,

    /// The endpoint's value for the delivery-count sequence number
    pub delivery_count: Option<SequenceNo>,

    /// The current maximum number of messages that can be received
    pub link_credit: Option<u32>,

    /// The number of available messages
    pub available: Option<u32>,

    /// Indicates drain mode
    pub drain: bool,

    /// Request state from partner
    pub echo: bool,

    /// Link state properties
    pub properties: Option<Fields>,
}

impl TryFrom<Flow> for LinkFlow {
    type Error = ();

    fn try_from(value: Flow) -> Result<Self, Self::Error> {
        let flow = LinkFlow {
            handle: value.handle.ok_or(())?,
            delivery_count: value.delivery_count,
            link_credit: value.link_credit,
            available: value.available,
            drain: value.drain,
            echo: value.echo,
            properties: value.properties,
        };
        Ok(flow)
    }
}
