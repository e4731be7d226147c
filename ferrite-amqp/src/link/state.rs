//! Link state

/// Link state.
///
/// There is no official definition of the link state in the specification;
/// these are the states the attach/detach handshake moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// The initial state, and the state after a completed detach
    Detached,

    /// An attach frame has been sent
    AttachSent,

    /// An attach frame has been received
    AttachReceived,

    /// The link is attached
    Attached,

    /// The peer detached with an error; terminal, a fresh link is required
    /// to re-attach
    Error,
}
