use ferrite_amqp_types::definitions;

/// Errors from the attach handshake
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttachError {
    /// The link saw a closing detach and cannot be re-attached
    #[error("Link is permanently closed")]
    LinkClosed,

    /// The session side of the outgoing queue has dropped
    #[error("Session must have dropped")]
    IllegalSessionState,

    /// The peer's attach carried no source
    #[error("Invalid link: peer attach carried no source")]
    IncompleteSource,

    /// The peer's attach carried no target
    #[error("Invalid link: peer attach carried no target")]
    IncompleteTarget,

    /// The link is in its terminal error state; re-attaching requires a
    /// fresh link
    #[error("Illegal link state")]
    IllegalState,
}

/// Errors from the detach handshake
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetachError {
    /// The link is already closed
    #[error("Link is permanently closed")]
    LinkClosed,

    /// The session side of the outgoing queue has dropped
    #[error("Session must have dropped")]
    IllegalSessionState,
}

/// Errors surfaced while the link reacts to incoming frames or moves
/// deliveries
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkStateError {
    /// The peer detached with an error body; the link is now in its
    /// terminal error state
    #[error("Peer detached with error: {:?}", .0)]
    RemoteDetachedWithError(definitions::Error),

    /// The operation is not valid in the current link state
    #[error("Illegal link state")]
    IllegalState,

    /// The link is permanently closed
    #[error("Link is permanently closed")]
    LinkClosed,

    /// The session side of the outgoing queue has dropped
    #[error("Session must have dropped")]
    IllegalSessionState,
}

impl From<AttachError> for LinkStateError {
    fn from(err: AttachError) -> Self {
        match err {
            AttachError::LinkClosed => LinkStateError::LinkClosed,
            AttachError::IllegalSessionState => LinkStateError::IllegalSessionState,
            AttachError::IncompleteSource
            | AttachError::IncompleteTarget
            | AttachError::IllegalState => LinkStateError::IllegalState,
        }
    }
}

impl From<DetachError> for LinkStateError {
    fn from(err: DetachError) -> Self {
        match err {
            DetachError::LinkClosed => LinkStateError::LinkClosed,
            DetachError::IllegalSessionState => LinkStateError::IllegalSessionState,
        }
    }
}
