//! Definition of session state

/// 2.5.5 Session States
///
/// The link layer only reacts to `Mapped` and `Discarding`; the remaining
/// states are owned by the session endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// UNMAPPED
    Unmapped,

    /// BEGIN SENT
    BeginSent,

    /// BEGIN RCVD
    BeginReceived,

    /// MAPPED
    Mapped,

    /// END SENT
    EndSent,

    /// END RCVD
    EndReceived,

    /// DISCARDING
    Discarding,
}
