use ferrite_amqp_types::{composite::CompositeError, messaging::SectionError};

/// Frame decoding errors.
///
/// None of these mutate caller state; the dispatcher decides whether a bad
/// frame tears the connection down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The fixed envelope bytes did not carry the described-type and
    /// small-ulong constructors
    #[error("Malformed frame envelope")]
    Envelope,

    /// An eight-byte header that is neither the protocol header nor an
    /// empty frame
    #[error("Received unrecognized empty frame")]
    UnrecognizedHeader,

    /// A field failed to decode
    #[error(transparent)]
    Codec(#[from] ferrite_amqp_codec::Error),

    /// The transfer payload sections failed to decode
    #[error(transparent)]
    Sections(#[from] SectionError),

    /// The field list did not lift to a typed performative
    #[error(transparent)]
    Composite(#[from] CompositeError),
}
