//! Decoder for the described sections of a message payload.

use ferrite_amqp_codec::{decode_value, Value};

/// 3.2.1 Header
pub const HEADER: u8 = 0x70;
/// 3.2.2 Delivery Annotations
pub const DELIVERY_ANNOTATIONS: u8 = 0x71;
/// 3.2.3 Message Annotations
pub const MESSAGE_ANNOTATIONS: u8 = 0x72;
/// 3.2.4 Properties
pub const PROPERTIES: u8 = 0x73;
/// 3.2.5 Application Properties
pub const APPLICATION_PROPERTIES: u8 = 0x74;
/// 3.2.6 Data
pub const DATA: u8 = 0x75;
/// 3.2.7 Amqp Sequence
pub const AMQP_SEQUENCE: u8 = 0x76;
/// 3.2.8 Amqp Value
pub const AMQP_VALUE: u8 = 0x77;
/// 3.2.9 Footer
pub const FOOTER: u8 = 0x78;

/// Errors from walking a payload's sections
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// A section did not start with the described-type and small-ulong
    /// constructors
    #[error("Malformed section prologue")]
    Prologue,

    /// The section body failed to decode
    #[error(transparent)]
    Codec(#[from] ferrite_amqp_codec::Error),
}

/// The sections of one message payload, keyed by descriptor.
///
/// Every entry is optional. `data` accumulates: a payload split over several
/// data sections keeps them in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    /// 0x70 header
    pub header: Option<Value>,

    /// 0x71 delivery-annotations
    pub delivery_annotations: Option<Value>,

    /// 0x72 message-annotations
    pub message_annotations: Option<Value>,

    /// 0x73 properties
    pub properties: Option<Value>,

    /// 0x74 application-properties
    pub application_properties: Option<Value>,

    /// 0x75 data, one entry per section
    pub data: Vec<Value>,

    /// 0x76 amqp-sequence
    pub sequence: Option<Value>,

    /// 0x77 amqp-value
    pub value: Option<Value>,

    /// 0x78 footer
    pub footer: Option<Value>,
}

impl Sections {
    /// Whether no section was assigned
    pub fn is_empty(&self) -> bool {
        self == &Sections::default()
    }
}

/// Walks a buffer of concatenated described sections.
///
/// Section layout: described-type tag, small-ulong tag, descriptor byte,
/// then a constructor-prefixed body. Descriptors outside the section band
/// are decoded and dropped. The walk ends when the buffer is exhausted.
pub fn decode_sections(mut buf: &[u8]) -> Result<Sections, SectionError> {
    let mut sections = Sections::default();
    while !buf.is_empty() {
        if buf.len() < 4 || buf[0] != 0x00 || buf[1] != 0x53 {
            return Err(SectionError::Prologue);
        }
        let descriptor = buf[2];
        let (value, rest) = decode_value(&buf[3..])?;
        buf = rest;
        match descriptor {
            HEADER => sections.header = Some(value),
            DELIVERY_ANNOTATIONS => sections.delivery_annotations = Some(value),
            MESSAGE_ANNOTATIONS => sections.message_annotations = Some(value),
            PROPERTIES => sections.properties = Some(value),
            APPLICATION_PROPERTIES => sections.application_properties = Some(value),
            DATA => sections.data.push(value),
            AMQP_SEQUENCE => sections.sequence = Some(value),
            AMQP_VALUE => sections.value = Some(value),
            FOOTER => sections.footer = Some(value),
            _ => {}
        }
    }
    Ok(sections)
}
