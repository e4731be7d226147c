//! Decoder for framed performatives.
//!
//! The caller (the connection's framing layer) splits the byte stream on
//! frame boundaries; this module interprets one frame body at a time.

use bytes::Bytes;
use ferrite_amqp_codec::{decode_value, Value};
use ferrite_amqp_types::{
    composite::CompositeError,
    messaging::{decode_sections, Sections},
    performatives::{Performative, TRANSFER_CODE},
};

use super::FrameError;

/// The four-byte tag opening a protocol header
pub(crate) const HEADER_TAG: &[u8; 4] = b"AMQP";

/// A decoded performative frame: the descriptor code, the field list, and
/// the payload sections of a transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The performative descriptor code (byte 2 of the envelope)
    pub frame_type: u8,

    /// The decoded field values, in wire order
    pub fields: Vec<Value>,

    /// Payload sections, present only for transfer frames
    pub payload: Option<Sections>,
}

impl Frame {
    /// Lift the frame to a typed performative.
    pub fn into_performative(self) -> Result<(Performative, Option<Sections>), CompositeError> {
        let performative = Performative::try_from_parts(self.frame_type, self.fields)?;
        Ok((performative, self.payload))
    }
}

/// An eight-byte header that is not a performative frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderFrame {
    /// The `AMQP` protocol header, returned verbatim
    Protocol(Bytes),

    /// An empty (heartbeat) frame
    Empty,
}

/// Recognizes the protocol header and the empty (heartbeat) frame.
///
/// Anything that is neither the `AMQP` tag nor a zero at offset 5 is
/// rejected.
pub fn decode_header(header: &[u8]) -> Result<HeaderFrame, FrameError> {
    if header.len() >= 4 && &header[..4] == HEADER_TAG {
        return Ok(HeaderFrame::Protocol(Bytes::copy_from_slice(header)));
    }
    if header.len() >= 6 && header[5] == 0 {
        return Ok(HeaderFrame::Empty);
    }
    Err(FrameError::UnrecognizedHeader)
}

/// Decodes one performative frame.
///
/// The envelope is fixed: byte 0 the described-type constructor, byte 1 the
/// small-ulong constructor, byte 2 the performative code, byte 3 the list
/// constructor, byte 4 the list size, byte 5 the field count. Fields follow
/// as constructor-prefixed values. For a transfer frame the remaining bytes
/// are the payload sections.
pub fn decode_frame(buf: &[u8]) -> Result<Frame, FrameError> {
    if buf.len() < 6 || buf[0] != 0x00 || buf[1] != 0x53 {
        return Err(FrameError::Envelope);
    }
    let frame_type = buf[2];
    let count = buf[5] as usize;
    let mut window = &buf[6..];

    let mut fields = Vec::with_capacity(count);
    for _ in 0..count {
        let (field, rest) = decode_value(window)?;
        fields.push(field);
        window = rest;
    }

    let payload = match frame_type {
        TRANSFER_CODE => Some(decode_sections(window)?),
        _ => None,
    };

    Ok(Frame {
        frame_type,
        fields,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use ferrite_amqp_types::performatives::{ATTACH_CODE, DETACH_CODE};

    use super::*;

    #[test]
    fn protocol_header_is_returned_verbatim() {
        let header = *b"AMQP\x00\x01\x00\x00";
        let decoded = decode_header(&header).unwrap();
        assert_eq!(
            decoded,
            HeaderFrame::Protocol(Bytes::copy_from_slice(&header))
        );
    }

    #[test]
    fn zero_at_offset_five_is_a_heartbeat() {
        let header = [0x00, 0x00, 0x00, 0x08, 0x02, 0x00, 0x00, 0x00];
        assert_eq!(decode_header(&header).unwrap(), HeaderFrame::Empty);
    }

    #[test]
    fn unrecognized_header_is_rejected() {
        let header = [0x00, 0x00, 0x00, 0x08, 0x02, 0x01, 0x00, 0x00];
        assert_eq!(
            decode_header(&header),
            Err(FrameError::UnrecognizedHeader)
        );
    }

    #[test]
    fn envelope_constructors_are_checked() {
        assert_eq!(
            decode_frame(&[0x01, 0x53, 0x12, 0xc0, 0x01, 0x00]),
            Err(FrameError::Envelope)
        );
        assert_eq!(
            decode_frame(&[0x00, 0x80, 0x12, 0xc0, 0x01, 0x00]),
            Err(FrameError::Envelope)
        );
    }

    #[test]
    fn field_list_length_matches_declared_count() {
        // detach with handle 0 and closed=true
        let buf = [0x00, 0x53, DETACH_CODE, 0xc0, 0x03, 0x02, 0x43, 0x41];
        let frame = decode_frame(&buf).unwrap();
        assert_eq!(frame.frame_type, DETACH_CODE);
        assert_eq!(frame.fields, vec![Value::UInt(0), Value::Bool(true)]);
        assert!(frame.payload.is_none());
    }

    #[test]
    fn transfer_frame_appends_payload_sections() {
        // transfer with handle 1, then one data section of two bytes
        let buf = [
            0x00, 0x53, TRANSFER_CODE, 0xc0, 0x03, 0x01, 0x52, 0x01, // fields
            0x00, 0x53, 0x75, 0xa0, 0x02, 0xca, 0xfe, // data section
        ];
        let frame = decode_frame(&buf).unwrap();
        assert_eq!(frame.frame_type, TRANSFER_CODE);
        assert_eq!(frame.fields.len(), 1);
        let payload = frame.payload.expect("transfer carries a payload map");
        assert_eq!(
            payload.data,
            vec![Value::Binary(Bytes::from_static(&[0xca, 0xfe]))]
        );
    }

    #[test]
    fn frame_lifts_to_a_typed_performative() {
        use ferrite_amqp_types::performatives::Attach;

        let attach = Attach {
            name: "receiver-link-1".into(),
            handle: 1.into(),
            role: ferrite_amqp_types::definitions::Role::Receiver,
            snd_settle_mode: Default::default(),
            rcv_settle_mode: Default::default(),
            source: Some(ferrite_amqp_types::messaging::Source::from("q1")),
            target: Some(ferrite_amqp_types::messaging::Target::from("q1")),
            unsettled: None,
            incomplete_unsettled: false,
            initial_delivery_count: None,
            max_message_size: None,
            offered_capabilities: None,
            desired_capabilities: None,
            properties: None,
        };
        let buf = ferrite_amqp_codec::to_vec(&attach.to_value()).unwrap();
        let frame = decode_frame(&buf).unwrap();
        assert_eq!(frame.frame_type, ATTACH_CODE);
        let (performative, payload) = frame.into_performative().unwrap();
        assert!(payload.is_none());
        match performative {
            Performative::Attach(decoded) => assert_eq!(decoded, attach),
            other => panic!("expected attach, got {:?}", other),
        }
    }
}
