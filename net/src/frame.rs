//! Wire framing for the representative SCTP/NGAP-F1AP-E1AP transport
//! (§4.B, §4.F-H): each PDU sent over a `Binding` carries a one-byte tag, a
//! 4-byte big-endian transaction id, and an `asn1_per`-encoded payload.
//! This framing is intentionally simpler than the real TS 38.4xx stream
//! headers (no full IE container) - it exists so `Stack::request` can
//! correlate a response with the transaction that sent the request without
//! every application-protocol crate repeating that bookkeeping.

use crate::transport::Binding;
use crate::traits::TransactionId;
use async_trait::async_trait;
use common::CoreResult;
use slog::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTag {
    Request,
    Success,
    Failure,
    Indication,
}

impl FrameTag {
    fn to_byte(self) -> u8 {
        match self {
            FrameTag::Request => 0,
            FrameTag::Success => 1,
            FrameTag::Failure => 2,
            FrameTag::Indication => 3,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(FrameTag::Request),
            1 => Some(FrameTag::Success),
            2 => Some(FrameTag::Failure),
            3 => Some(FrameTag::Indication),
            _ => None,
        }
    }
}

pub fn encode_frame(
    tag: FrameTag,
    transaction_id: TransactionId,
    proc_code: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(7 + payload.len());
    out.push(tag.to_byte());
    out.extend_from_slice(&transaction_id.0.to_be_bytes());
    out.extend_from_slice(&proc_code.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn decode_frame(raw: &[u8]) -> Option<(FrameTag, TransactionId, u16, &[u8])> {
    if raw.len() < 7 {
        return None;
    }
    let tag = FrameTag::from_byte(raw[0])?;
    let id = TransactionId(u32::from_be_bytes([raw[1], raw[2], raw[3], raw[4]]));
    let proc_code = u16::from_be_bytes([raw[5], raw[6]]);
    Some((tag, id, proc_code, &raw[7..]))
}

/// Lets a dispatcher answer a peer-initiated request on the binding it
/// arrived on, tagged with the transaction id the peer is waiting on.
#[derive(Clone)]
pub struct Responder {
    binding: Binding,
    transaction_id: TransactionId,
}

impl Responder {
    pub fn new(binding: Binding, transaction_id: TransactionId) -> Self {
        Responder { binding, transaction_id }
    }

    pub async fn respond_success(&self, payload: &[u8]) -> CoreResult<()> {
        self.binding.send(&encode_frame(FrameTag::Success, self.transaction_id, 0, payload)).await
    }

    pub async fn respond_failure(&self, payload: &[u8]) -> CoreResult<()> {
        self.binding.send(&encode_frame(FrameTag::Failure, self.transaction_id, 0, payload)).await
    }
}

pub struct InboundFrame {
    pub tag: FrameTag,
    pub proc_code: u16,
    pub payload: asn1_per::Buffer,
    pub responder: Responder,
}

/// Dispatches a decoded inbound PDU that did not match a pending local
/// transaction: a peer-initiated request, or an indication. Each
/// application-protocol crate's `*Handler` (e.g. `NgapHandler`) implements
/// this.
#[async_trait]
pub trait PduDispatcher: Send + Sync + 'static {
    async fn dispatch(&self, frame: InboundFrame, logger: &Logger);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_round_trips() {
        let encoded = encode_frame(FrameTag::Request, TransactionId(42), 7, &[9, 9, 9]);
        let (tag, id, proc_code, payload) = decode_frame(&encoded).unwrap();
        assert_eq!(tag, FrameTag::Request);
        assert_eq!(id, TransactionId(42));
        assert_eq!(proc_code, 7);
        assert_eq!(payload, &[9, 9, 9]);
    }

    #[test]
    fn short_frame_fails_to_decode() {
        assert!(decode_frame(&[0, 0, 0]).is_none());
    }
}
