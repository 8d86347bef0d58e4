//! The procedure/indication vocabulary every application protocol (NGAP,
//! F1AP, E1AP) plugs into `Stack` through. Grounded on the
//! `Procedure`/`Indication`/`RequestProvider`/`IndicationHandler` surface
//! `gnb-cu-cp`'s `worker.rs` is already written against.

use async_trait::async_trait;
use slog::Logger;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u32);

/// Wire (en/de)coding for one request/response/indication payload. Each
/// application-protocol crate implements this per message type over
/// `asn1_per`'s bit cursor.
pub trait SerDes: Sized {
    fn encode(&self, w: &mut asn1_per::BitWriter) -> Result<(), asn1_per::EncodeError>;
    fn decode(r: &mut asn1_per::BitReader) -> Result<Self, asn1_per::DecodeError>;
}

/// A request/response elementary procedure (e.g. NG Setup, F1 Setup, Bearer
/// Context Setup): sending `Request` eventually yields `Success` or
/// `Failure`.
pub trait Procedure: Send + Sync + 'static {
    type Request: SerDes + Send + 'static;
    type Success: SerDes + Send + 'static;
    type Failure: SerDes + Send + 'static;

    const NAME: &'static str;

    /// Elementary-procedure code carried in the frame header so a
    /// `PduDispatcher` can tell which `Procedure`/`Indication` an inbound
    /// payload belongs to without a shared top-level PDU enum.
    const CODE: u16;
}

/// A one-way inbound message with no procedure outcome (e.g. UL RRC
/// Message Transfer, UL NAS Transport).
pub trait Indication: Send + Sync + 'static {
    type Request: SerDes + Send + Sync + 'static;

    const NAME: &'static str;
    const CODE: u16;
}

#[derive(Debug)]
pub enum RequestError<F> {
    Failure(F),
    Timeout,
    Transport,
    NotConnected,
}

impl<F: fmt::Debug> fmt::Display for RequestError<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Failure(e) => write!(f, "procedure failure: {:?}", e),
            RequestError::Timeout => write!(f, "procedure timed out waiting for a response"),
            RequestError::Transport => write!(f, "transport error"),
            RequestError::NotConnected => write!(f, "no established association"),
        }
    }
}

impl<F: fmt::Debug> std::error::Error for RequestError<F> {}

#[async_trait]
pub trait RequestProvider<P: Procedure> {
    async fn request(
        &self,
        r: P::Request,
        logger: &Logger,
    ) -> Result<(P::Success, TransactionId), RequestError<P::Failure>>;
}

#[async_trait]
pub trait IndicationHandler<P: Indication> {
    async fn handle(&self, r: P::Request, logger: &Logger);
}
