//! A `net::PduDispatcher` that forwards every inbound request/indication
//! into an `async_channel`, so a mock's test-script methods can `.recv()`
//! frames instead of reacting to them inline the way a real handler does.
//! Also carries the generic encode/decode/recv helpers both mocks build
//! their procedure calls on.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use net::{Indication, InboundFrame, PduDispatcher, Procedure, Responder, SerDes};
use slog::Logger;

#[derive(Clone)]
pub struct ChannelDispatcher {
    tx: async_channel::Sender<InboundFrame>,
}

impl ChannelDispatcher {
    pub fn new() -> (Self, async_channel::Receiver<InboundFrame>) {
        let (tx, rx) = async_channel::unbounded();
        (ChannelDispatcher { tx }, rx)
    }
}

#[async_trait]
impl PduDispatcher for ChannelDispatcher {
    async fn dispatch(&self, frame: InboundFrame, _logger: &Logger) {
        let _ = self.tx.send(frame).await;
    }
}

pub fn encode<T: SerDes>(value: &T) -> Vec<u8> {
    let mut writer = asn1_per::BitWriter::new();
    value.encode(&mut writer).expect("well-formed mock PDU cannot fail to encode");
    writer.into_bytes()
}

fn decode<T: SerDes>(bytes: &[u8]) -> Result<T> {
    let mut reader = asn1_per::BitReader::new(bytes);
    T::decode(&mut reader).map_err(|e| anyhow!("decode failed: {:?}", e))
}

/// Waits for the next frame and decodes it as the request side of `I`,
/// rejecting anything carrying a different procedure code.
pub async fn recv_indication<I: Indication>(rx: &async_channel::Receiver<InboundFrame>) -> Result<I::Request> {
    let frame = rx.recv().await.map_err(|_| anyhow!("mock channel closed"))?;
    if frame.proc_code != I::CODE {
        bail!("expected {} (code {}), got code {}", I::NAME, I::CODE, frame.proc_code);
    }
    decode(&frame.payload.to_contiguous())
}

/// Waits for the next frame and decodes it as the request side of `P`,
/// returning the `Responder` the caller must answer on.
pub async fn recv_request<P: Procedure>(rx: &async_channel::Receiver<InboundFrame>) -> Result<(P::Request, Responder)> {
    let frame = rx.recv().await.map_err(|_| anyhow!("mock channel closed"))?;
    if frame.proc_code != P::CODE {
        bail!("expected {} (code {}), got code {}", P::NAME, P::CODE, frame.proc_code);
    }
    let req = decode(&frame.payload.to_contiguous())?;
    Ok((req, frame.responder))
}
