//! `Stack`: one NGAP/F1AP/E1AP interface instance. Owns the SCTP bindings
//! for that interface, a transaction table for outgoing procedures, and
//! the registered dispatcher for inbound requests/indications. Grounded on
//! how `gnb-cu-cp`'s `worker.rs` already drives `Stack::new`,
//! `Stack::listen`, `Stack::connect`, `RequestProvider`/`IndicationHandler`
//! and `remote_tnla_addresses`.

use crate::frame::{decode_frame, encode_frame, FrameTag, InboundFrame, PduDispatcher, Responder};
use crate::shutdown::ShutdownHandle;
use crate::traits::{Indication, IndicationHandler, Procedure, RequestError, RequestProvider, SerDes, TransactionId};
use crate::transaction::TransactionManager;
use crate::transport::{Binding, SctpTransportProvider};
use anyhow::Result;
use async_std::future;
use async_std::sync::Mutex;
use async_trait::async_trait;
use common::CoreResult;
use futures_lite::future::or;
use sctp::SctpGateway;
use slog::{debug, warn, Logger};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use stop_token::{StopSource, StopToken};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

struct StackInner {
    transport: SctpTransportProvider,
    bindings: Mutex<Vec<Binding>>,
    transactions: TransactionManager,
    handler: Mutex<Option<Arc<dyn PduDispatcher>>>,
}

#[derive(Clone)]
pub struct Stack {
    inner: Arc<StackInner>,
}

impl Stack {
    pub fn new(transport: SctpTransportProvider) -> Self {
        Stack {
            inner: Arc::new(StackInner {
                transport,
                bindings: Mutex::new(Vec::new()),
                transactions: TransactionManager::new(),
                handler: Mutex::new(None),
            }),
        }
    }

    pub async fn remote_tnla_addresses(&self) -> Vec<String> {
        self.inner.bindings.lock().await.iter().map(|b| b.remote_addr().to_string()).collect()
    }

    pub async fn listen<H: PduDispatcher>(
        &self,
        bind_addr: String,
        ppid: u32,
        handler: H,
        logger: Logger,
    ) -> Result<ShutdownHandle> {
        let gw = self.inner.transport.listen(&bind_addr, ppid, logger.clone()).await?;
        *self.inner.handler.lock().await = Some(Arc::new(handler));

        let stop_source = StopSource::new();
        let stop_token = stop_source.token();
        let inner = self.inner.clone();
        let task = async_std::task::spawn(async move {
            Self::accept_loop(inner, gw, stop_token, logger).await;
        });
        Ok(ShutdownHandle::new(task, stop_source))
    }

    async fn accept_loop(inner: Arc<StackInner>, gw: SctpGateway, stop_token: StopToken, logger: Logger) {
        enum Event {
            Accepted(CoreResult<(SctpGateway, SocketAddr)>),
            Stopped,
        }
        loop {
            let accept_fut = async { Event::Accepted(gw.accept().await) };
            let stop_fut = async {
                stop_token.clone().await;
                Event::Stopped
            };
            match or(accept_fut, stop_fut).await {
                Event::Accepted(Ok((accepted_gw, peer))) => {
                    debug!(logger, "accepted association"; "peer" => %peer);
                    let binding = Binding::new(peer.to_string(), accepted_gw);
                    inner.bindings.lock().await.push(binding.clone());
                    let inner2 = inner.clone();
                    let logger2 = logger.clone();
                    async_std::task::spawn(Self::reader_loop(inner2, binding, logger2));
                }
                Event::Accepted(Err(e)) => {
                    warn!(logger, "accept failed"; "err" => ?e);
                }
                Event::Stopped => break,
            }
        }
    }

    pub async fn connect<H: PduDispatcher>(
        &self,
        remote_addr: &str,
        local_addr: &str,
        ppid: u32,
        handler: H,
        logger: Logger,
    ) -> Result<()> {
        let binding = self.inner.transport.connect(remote_addr, local_addr, ppid, logger.clone()).await?;
        *self.inner.handler.lock().await = Some(Arc::new(handler));
        self.inner.bindings.lock().await.push(binding.clone());
        let inner = self.inner.clone();
        async_std::task::spawn(Self::reader_loop(inner, binding, logger));
        Ok(())
    }

    async fn reader_loop(inner: Arc<StackInner>, binding: Binding, logger: Logger) {
        loop {
            match binding.recv().await {
                Ok(raw) => {
                    let Some((tag, id, proc_code, payload)) = decode_frame(&raw) else {
                        warn!(logger, "dropped malformed PDU"; "len" => raw.len());
                        continue;
                    };
                    let buf = asn1_per::Buffer::from_vec(payload.to_vec());
                    match tag {
                        FrameTag::Success => {
                            if inner.transactions.complete(id, Ok(buf)).await.is_err() {
                                warn!(logger, "response for unknown transaction"; "id" => id.0);
                            }
                        }
                        FrameTag::Failure => {
                            if inner.transactions.complete(id, Err(buf)).await.is_err() {
                                warn!(logger, "failure for unknown transaction"; "id" => id.0);
                            }
                        }
                        FrameTag::Request | FrameTag::Indication => {
                            let handler = inner.handler.lock().await.clone();
                            if let Some(handler) = handler {
                                let responder = Responder::new(binding.clone(), id);
                                handler.dispatch(InboundFrame { tag, proc_code, payload: buf, responder }, &logger).await;
                            }
                        }
                    }
                }
                Err(_) => break,
            }
        }
    }

    /// Fire-and-forget send on the first available binding, for
    /// message-only procedures that carry no success/failure outcome
    /// (e.g. DL RRC Message Transfer).
    pub async fn send_one_way<I: crate::traits::Indication>(&self, r: &I::Request, logger: &Logger) -> Result<()> {
        let mut w = asn1_per::BitWriter::new();
        r.encode(&mut w).map_err(|_| anyhow::anyhow!("encode failed"))?;
        let payload = w.into_bytes();
        let bindings = self.inner.bindings.lock().await;
        let Some(binding) = bindings.first() else {
            warn!(logger, "send_one_way with no established binding");
            return Err(anyhow::anyhow!("no established binding"));
        };
        let frame = encode_frame(FrameTag::Indication, TransactionId(0), I::CODE, &payload);
        debug!(logger, "{} >>", I::NAME);
        binding.send(&frame).await.map_err(|e| anyhow::anyhow!("send failed: {:?}", e))
    }

    pub async fn graceful_shutdown(&self) {
        self.inner.bindings.lock().await.clear();
    }
}

#[async_trait]
impl<P: Procedure> RequestProvider<P> for Stack {
    async fn request(
        &self,
        r: P::Request,
        logger: &Logger,
    ) -> Result<(P::Success, TransactionId), RequestError<P::Failure>> {
        let mut w = asn1_per::BitWriter::new();
        r.encode(&mut w).map_err(|_| RequestError::Transport)?;
        let payload = w.into_bytes();

        let (id, rx) = self.inner.transactions.begin().await;
        let frame = encode_frame(FrameTag::Request, id, P::CODE, &payload);

        let binding = { self.inner.bindings.lock().await.first().cloned() };
        let Some(binding) = binding else {
            self.inner.transactions.abandon(id).await;
            return Err(RequestError::NotConnected);
        };
        if binding.send(&frame).await.is_err() {
            self.inner.transactions.abandon(id).await;
            return Err(RequestError::Transport);
        }
        debug!(logger, "{} >>", P::NAME);

        match future::timeout(DEFAULT_REQUEST_TIMEOUT, rx.recv()).await {
            Ok(Ok(Ok(success_buf))) => {
                let bytes = success_buf.to_contiguous();
                let mut reader = asn1_per::BitReader::new(&bytes);
                let success = P::Success::decode(&mut reader).map_err(|_| RequestError::Transport)?;
                debug!(logger, "{} <<", P::NAME);
                Ok((success, id))
            }
            Ok(Ok(Err(failure_buf))) => {
                let bytes = failure_buf.to_contiguous();
                let mut reader = asn1_per::BitReader::new(&bytes);
                let failure = P::Failure::decode(&mut reader).map_err(|_| RequestError::Transport)?;
                Err(RequestError::Failure(failure))
            }
            Ok(Err(_)) => Err(RequestError::Transport),
            Err(_) => {
                self.inner.transactions.abandon(id).await;
                Err(RequestError::Timeout)
            }
        }
    }
}

#[async_trait]
impl<P: Indication> IndicationHandler<P> for Stack {
    /// Outbound side of an `Indication`: fire-and-forget on the first
    /// binding. (Inbound indications arrive through `PduDispatcher` instead,
    /// since `Stack` has no static `P` to decode into at that point.)
    async fn handle(&self, r: P::Request, logger: &Logger) {
        if let Err(e) = self.send_one_way::<P>(&r, logger).await {
            warn!(logger, "{} send failed", P::NAME; "err" => ?e);
        }
    }
}
