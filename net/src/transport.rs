//! `Binding`/`TransportProvider`: the seam between `Stack` and the
//! underlying SCTP gateway, so the transaction/dispatch machinery in
//! `stack.rs` never touches a raw socket directly. Grounded on
//! `sctp_network_gateway.h`'s split between the gateway and its
//! control/data notifiers.

use async_std::sync::Mutex;
use common::{CoreError, CoreResult};
use sctp::{SctpGateway, SctpGatewayConfig};
use std::net::SocketAddr;
use std::sync::Arc;

/// One live SCTP association, either the client side of a `connect` or one
/// accepted connection on a listening socket.
#[derive(Clone)]
pub struct Binding {
    remote_addr: String,
    gateway: Arc<Mutex<SctpGateway>>,
}

impl Binding {
    pub fn new(remote_addr: String, gateway: SctpGateway) -> Self {
        Binding { remote_addr, gateway: Arc::new(Mutex::new(gateway)) }
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    pub async fn send(&self, pdu: &[u8]) -> CoreResult<()> {
        self.gateway.lock().await.send(pdu).await
    }

    pub async fn recv(&self) -> CoreResult<Vec<u8>> {
        self.gateway.lock().await.recv().await
    }
}

pub struct SctpTransportProvider;

impl SctpTransportProvider {
    pub fn new() -> Self {
        SctpTransportProvider
    }

    pub async fn listen(&self, bind_addr: &str, ppid: u32, logger: slog::Logger) -> CoreResult<SctpGateway> {
        let addr: SocketAddr = bind_addr.parse().map_err(|_| CoreError::Transport)?;
        let mut gw = SctpGateway::new(SctpGatewayConfig::new(addr, ppid), logger);
        gw.bind_and_listen()?;
        Ok(gw)
    }

    pub async fn connect(&self, remote_addr: &str, local_addr: &str, ppid: u32, logger: slog::Logger) -> CoreResult<Binding> {
        let peer: SocketAddr = remote_addr.parse().map_err(|_| CoreError::Transport)?;
        let local: SocketAddr = local_addr.parse().map_err(|_| CoreError::Transport)?;
        let mut gw = SctpGateway::new(SctpGatewayConfig::new(local, ppid), logger);
        gw.connect(peer)?;
        Ok(Binding::new(remote_addr.to_string(), gw))
    }
}

impl Default for SctpTransportProvider {
    fn default() -> Self {
        Self::new()
    }
}
