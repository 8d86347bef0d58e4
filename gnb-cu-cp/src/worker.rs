//! worker - the top level struct for a gNB-CU-CP worker: owns the three
//! `net::Stack` interfaces (F1AP towards the DU, E1AP towards the CU-UP,
//! NGAP towards the AMF) plus the shared UE/cell state every inbound
//! dispatcher and outbound workflow reads and mutates.

use crate::config::Config;
use crate::handlers::{E1apHandler, F1apHandler, NgapHandler};
use anyhow::Result;
use async_std::sync::Mutex;
use du::CellRegistry;
use net::{IndicationHandler, Procedure, RequestError, RequestProvider, SctpTransportProvider, ShutdownHandle, Stack};
use rrc::{DrbManager, RrcUe};
use slog::{info, Logger};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ue_id::{AmfUeNgapId, CRnti, CuUeRegistry};
use xxap::{NrCgi, Tac};

// TS38.412, 7
// The Payload Protocol Identifier (ppid) assigned by IANA to be used by SCTP for the application layer protocol NGAP
// is 60, and 66 for DTLS over SCTP (IETF RFC 6083 [8]).
const NGAP_SCTP_PPID: u32 = 60;
const NGAP_BIND_PORT: u16 = 38412;

// TS38.472, 7
// The Payload Protocol Identifier (ppid) assigned by IANA to be used by SCTP for the application layer protocol F1AP is 62,
// and 68 for DTLS over SCTP (IETF RFC 6083 [9]).
const F1AP_SCTP_PPID: u32 = 62;
const F1AP_BIND_PORT: u16 = 38472;

// TS38.462
const E1AP_SCTP_PPID: u32 = 64;
const E1AP_BIND_PORT: u16 = 38462;

/// The CU-CP's per-UE state: RRC state machine, allocated DRBs, and the
/// radio identity the DU announced it under. Addressed by the plain `usize`
/// index `ue_id::CuUeRegistry` uses as its primary key.
pub struct UeContext {
    pub rrc: RrcUe,
    pub drbs: DrbManager,
    pub c_rnti: CRnti,
    pub nr_cgi: NrCgi,
    pub tac: Tac,
    /// Carried from the UE's RRC Setup Request into its eventual Initial UE
    /// Message - not held by `rrc::RrcUe` itself, which only tracks SRB/state.
    pub establishment_cause: rrc::EstablishmentCause,
}

impl UeContext {
    pub fn new(c_rnti: CRnti, nr_cgi: NrCgi, tac: Tac) -> Self {
        UeContext {
            rrc: RrcUe::new(),
            drbs: DrbManager::default(),
            c_rnti,
            nr_cgi,
            tac,
            establishment_cause: rrc::EstablishmentCause::MoSignalling,
        }
    }
}

/// State shared between the worker's own workflows and every
/// `net::PduDispatcher` registered on its three stacks.
pub struct SharedState {
    pub config: Config,
    pub ngap: Stack,
    pub f1ap: Stack,
    pub e1ap: Stack,
    pub logger: Logger,
    pub ues: Mutex<CuUeRegistry<UeContext>>,
    pub cells: Mutex<CellRegistry>,
    next_ue_index: AtomicUsize,
}

impl SharedState {
    /// Allocates the next CU-CP-side UE index. A plain counter rather than
    /// a derived identifier - this process never sees the DU's own local UE
    /// index, only the `GnbDuUeF1apId` the DU hands it over F1.
    pub fn allocate_ue_index(&self) -> usize {
        self.next_ue_index.fetch_add(1, Ordering::Relaxed)
    }
}

/// One CU-CP process: the three signaling interfaces plus the listener
/// shutdown handles accumulated as each interface starts serving.
#[derive(Clone)]
pub struct Worker {
    shared: Arc<SharedState>,
    shutdown_handles: Arc<Mutex<Vec<ShutdownHandle>>>,
}

impl Worker {
    pub fn new(config: Config, logger: Logger) -> Self {
        let shared = Arc::new(SharedState {
            config,
            ngap: Stack::new(SctpTransportProvider::new()),
            f1ap: Stack::new(SctpTransportProvider::new()),
            e1ap: Stack::new(SctpTransportProvider::new()),
            logger,
            ues: Mutex::new(CuUeRegistry::new()),
            cells: Mutex::new(CellRegistry::new()),
            next_ue_index: AtomicUsize::new(0),
        });
        Worker { shared, shutdown_handles: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn logger(&self) -> &Logger {
        &self.shared.logger
    }

    fn worker_listen_address(&self, port: u16) -> String {
        format!("{}:{}", self.shared.config.ip_addr, port)
    }

    /// Binds the F1-C listener the DU connects to for F1 Setup.
    pub async fn serve_f1ap(&self) -> Result<()> {
        let f1_listen_address = self.worker_listen_address(F1AP_BIND_PORT);
        info!(&self.shared.logger, "Listen for connection from DU on {}", f1_listen_address);
        let handle = self
            .shared
            .f1ap
            .listen(f1_listen_address, F1AP_SCTP_PPID, F1apHandler::new(self.shared.clone()), self.shared.logger.clone())
            .await?;
        self.add_shutdown_handle(handle).await;
        Ok(())
    }

    /// Binds the E1 listener the CU-UP connects to for gNB-CU-UP E1 Setup.
    pub async fn serve_e1ap(&self) -> Result<()> {
        let e1_listen_address = self.worker_listen_address(E1AP_BIND_PORT);
        info!(&self.shared.logger, "Listen for connection from CU-UP on {}", e1_listen_address);
        let handle = self
            .shared
            .e1ap
            .listen(e1_listen_address, E1AP_SCTP_PPID, E1apHandler::new(self.shared.clone()), self.shared.logger.clone())
            .await?;
        self.add_shutdown_handle(handle).await;
        Ok(())
    }

    async fn add_shutdown_handle(&self, shutdown_handle: ShutdownHandle) {
        self.shutdown_handles.lock().await.push(shutdown_handle);
    }

    /// Establishes the NG association towards the configured AMF. Does not
    /// itself run NG Setup - that is a workflow the caller drives once this
    /// returns.
    pub async fn ngap_connect(&self) -> Result<()> {
        let amf_address = format!("{}:{}", self.shared.config.amf_ip_addr, NGAP_BIND_PORT);
        let local_address = self.shared.config.ip_addr.to_string();
        self.shared
            .ngap
            .connect(&amf_address, &local_address, NGAP_SCTP_PPID, NgapHandler::new(self.shared.clone()), self.shared.logger.clone())
            .await?;
        Ok(())
    }

    pub async fn ngap_request<P: Procedure>(
        &self,
        r: P::Request,
        logger: &Logger,
    ) -> std::result::Result<(P::Success, net::TransactionId), RequestError<P::Failure>> {
        <Stack as RequestProvider<P>>::request(&self.shared.ngap, r, logger).await
    }

    pub async fn ngap_indication<P: net::Indication>(&self, r: P::Request, logger: &Logger) {
        <Stack as IndicationHandler<P>>::handle(&self.shared.ngap, r, logger).await
    }

    pub async fn f1ap_request<P: Procedure>(
        &self,
        r: P::Request,
        logger: &Logger,
    ) -> std::result::Result<(P::Success, net::TransactionId), RequestError<P::Failure>> {
        <Stack as RequestProvider<P>>::request(&self.shared.f1ap, r, logger).await
    }

    pub async fn f1ap_indication<P: net::Indication>(&self, r: P::Request, logger: &Logger) {
        <Stack as IndicationHandler<P>>::handle(&self.shared.f1ap, r, logger).await
    }

    pub async fn e1ap_request<P: Procedure>(
        &self,
        r: P::Request,
        logger: &Logger,
    ) -> std::result::Result<(P::Success, net::TransactionId), RequestError<P::Failure>> {
        <Stack as RequestProvider<P>>::request(&self.shared.e1ap, r, logger).await
    }

    /// Learns (or verifies) the AMF-UE-NGAP-ID for a UE once the AMF has
    /// assigned one. Set at most once; a mismatched re-assignment is
    /// rejected by the registry.
    pub async fn learn_amf_ngap_id(&self, index: usize, id: AmfUeNgapId) -> common::CoreResult<()> {
        self.shared.ues.lock().await.assign_amf_ngap_id(index, id)
    }

    pub async fn graceful_shutdown(&self) {
        while let Some(handle) = self.shutdown_handles.lock().await.pop() {
            handle.graceful_shutdown().await;
        }
        self.shared.ngap.graceful_shutdown().await;
        self.shared.f1ap.graceful_shutdown().await;
        self.shared.e1ap.graceful_shutdown().await;
    }
}
