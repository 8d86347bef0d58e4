//! worker - the top-level struct for a gNB-DU worker: owns the F1AP
//! `net::Stack` connection towards the CU-CP, the cell/UE registries from
//! `du`, and the per-UE MAC state the per-slot tick in `slot_worker`
//! operates on.

use crate::config::Config;
use crate::handlers::F1apHandler;
use crate::slot_worker::{tick_dl_slot, DlAllocation, UeMacContext};
use anyhow::{anyhow, Result};
use async_std::sync::Mutex;
use du::{CellRegistry, UeManager};
use f1ap::{F1Setup, F1SetupRequest, ServedCellInformation};
use net::{IndicationHandler, RequestError, RequestProvider, SctpTransportProvider, Stack};
use scheduler::SearchSpace;
use slog::{info, warn, Logger};
use std::collections::HashMap;
use std::sync::Arc;
use ue_id::{CRnti, DuUeIndex};
use xxap::{NrCgi, TransactionId, TransportLayerAddress};

const F1AP_SCTP_PPID: u32 = 62;
const F1AP_BIND_PORT: u16 = 38472;

pub struct SharedState {
    pub config: Config,
    pub f1ap: Stack,
    pub logger: Logger,
    pub local_tla: TransportLayerAddress,
    pub cells: Mutex<CellRegistry>,
    pub ues: Mutex<UeManager>,
    pub mac: Mutex<HashMap<DuUeIndex, UeMacContext>>,
}

#[derive(Clone)]
pub struct Worker {
    shared: Arc<SharedState>,
}

impl Worker {
    pub fn new(config: Config, logger: Logger) -> Self {
        let local_tla = TransportLayerAddress::try_from(config.ip_addr.to_string().as_str())
            .expect("DU bound to a valid IPv4 address");
        let mut cells = CellRegistry::new();
        for cell in &config.cells {
            cells.add(cell.clone()).expect("initial cell configuration fits MAX_DU_CELLS");
        }
        let shared = Arc::new(SharedState {
            f1ap: Stack::new(SctpTransportProvider::new()),
            ues: Mutex::new(UeManager::new(logger.clone())),
            cells: Mutex::new(cells),
            mac: Mutex::new(HashMap::new()),
            local_tla,
            logger,
            config,
        });
        Worker { shared }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn logger(&self) -> &Logger {
        &self.shared.logger
    }

    /// Connects to the CU-CP's F1-C listener and registers the dispatcher
    /// that answers UE Context Setup from then on.
    pub async fn connect(&self) -> Result<()> {
        let remote = format!("{}:{}", self.shared.config.cu_cp_ip_addr, F1AP_BIND_PORT);
        let local = self.shared.config.ip_addr.to_string();
        info!(self.shared.logger, "connecting to CU-CP F1-C"; "remote" => %remote);
        self.shared
            .f1ap
            .connect(&remote, &local, F1AP_SCTP_PPID, F1apHandler::new(self.shared.clone()), self.shared.logger.clone())
            .await?;
        Ok(())
    }

    /// Runs F1 Setup to completion, announcing every configured cell.
    /// Retried up to `CoreConfig::max_setup_retries` times on rejection or
    /// transport failure, the same way `gnb_cu_cp::Worker::ng_setup` treats
    /// NG Setup - each attempt gets a fresh transaction id.
    pub async fn f1_setup(&self) -> Result<()> {
        let logger = self.shared.logger.clone();
        let served_cells: Vec<ServedCellInformation> = {
            let cells = self.shared.cells.lock().await;
            cells
                .iter()
                .map(|(_, c)| ServedCellInformation { nr_cgi: c.nr_cgi, tac: c.tac, packed_mib: c.packed_mib.clone(), packed_sib1: c.packed_sib1.clone() })
                .collect()
        };

        let max_setup_retries = self.shared.config.core.max_setup_retries;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let request = F1SetupRequest {
                transaction_id: TransactionId((attempt - 1) as u8),
                gnb_du_id: self.shared.config.gnb_du_id,
                gnb_du_name: self.shared.config.gnb_du_name.clone(),
                served_cells: served_cells.clone(),
            };
            info!(logger, "F1SetupRequest >>"; "attempt" => attempt);
            match <Stack as RequestProvider<F1Setup>>::request(&self.shared.f1ap, request, &logger).await {
                Ok((response, _)) => {
                    info!(logger, "F1SetupResponse <<"; "gnb_cu_name" => ?response.gnb_cu_name);
                    return Ok(());
                }
                Err(RequestError::Failure(failure)) => {
                    warn!(logger, "F1 Setup rejected"; "cause" => ?failure.cause, "time_to_wait" => ?failure.time_to_wait);
                    if attempt > max_setup_retries {
                        return Err(anyhow!("F1 Setup rejected after {} attempts: {:?}", attempt, failure.cause));
                    }
                }
                Err(e) => {
                    warn!(logger, "F1 Setup request failed"; "err" => %e);
                    if attempt > max_setup_retries {
                        return Err(anyhow!("F1 Setup failed after {} attempts: {}", attempt, e));
                    }
                }
            }
        }
    }

    /// Admits a UE at the DU and tells the CU-CP about it via Initial UL
    /// RRC Message Transfer, as a real DU would on detecting a UE's RRC
    /// Setup Request on SRB0. The `rrc_setup_request` bytes are carried
    /// opaquely - F1AP never decodes RRC.
    pub async fn attach_ue(&self, c_rnti: CRnti, nr_cgi: NrCgi, rrc_setup_request: Vec<u8>) -> Result<DuUeIndex> {
        let index = self.shared.ues.lock().await.create_ue(c_rnti)?;
        self.shared.mac.lock().await.insert(index, UeMacContext::new(&self.shared.config.core));

        let gnb_du_ue_f1ap_id = ue_id::GnbDuUeF1apId(index.0 as u32);
        let indication = f1ap::InitialUlRrcMessageTransfer {
            gnb_du_ue_f1ap_id,
            nr_cgi,
            c_rnti,
            rrc_container: xxap::RrcContainer(rrc_setup_request),
            du_to_cu_rrc_container: None,
        };
        info!(self.shared.logger, "InitialULRRCMessageTransfer >>"; "c_rnti" => c_rnti.0);
        <Stack as IndicationHandler<f1ap::InitialUlRrcMessageTransferIndication>>::handle(&self.shared.f1ap, indication, &self.shared.logger).await;
        Ok(index)
    }

    /// Runs one DL slot-indication across every admitted UE.
    pub async fn tick_dl_slot(&self, search_spaces: &[SearchSpace], pdcch_slot: u64) -> Vec<(DuUeIndex, DlAllocation)> {
        let mut mac = self.shared.mac.lock().await;
        let mut out = Vec::new();
        for (&index, ue) in mac.iter_mut() {
            if let Some(alloc) = tick_dl_slot(ue, search_spaces, pdcch_slot) {
                out.push((index, alloc));
            }
        }
        out
    }

    pub async fn graceful_shutdown(&self) {
        self.shared.f1ap.graceful_shutdown().await;
    }
}
