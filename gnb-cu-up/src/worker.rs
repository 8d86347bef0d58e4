//! worker - the top level struct for a gNB-CU-UP worker: owns the E1AP
//! `net::Stack` connection towards the CU-CP plus the per-UE-id and TEID
//! counters the bearer-context dispatcher allocates from.

use crate::config::Config;
use crate::handlers::{parse_local_tla, BearerContextHandler};
use anyhow::{anyhow, Result};
use e1ap::{GnbCuUpE1Setup, GnbCuUpE1SetupRequest, GnbCuUpUeE1apId};
use net::{RequestError, RequestProvider, SctpTransportProvider, Stack};
use slog::{info, warn, Logger};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use xxap::TransportLayerAddress;

// TS38.462
const E1AP_SCTP_PPID: u32 = 64;
const E1AP_BIND_PORT: u16 = 38462;

pub struct SharedState {
    pub config: Config,
    pub e1ap: Stack,
    pub logger: Logger,
    pub local_tla: TransportLayerAddress,
    next_ue_e1ap_id: AtomicU32,
    pub(crate) next_teid: AtomicU32,
}

impl SharedState {
    pub(crate) fn allocate_ue_id(&self) -> GnbCuUpUeE1apId {
        GnbCuUpUeE1apId(self.next_ue_e1ap_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone)]
pub struct Worker {
    shared: Arc<SharedState>,
}

impl Worker {
    pub fn new(config: Config, logger: Logger) -> Self {
        let local_tla = parse_local_tla(config.ip_addr);
        let shared = Arc::new(SharedState {
            config,
            e1ap: Stack::new(SctpTransportProvider::new()),
            logger,
            local_tla,
            next_ue_e1ap_id: AtomicU32::new(0),
            next_teid: AtomicU32::new(1),
        });
        Worker { shared }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn logger(&self) -> &Logger {
        &self.shared.logger
    }

    /// Connects to the CU-CP's E1 listener and registers the dispatcher
    /// that answers Bearer Context Setup/Modification from then on.
    pub async fn connect(&self) -> Result<()> {
        let remote = format!("{}:{}", self.shared.config.cu_cp_ip_addr, E1AP_BIND_PORT);
        let local = self.shared.config.ip_addr.to_string();
        info!(self.shared.logger, "connecting to CU-CP E1"; "remote" => %remote);
        self.shared
            .e1ap
            .connect(&remote, &local, E1AP_SCTP_PPID, BearerContextHandler::new(self.shared.clone()), self.shared.logger.clone())
            .await?;
        Ok(())
    }

    /// Runs gNB-CU-UP E1 Setup to completion. Call after `connect`.
    pub async fn e1_setup(&self) -> Result<()> {
        let logger = self.shared.logger.clone();
        let request = GnbCuUpE1SetupRequest {
            gnb_cu_up_id: self.shared.config.gnb_cu_up_id,
            gnb_cu_up_name: self.shared.config.gnb_cu_up_name.clone(),
        };
        info!(logger, "GNBCUUPE1SetupRequest >>");
        match <Stack as RequestProvider<GnbCuUpE1Setup>>::request(&self.shared.e1ap, request, &logger).await {
            Ok((response, _)) => {
                info!(logger, "GNBCUUPE1SetupResponse <<"; "gnb_cu_cp_name" => ?response.gnb_cu_cp_name);
                Ok(())
            }
            Err(RequestError::Failure(failure)) => {
                warn!(logger, "gNB-CU-UP E1 Setup rejected"; "cause" => ?failure.cause);
                Err(anyhow!("gNB-CU-UP E1 Setup rejected: {:?}", failure.cause))
            }
            Err(e) => Err(anyhow!("gNB-CU-UP E1 Setup failed: {}", e)),
        }
    }

    pub async fn graceful_shutdown(&self) {
        self.shared.e1ap.graceful_shutdown().await;
    }
}
