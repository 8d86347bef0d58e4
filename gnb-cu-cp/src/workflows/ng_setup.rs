//! NG Setup (§4.F): the initial handshake that registers the gNB's served
//! TAs with the AMF. Sent up to `CoreConfig::max_setup_retries + 1` times
//! total (the initial attempt plus that many retries); each attempt gets a
//! fresh transaction id since `net::Stack` assigns one per `ngap_request`
//! call.

use crate::worker::Worker;
use anyhow::{anyhow, Result};
use net::RequestError;
use ngap::{GlobalRanNodeId, NgSetup, NgSetupRequest, PagingDrx, SupportedTaItem};
use slog::{info, warn};
use xxap::{PlmnIdentity, Tac};

impl Worker {
    /// Connects to the AMF and runs NG Setup to completion, retrying
    /// rejected attempts up to the configured limit.
    pub async fn ng_setup(&self) -> Result<()> {
        let logger = self.logger().clone();
        self.ngap_connect().await.map_err(|e| anyhow!("failed to connect to AMF: {}", e))?;

        let config = &self.shared().config;
        let plmn_identity = PlmnIdentity(config.core.plmn);
        let request = NgSetupRequest {
            global_ran_node_id: GlobalRanNodeId { plmn_identity, gnb_id: config.core.gnb_id },
            ran_node_name: config.core.ran_node_name.clone(),
            supported_ta_list: vec![SupportedTaItem { tac: Tac(config.core.tac), broadcast_plmns: vec![plmn_identity] }],
            default_paging_drx: PagingDrx::V128,
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            info!(logger, "NG Setup attempt"; "attempt" => attempt);
            match self.ngap_request::<NgSetup>(request.clone(), &logger).await {
                Ok((response, _transaction_id)) => {
                    info!(logger, "NG Setup complete"; "amf_name" => %response.amf_name);
                    return Ok(());
                }
                Err(RequestError::Failure(failure)) => {
                    warn!(logger, "NG Setup rejected by AMF"; "cause" => ?failure.cause, "time_to_wait" => ?failure.time_to_wait);
                    if attempt > config.core.max_setup_retries {
                        return Err(anyhow!("NG Setup rejected after {} attempts: {:?}", attempt, failure.cause));
                    }
                }
                Err(e) => {
                    warn!(logger, "NG Setup request failed"; "err" => %e);
                    if attempt > config.core.max_setup_retries {
                        return Err(anyhow!("NG Setup failed after {} attempts: {}", attempt, e));
                    }
                }
            }
        }
    }
}
