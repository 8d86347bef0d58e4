//! mock_du - lets a test script play the GNB-DU side of F1 (§4.G/§8): send
//! F1 Setup, send Initial UL RRC Message Transfer on a UE's behalf, then
//! receive and answer everything the CU-CP drives back.

use crate::channel_dispatcher::{encode, recv_indication, recv_request, ChannelDispatcher};
use anyhow::{anyhow, Result};
use async_channel::Receiver;
use asn1_per::{BitWriter, Encode};
use f1ap::{
    DlRrcMessageTransfer, DlRrcMessageTransferIndication, F1Setup, F1SetupRequest, F1SetupResponse,
    InitialUlRrcMessageTransfer, InitialUlRrcMessageTransferIndication, UeContextSetupRequest,
    UeContextSetupResponse, UlRrcMessageTransfer, UlRrcMessageTransferIndication,
};
use net::{IndicationHandler, InboundFrame, RequestError, RequestProvider, SctpTransportProvider, Stack};
use rand::Rng;
use slog::{info, o, Logger};
use ue_id::{CRnti, GnbCuUeF1apId, GnbDuUeF1apId};
use xxap::{GnbDuId, NrCgi, RrcContainer, SrbId, TransactionId};

const F1AP_SCTP_PPID: u32 = 62;
const F1AP_BIND_PORT: u16 = 38472;

pub struct MockDu {
    stack: Stack,
    rx: Receiver<InboundFrame>,
    logger: Logger,
}

impl MockDu {
    /// Opens the F1-C association to the CU-CP at `cu_cp_ip` from
    /// `local_ip`, wiring a fresh channel dispatcher to receive everything
    /// the CU-CP sends back.
    pub async fn connect(cu_cp_ip: &str, local_ip: &str, logger: &Logger) -> Result<Self> {
        let logger = logger.new(o!("role" => "mock-du"));
        let stack = Stack::new(SctpTransportProvider::new());
        let (dispatcher, rx) = ChannelDispatcher::new();
        let remote = format!("{}:{}", cu_cp_ip, F1AP_BIND_PORT);
        info!(logger, "connecting to CU-CP F1-C"; "remote" => %remote);
        stack.connect(&remote, local_ip, F1AP_SCTP_PPID, dispatcher, logger.clone()).await?;
        Ok(MockDu { stack, rx, logger })
    }

    pub async fn perform_f1_setup(&self, gnb_du_id: GnbDuId, served_cells: Vec<f1ap::ServedCellInformation>) -> Result<F1SetupResponse> {
        let request = F1SetupRequest { transaction_id: TransactionId(0), gnb_du_id, gnb_du_name: None, served_cells };
        info!(self.logger, "F1SetupRequest >>");
        match <Stack as RequestProvider<F1Setup>>::request(&self.stack, request, &self.logger).await {
            Ok((response, _)) => {
                info!(self.logger, "F1SetupResponse <<");
                Ok(response)
            }
            Err(RequestError::Failure(failure)) => Err(anyhow!("F1 Setup rejected: {:?}", failure.cause)),
            Err(e) => Err(anyhow!("F1 Setup failed: {}", e)),
        }
    }

    pub async fn send_initial_ul_rrc(&self, gnb_du_ue_f1ap_id: GnbDuUeF1apId, c_rnti: CRnti, nr_cgi: NrCgi, rrc_setup_request: Vec<u8>) -> Result<()> {
        let indication = InitialUlRrcMessageTransfer {
            gnb_du_ue_f1ap_id,
            nr_cgi,
            c_rnti,
            rrc_container: RrcContainer(rrc_setup_request),
            du_to_cu_rrc_container: None,
        };
        info!(self.logger, "InitialULRRCMessageTransfer >>");
        <Stack as IndicationHandler<InitialUlRrcMessageTransferIndication>>::handle(&self.stack, indication, &self.logger).await;
        Ok(())
    }

    /// Sends an UL RRC Message Transfer carrying `ul_dcch` over `srb_id`,
    /// on behalf of the UE known to the CU-CP under `gnb_cu_ue_f1ap_id`.
    pub async fn send_ul_rrc<T: Encode>(&self, gnb_du_ue_f1ap_id: GnbDuUeF1apId, gnb_cu_ue_f1ap_id: GnbCuUeF1apId, srb_id: SrbId, ul_dcch: &T) -> Result<()> {
        let mut w = BitWriter::new();
        ul_dcch.encode(&mut w).expect("well-formed UL DCCH message cannot fail to encode");
        let indication = UlRrcMessageTransfer { gnb_du_ue_f1ap_id, gnb_cu_ue_f1ap_id, srb_id, rrc_container: RrcContainer(w.into_bytes()) };
        info!(self.logger, "ULRRCMessageTransfer >>"; "srb_id" => srb_id.0);
        <Stack as IndicationHandler<UlRrcMessageTransferIndication>>::handle(&self.stack, indication, &self.logger).await;
        Ok(())
    }

    /// Waits for the next DL RRC Message Transfer the CU-CP sends (RRC
    /// Setup over SRB0, or anything over SRB1 once established).
    pub async fn recv_dl_rrc(&self) -> Result<DlRrcMessageTransfer> {
        let msg = recv_indication::<DlRrcMessageTransferIndication>(&self.rx).await?;
        info!(self.logger, "DLRRCMessageTransfer <<"; "srb_id" => msg.srb_id.0);
        Ok(msg)
    }

    /// Waits for a UE Context Setup Request and answers it with a
    /// synthetic DL GTP tunnel per requested DRB.
    pub async fn handle_ue_context_setup(&self, local_ip: &str) -> Result<UeContextSetupRequest> {
        let (request, responder) = recv_request::<f1ap::UeContextSetup>(&self.rx).await?;
        info!(self.logger, "UeContextSetupRequest <<"; "drbs" => request.drbs_to_setup.len());

        let drbs_setup = request
            .drbs_to_setup
            .iter()
            .map(|drb| f1ap::DrbSetupItem {
                drb_id: drb.drb_id,
                dl_up_tnl_information: xxap::UpTransportLayerInformation::GtpTunnel(xxap::GtpTunnel {
                    transport_layer_address: xxap::TransportLayerAddress::try_from(local_ip).expect("valid IPv4 literal"),
                    gtp_teid: xxap::GtpTeid(rand::thread_rng().gen()),
                }),
            })
            .collect();

        let response = UeContextSetupResponse {
            gnb_du_ue_f1ap_id: request.gnb_du_ue_f1ap_id,
            gnb_cu_ue_f1ap_id: request.gnb_cu_ue_f1ap_id,
            du_to_cu_rrc_information: f1ap::DuToCuRrcInformation { cell_group_config: f1ap::CellGroupConfig(Vec::new()) },
            drbs_setup,
        };
        info!(self.logger, "UeContextSetupResponse >>");
        responder.respond_success(&encode(&response)).await.map_err(|e| anyhow!("respond failed: {:?}", e))?;
        Ok(request)
    }
}
