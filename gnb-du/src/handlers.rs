//! Inbound F1AP dispatch (§4.G/§4.K), the DU-side mirror of
//! `gnb_cu_cp::handlers::F1apHandler`: answers UE Context Setup from the
//! CU-CP with synthetic UL GTP tunnels, and logs DL RRC Message Transfer -
//! there is no real radio below this crate to hand the RRC container to.

use crate::worker::SharedState;
use asn1_per::{BitReader, BitWriter};
use async_trait::async_trait;
use f1ap::{DlRrcMessageTransferIndication, DrbSetupItem, DuToCuRrcInformation, CellGroupConfig, UeContextSetup, UeContextSetupResponse};
use net::frame::FrameTag;
use net::{InboundFrame, PduDispatcher, SerDes};
use rand::Rng;
use slog::{debug, warn, Logger};
use std::sync::Arc;
use xxap::{GtpTeid, GtpTunnel, UpTransportLayerInformation};

fn decode<T: SerDes>(payload: &asn1_per::Buffer) -> Option<T> {
    let bytes = payload.to_contiguous();
    let mut reader = BitReader::new(&bytes);
    T::decode(&mut reader).ok()
}

fn encode<T: SerDes>(value: &T) -> Vec<u8> {
    let mut writer = BitWriter::new();
    value.encode(&mut writer).expect("well-formed outbound PDU cannot fail to encode");
    writer.into_bytes()
}

pub struct F1apHandler {
    shared: Arc<SharedState>,
}

impl F1apHandler {
    pub fn new(shared: Arc<SharedState>) -> Self {
        F1apHandler { shared }
    }

    async fn handle_dl_rrc(&self, frame: InboundFrame, logger: &Logger) {
        let Some(msg) = decode::<f1ap::DlRrcMessageTransfer>(&frame.payload) else {
            warn!(logger, "dropped malformed DlRRCMessageTransfer");
            return;
        };
        debug!(logger, "DLRRCMessageTransfer <<"; "gnb_du_ue_f1ap_id" => msg.gnb_du_ue_f1ap_id.0, "srb_id" => msg.srb_id.0, "len" => msg.rrc_container.0.len());
    }

    async fn handle_ue_context_setup(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<f1ap::UeContextSetupRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed UeContextSetupRequest");
            return;
        };
        debug!(logger, "UeContextSetupRequest <<"; "gnb_du_ue_f1ap_id" => req.gnb_du_ue_f1ap_id.0, "drbs" => req.drbs_to_setup.len());

        let drbs_setup = req
            .drbs_to_setup
            .iter()
            .map(|drb| DrbSetupItem {
                drb_id: drb.drb_id,
                dl_up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
                    transport_layer_address: self.shared.local_tla.clone(),
                    gtp_teid: GtpTeid(rand::thread_rng().gen()),
                }),
            })
            .collect();

        let response = UeContextSetupResponse {
            gnb_du_ue_f1ap_id: req.gnb_du_ue_f1ap_id,
            gnb_cu_ue_f1ap_id: req.gnb_cu_ue_f1ap_id,
            du_to_cu_rrc_information: DuToCuRrcInformation { cell_group_config: CellGroupConfig(Vec::new()) },
            drbs_setup,
        };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }
}

#[async_trait]
impl PduDispatcher for F1apHandler {
    async fn dispatch(&self, frame: InboundFrame, logger: &Logger) {
        match (frame.tag, frame.proc_code) {
            (FrameTag::Indication, code) if code == <DlRrcMessageTransferIndication as net::Indication>::CODE => {
                self.handle_dl_rrc(frame, logger).await
            }
            (FrameTag::Request, code) if code == <UeContextSetup as net::Procedure>::CODE => {
                self.handle_ue_context_setup(frame, logger).await
            }
            (tag, code) => warn!(logger, "unhandled F1AP PDU"; "tag" => ?tag, "proc_code" => code),
        }
    }
}
