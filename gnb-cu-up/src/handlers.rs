//! Inbound E1AP dispatch (§4.H): the CU-UP answers Bearer Context Setup and
//! Modification requests from the CU-CP by allocating a synthetic DL GTP
//! tunnel per requested DRB. No actual user-plane data path exists here -
//! this crate only plays the control-plane role a real CU-UP would.

use crate::worker::SharedState;
use asn1_per::{BitReader, BitWriter};
use async_trait::async_trait;
use e1ap::{
    BearerContextModification, BearerContextSetup, BearerContextSetupResponse, DrbSetupItem,
    PduSessionSetupItem, PduSessionToSetupItem,
};
use net::frame::FrameTag;
use net::{InboundFrame, PduDispatcher, SerDes};
use rand::Rng;
use slog::{debug, warn, Logger};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use xxap::{GtpTeid, GtpTunnel, TransportLayerAddress, UpTransportLayerInformation};

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

pub struct BearerContextHandler {
    shared: Arc<SharedState>,
}

impl BearerContextHandler {
    pub fn new(shared: Arc<SharedState>) -> Self {
        BearerContextHandler { shared }
    }

    fn allocate_drbs(&self, sessions: &[PduSessionToSetupItem]) -> Vec<PduSessionSetupItem> {
        sessions
            .iter()
            .map(|session| {
                let drbs_setup = session
                    .drbs_to_setup
                    .iter()
                    .map(|&drb_id| DrbSetupItem {
                        drb_id,
                        dl_up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
                            transport_layer_address: self.shared.local_tla.clone(),
                            gtp_teid: self.next_teid(),
                        }),
                    })
                    .collect();
                PduSessionSetupItem { pdu_session_id: session.pdu_session_id, drbs_setup }
            })
            .collect()
    }

    fn next_teid(&self) -> GtpTeid {
        let value = self.shared.next_teid.fetch_add(1, Ordering::Relaxed);
        GtpTeid(value.to_be_bytes())
    }

    async fn handle_bearer_context_setup(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<e1ap::BearerContextSetupRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed BearerContextSetupRequest");
            return;
        };
        debug!(logger, "Bearer Context Setup"; "gnb_cu_cp_ue_e1ap_id" => req.gnb_cu_cp_ue_e1ap_id.0, "sessions" => req.pdu_sessions_to_setup.len());

        let gnb_cu_up_ue_e1ap_id = self.shared.allocate_ue_id();
        let response = BearerContextSetupResponse {
            gnb_cu_cp_ue_e1ap_id: req.gnb_cu_cp_ue_e1ap_id,
            gnb_cu_up_ue_e1ap_id,
            pdu_sessions_setup: self.allocate_drbs(&req.pdu_sessions_to_setup),
        };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }

    async fn handle_bearer_context_modification(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<e1ap::BearerContextModificationRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed BearerContextModificationRequest");
            return;
        };
        debug!(logger, "Bearer Context Modification"; "gnb_cu_cp_ue_e1ap_id" => req.gnb_cu_cp_ue_e1ap_id.0);

        let gnb_cu_up_ue_e1ap_id = req.gnb_cu_up_ue_e1ap_id.unwrap_or_else(|| self.shared.allocate_ue_id());
        let response = e1ap::BearerContextModificationResponse {
            gnb_cu_cp_ue_e1ap_id: req.gnb_cu_cp_ue_e1ap_id,
            gnb_cu_up_ue_e1ap_id,
            pdu_sessions_setup: self.allocate_drbs(&req.pdu_sessions_to_setup),
        };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }
}

#[async_trait]
impl PduDispatcher for BearerContextHandler {
    async fn dispatch(&self, frame: InboundFrame, logger: &Logger) {
        match (frame.tag, frame.proc_code) {
            (FrameTag::Request, code) if code == <BearerContextSetup as net::Procedure>::CODE => {
                self.handle_bearer_context_setup(frame, logger).await
            }
            (FrameTag::Request, code) if code == <BearerContextModification as net::Procedure>::CODE => {
                self.handle_bearer_context_modification(frame, logger).await
            }
            (tag, code) => warn!(logger, "unhandled E1AP PDU"; "tag" => ?tag, "proc_code" => code),
        }
    }
}

// Keeps `TransportLayerAddress` construction colocated with the handler
// rather than string-parsed at every allocation.
pub fn parse_local_tla(ip_addr: std::net::IpAddr) -> TransportLayerAddress {
    TransportLayerAddress::try_from(ip_addr.to_string().as_str()).expect("CU-UP bound to a valid IPv4 address")
}
