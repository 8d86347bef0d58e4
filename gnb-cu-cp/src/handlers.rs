//! Inbound PDU dispatch (§4.G-I): one `net::PduDispatcher` per interface,
//! each decoding a frame's `proc_code` into the concrete message type and
//! driving the shared UE/cell state and RRC state machine forward.
//!
//! `net::Stack::request`/`send_one_way` encode/decode `net::SerDes` types
//! by hand-building an `asn1_per::BitWriter`/`BitReader` rather than
//! calling `asn1_per::pack`/`unpack` (those only accept the separate
//! `asn1_per::Encode`/`Decode` traits that RRC messages and a handful of
//! nested IEs implement). The dispatchers below follow the same pattern.

use crate::worker::{SharedState, UeContext};
use async_trait::async_trait;
use asn1_per::{BitReader, BitWriter};
use e1ap::{
    BearerContextSetup, BearerContextSetupRequest, GnbCuCpUeE1apId, GnbCuUpE1Setup,
    GnbCuUpE1SetupResponse, PduSessionToSetupItem,
};
use f1ap::{
    DlRrcMessageTransfer, DlRrcMessageTransferIndication, DrbToSetupItem, F1Setup,
    F1SetupFailure, F1SetupRequest, F1SetupResponse, InitialUlRrcMessageTransfer,
    InitialUlRrcMessageTransferIndication, UeContextSetup, UeContextSetupRequest,
    UlRrcMessageTransfer, UlRrcMessageTransferIndication,
};
use net::frame::FrameTag;
use net::{IndicationHandler, InboundFrame, PduDispatcher, RequestProvider, SerDes, Stack};
use ngap::{
    InitialContextSetupRequest, InitialContextSetupResponse, InitialUeMessage,
    InitialUeMessageIndication, PduSessionResourceSetupRequest, PduSessionResourceSetupResponse,
    UlNasTransport, UlNasTransportIndication,
};
use rrc::{DlCcchMessage, DlDcchMessage, RrcReconfiguration, RrcTransactionIdentifier, SecurityModeCommand, UlCcchMessage, UlDcchMessage};
use slog::{debug, warn, Logger};
use std::sync::Arc;
use ue_id::{GnbCuUeF1apId, GnbDuUeF1apId, RanUeNgapId};
use xxap::{Cause, NasPdu, RrcContainer, SrbId};

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

fn pack_rrc<T: asn1_per::Encode>(value: &T) -> RrcContainer {
    let mut writer = BitWriter::new();
    value.encode(&mut writer).expect("well-formed outbound RRC PDU cannot fail to encode");
    RrcContainer(writer.into_bytes())
}

fn unpack_rrc<T: asn1_per::Decode>(container: &RrcContainer) -> Option<T> {
    let mut reader = BitReader::new(&container.0);
    T::decode(&mut reader).ok()
}

/// Sends a DL RRC Message Transfer carrying `dl_dcch` over `srb_id` to the
/// UE identified by `index`.
async fn send_dl_dcch(shared: &Arc<SharedState>, index: usize, srb_id: SrbId, dl_dcch: DlDcchMessage, logger: &Logger) {
    let Some(gnb_du_ue_f1ap_id) = shared.ues.lock().await.du_f1ap_id_of(index) else {
        warn!(logger, "cannot reach DU side of UE"; "index" => index);
        return;
    };
    let msg = DlRrcMessageTransfer {
        gnb_du_ue_f1ap_id,
        gnb_cu_ue_f1ap_id: GnbCuUeF1apId(index as u32),
        srb_id,
        rrc_container: pack_rrc(&dl_dcch),
    };
    <Stack as IndicationHandler<DlRrcMessageTransferIndication>>::handle(&shared.f1ap, msg, logger).await;
}

/// F1AP (§4.G): DU-facing dispatch.
pub struct F1apHandler {
    shared: Arc<SharedState>,
}

impl F1apHandler {
    pub fn new(shared: Arc<SharedState>) -> Self {
        F1apHandler { shared }
    }

    async fn handle_f1_setup(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<F1SetupRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed F1SetupRequest");
            return;
        };
        let mut cells = self.shared.cells.lock().await;
        for served in &req.served_cells {
            let cfg = du::CellConfig {
                nr_cgi: served.nr_cgi,
                tac: served.tac,
                packed_mib: served.packed_mib.clone(),
                packed_sib1: served.packed_sib1.clone(),
            };
            if let Err(e) = cells.add(cfg) {
                warn!(logger, "rejecting F1 Setup"; "err" => ?e);
                let failure = F1SetupFailure { transaction_id: req.transaction_id, cause: Cause::RADIO_UNSPECIFIED, time_to_wait: None };
                let _ = frame.responder.respond_failure(&encode(&failure)).await;
                return;
            }
        }
        drop(cells);
        debug!(logger, "F1 Setup accepted"; "cells" => req.served_cells.len());
        let response = F1SetupResponse { transaction_id: req.transaction_id, gnb_cu_name: self.shared.config.core.ran_node_name.clone() };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }

    async fn handle_initial_ul_rrc(&self, frame: InboundFrame, logger: &Logger) {
        let Some(ind) = decode::<InitialUlRrcMessageTransfer>(&frame.payload) else {
            warn!(logger, "dropped malformed InitialULRRCMessageTransfer");
            return;
        };
        let Some(UlCcchMessage::RrcSetupRequest(setup_request)) = unpack_rrc(&ind.rrc_container) else {
            warn!(logger, "dropped InitialULRRCMessageTransfer with no RRC Setup Request");
            return;
        };

        let tac = {
            let cells = self.shared.cells.lock().await;
            match cells.by_nr_cgi(&ind.nr_cgi) {
                Ok((_, cell)) => cell.tac,
                Err(e) => {
                    warn!(logger, "InitialULRRCMessageTransfer for unknown cell"; "err" => ?e);
                    return;
                }
            }
        };

        let index = self.shared.allocate_ue_index();
        let mut ctx = UeContext::new(ind.c_rnti, ind.nr_cgi, tac);
        ctx.establishment_cause = setup_request.establishment_cause;
        let txn = match ctx.rrc.on_rrc_setup_request() {
            Ok(txn) => txn,
            Err(e) => {
                warn!(logger, "RRC Setup Request rejected by state machine"; "err" => ?e);
                return;
            }
        };
        let mut ues = self.shared.ues.lock().await;
        if let Err(e) = ues.add(index, ctx) {
            warn!(logger, "cannot admit new UE"; "err" => ?e);
            return;
        }
        if let Err(e) = ues.assign_du_f1ap_id(index, ind.gnb_du_ue_f1ap_id) {
            warn!(logger, "cannot bind DU UE F1AP id"; "err" => ?e);
            return;
        }
        drop(ues);

        debug!(logger, "RRC Setup Request"; "index" => index, "c_rnti" => ind.c_rnti.0);
        let rrc_setup = rrc::RrcSetup { rrc_transaction_identifier: RrcTransactionIdentifier(txn), cell_group_config: Vec::new() };
        send_dl_dcch_ccch(&self.shared, index, ind.gnb_du_ue_f1ap_id, DlCcchMessage::RrcSetup(rrc_setup), logger).await;
    }

    async fn handle_ul_rrc(&self, frame: InboundFrame, logger: &Logger) {
        let Some(msg) = decode::<UlRrcMessageTransfer>(&frame.payload) else {
            warn!(logger, "dropped malformed ULRRCMessageTransfer");
            return;
        };
        let index = msg.gnb_cu_ue_f1ap_id.0 as usize;
        let Some(dcch) = unpack_rrc::<UlDcchMessage>(&msg.rrc_container) else {
            warn!(logger, "dropped unparseable UL DCCH message"; "index" => index);
            return;
        };
        match dcch {
            UlDcchMessage::RrcSetupComplete(complete) => self.on_rrc_setup_complete(index, complete, logger).await,
            UlDcchMessage::SecurityModeComplete(_) => self.on_security_mode_complete(index, logger).await,
            UlDcchMessage::RrcReconfigurationComplete(_) => self.on_reconfiguration_complete(index, logger).await,
            UlDcchMessage::UlInformationTransfer(transfer) => self.on_ul_information_transfer(index, transfer, logger).await,
        }
    }

    async fn on_rrc_setup_complete(&self, index: usize, complete: rrc::RrcSetupComplete, logger: &Logger) {
        let (establishment_cause, nr_cgi, tac) = {
            let mut ues = self.shared.ues.lock().await;
            let Some(ctx) = ues.find_by_index_mut(index) else {
                warn!(logger, "RRC Setup Complete for unknown UE"; "index" => index);
                return;
            };
            if let Err(e) = ctx.rrc.on_rrc_setup_complete() {
                warn!(logger, "RRC Setup Complete rejected by state machine"; "err" => ?e);
                return;
            }
            (ctx.establishment_cause, ctx.nr_cgi, ctx.tac)
        };
        debug!(logger, "RRC Setup Complete, forwarding Initial UE Message"; "index" => index);
        let initial_ue_message = InitialUeMessage {
            ran_ue_ngap_id: RanUeNgapId(index as u32),
            nas_pdu: NasPdu(complete.dedicated_nas_message),
            establishment_cause,
            nr_cgi,
            tac,
        };
        <Stack as IndicationHandler<InitialUeMessageIndication>>::handle(&self.shared.ngap, initial_ue_message, logger).await;
    }

    async fn on_security_mode_complete(&self, index: usize, logger: &Logger) {
        let mut ues = self.shared.ues.lock().await;
        match ues.find_by_index_mut(index).map(|ctx| ctx.rrc.on_security_mode_complete()) {
            Some(Ok(())) => debug!(logger, "Security Mode Complete"; "index" => index),
            Some(Err(e)) => warn!(logger, "Security Mode Complete rejected by state machine"; "err" => ?e),
            None => warn!(logger, "Security Mode Complete for unknown UE"; "index" => index),
        }
    }

    async fn on_reconfiguration_complete(&self, index: usize, logger: &Logger) {
        let mut ues = self.shared.ues.lock().await;
        match ues.find_by_index_mut(index).map(|ctx| ctx.rrc.on_reconfiguration_complete()) {
            Some(Ok(())) => debug!(logger, "RRC Reconfiguration Complete"; "index" => index),
            Some(Err(e)) => warn!(logger, "RRC Reconfiguration Complete rejected by state machine"; "err" => ?e),
            None => warn!(logger, "RRC Reconfiguration Complete for unknown UE"; "index" => index),
        }
    }

    async fn on_ul_information_transfer(&self, index: usize, transfer: rrc::UlInformationTransfer, logger: &Logger) {
        let Some(nas) = transfer.dedicated_nas_message else {
            return;
        };
        let Some(amf_ue_ngap_id) = self.shared.ues.lock().await.amf_ngap_id_of(index) else {
            warn!(logger, "UL Information Transfer before AMF-UE-NGAP-ID learned"; "index" => index);
            return;
        };
        let ul_nas_transport = UlNasTransport { ran_ue_ngap_id: RanUeNgapId(index as u32), amf_ue_ngap_id, nas_pdu: NasPdu(nas) };
        <Stack as IndicationHandler<UlNasTransportIndication>>::handle(&self.shared.ngap, ul_nas_transport, logger).await;
    }
}

/// Sends an initial DL RRC Message Transfer over SRB0/CCCH, for the one
/// message (RRC Setup) sent before SRB1 exists.
async fn send_dl_dcch_ccch(shared: &Arc<SharedState>, index: usize, gnb_du_ue_f1ap_id: GnbDuUeF1apId, dl_ccch: DlCcchMessage, logger: &Logger) {
    let msg = DlRrcMessageTransfer {
        gnb_du_ue_f1ap_id,
        gnb_cu_ue_f1ap_id: GnbCuUeF1apId(index as u32),
        srb_id: SrbId(0),
        rrc_container: pack_rrc(&dl_ccch),
    };
    <Stack as IndicationHandler<DlRrcMessageTransferIndication>>::handle(&shared.f1ap, msg, logger).await;
}

#[async_trait]
impl PduDispatcher for F1apHandler {
    async fn dispatch(&self, frame: InboundFrame, logger: &Logger) {
        match (frame.tag, frame.proc_code) {
            (FrameTag::Request, code) if code == <F1Setup as net::Procedure>::CODE => self.handle_f1_setup(frame, logger).await,
            (FrameTag::Indication, code) if code == <InitialUlRrcMessageTransferIndication as net::Indication>::CODE => {
                self.handle_initial_ul_rrc(frame, logger).await
            }
            (FrameTag::Indication, code) if code == <UlRrcMessageTransferIndication as net::Indication>::CODE => {
                self.handle_ul_rrc(frame, logger).await
            }
            (tag, code) => warn!(logger, "unhandled F1AP PDU"; "tag" => ?tag, "proc_code" => code),
        }
    }
}

/// NGAP (§4.F): AMF-facing dispatch.
pub struct NgapHandler {
    shared: Arc<SharedState>,
}

impl NgapHandler {
    pub fn new(shared: Arc<SharedState>) -> Self {
        NgapHandler { shared }
    }

    async fn handle_dl_nas_transport(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<ngap::DlNasTransport>(&frame.payload) else {
            warn!(logger, "dropped malformed DLNASTransport");
            return;
        };
        let index = req.ran_ue_ngap_id.0 as usize;
        if let Some(amf_ue_ngap_id) = req.amf_ue_ngap_id {
            if let Err(e) = self.shared.ues.lock().await.assign_amf_ngap_id(index, amf_ue_ngap_id) {
                warn!(logger, "rejecting inconsistent AMF-UE-NGAP-ID"; "err" => ?e);
                return;
            }
        }
        let dl_info = rrc::DlInformationTransfer { dedicated_nas_message: Some(req.nas_pdu.0) };
        send_dl_dcch(&self.shared, index, SrbId(1), DlDcchMessage::DlInformationTransfer(dl_info), logger).await;
    }

    async fn handle_initial_context_setup(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<InitialContextSetupRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed InitialContextSetupRequest");
            return;
        };
        let index = req.ran_ue_ngap_id.0 as usize;
        let txn = {
            let mut ues = self.shared.ues.lock().await;
            match ues.find_by_index_mut(index).map(|ctx| ctx.rrc.on_initial_context_setup()) {
                Some(Ok(txn)) => txn,
                Some(Err(e)) => {
                    warn!(logger, "Initial Context Setup rejected by state machine"; "err" => ?e);
                    let failure = ngap::InitialContextSetupFailure { ran_ue_ngap_id: req.ran_ue_ngap_id, cause: Cause::RADIO_UNSPECIFIED };
                    let _ = frame.responder.respond_failure(&encode(&failure)).await;
                    return;
                }
                None => {
                    warn!(logger, "Initial Context Setup for unknown UE"; "index" => index);
                    return;
                }
            }
        };
        debug!(logger, "Initial Context Setup, sending Security Mode Command"; "index" => index);
        let smc = SecurityModeCommand { rrc_transaction_identifier: RrcTransactionIdentifier(txn) };
        send_dl_dcch(&self.shared, index, SrbId(1), DlDcchMessage::SecurityModeCommand(smc), logger).await;

        if let Some(nas_pdu) = req.nas_pdu {
            let dl_info = rrc::DlInformationTransfer { dedicated_nas_message: Some(nas_pdu.0) };
            send_dl_dcch(&self.shared, index, SrbId(1), DlDcchMessage::DlInformationTransfer(dl_info), logger).await;
        }

        let response = InitialContextSetupResponse { ran_ue_ngap_id: req.ran_ue_ngap_id };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }

    async fn handle_pdu_session_resource_setup(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<PduSessionResourceSetupRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed PDUSessionResourceSetupRequest");
            return;
        };
        let index = req.ran_ue_ngap_id.0 as usize;

        let mut pdu_sessions_to_setup = Vec::new();
        {
            let mut ues = self.shared.ues.lock().await;
            let Some(ctx) = ues.find_by_index_mut(index) else {
                warn!(logger, "PDU Session Resource Setup for unknown UE"; "index" => index);
                return;
            };
            for session in &req.pdu_session_resources {
                for flow in &session.qos_flows {
                    if let Err(e) = ctx.drbs.allocate_for_flow(session.pdu_session_id, session.snssai, flow, &self.shared.config.core.five_qi_config) {
                        warn!(logger, "DRB allocation failed"; "pdu_session_id" => session.pdu_session_id, "err" => ?e);
                    }
                }
                let drbs_to_setup = ctx.drbs.drbs_for_session(session.pdu_session_id);
                if !drbs_to_setup.is_empty() {
                    pdu_sessions_to_setup.push(PduSessionToSetupItem { pdu_session_id: session.pdu_session_id, snssai: session.snssai, drbs_to_setup });
                }
            }
        }

        if pdu_sessions_to_setup.is_empty() {
            let response = PduSessionResourceSetupResponse { ran_ue_ngap_id: req.ran_ue_ngap_id, succeeded: Vec::new(), failed: Vec::new() };
            let _ = frame.responder.respond_success(&encode(&response)).await;
            return;
        }

        let bearer_context_request = BearerContextSetupRequest {
            gnb_cu_cp_ue_e1ap_id: GnbCuCpUeE1apId(index as u32),
            gnb_cu_up_ue_e1ap_id: None,
            pdu_sessions_to_setup,
        };
        let (bearer_context_response, _) = match self.shared.e1ap_request_bearer_context_setup(bearer_context_request, logger).await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(logger, "Bearer Context Setup failed"; "err" => ?e);
                let response = PduSessionResourceSetupResponse { ran_ue_ngap_id: req.ran_ue_ngap_id, succeeded: Vec::new(), failed: Vec::new() };
                let _ = frame.responder.respond_success(&encode(&response)).await;
                return;
            }
        };

        let mut drbs_to_setup = Vec::new();
        let mut succeeded = Vec::new();
        for session in &bearer_context_response.pdu_sessions_setup {
            succeeded.push(session.pdu_session_id);
            for drb in &session.drbs_setup {
                drbs_to_setup.push(DrbToSetupItem { drb_id: drb.drb_id, ul_up_tnl_information: drb.dl_up_tnl_information.clone() });
            }
        }

        let Some(gnb_du_ue_f1ap_id) = self.shared.ues.lock().await.du_f1ap_id_of(index) else {
            warn!(logger, "no DU side known for UE"; "index" => index);
            return;
        };
        let ue_context_setup_request = UeContextSetupRequest {
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(index as u32),
            gnb_du_ue_f1ap_id,
            srbs_to_setup: Vec::new(),
            drbs_to_setup,
        };
        if let Err(e) = self.shared.f1ap_request_ue_context_setup(ue_context_setup_request, logger).await {
            warn!(logger, "UE Context Setup failed"; "err" => ?e);
        }

        let txn = {
            let mut ues = self.shared.ues.lock().await;
            match ues.find_by_index_mut(index) {
                Some(ctx) => ctx.rrc.on_rrc_reconfiguration(),
                None => {
                    warn!(logger, "PDU Session Resource Setup for unknown UE"; "index" => index);
                    return;
                }
            }
        };
        match txn {
            Ok(txn) => {
                debug!(logger, "PDU Session Resource Setup, sending RRC Reconfiguration"; "index" => index);
                let reconfig = RrcReconfiguration {
                    rrc_transaction_identifier: RrcTransactionIdentifier(txn),
                    radio_bearer_config: None,
                    master_cell_group: None,
                    dedicated_nas_message_list: Vec::new(),
                };
                send_dl_dcch(&self.shared, index, SrbId(1), DlDcchMessage::RrcReconfiguration(reconfig), logger).await;
            }
            Err(e) => warn!(logger, "RRC Reconfiguration rejected by state machine"; "err" => ?e),
        }

        let response = PduSessionResourceSetupResponse { ran_ue_ngap_id: req.ran_ue_ngap_id, succeeded, failed: Vec::new() };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }
}

#[async_trait]
impl PduDispatcher for NgapHandler {
    async fn dispatch(&self, frame: InboundFrame, logger: &Logger) {
        match (frame.tag, frame.proc_code) {
            (FrameTag::Indication, code) if code == <ngap::DlNasTransportIndication as net::Indication>::CODE => {
                self.handle_dl_nas_transport(frame, logger).await
            }
            (FrameTag::Request, code) if code == <ngap::InitialContextSetup as net::Procedure>::CODE => {
                self.handle_initial_context_setup(frame, logger).await
            }
            (FrameTag::Request, code) if code == <ngap::PduSessionResourceSetup as net::Procedure>::CODE => {
                self.handle_pdu_session_resource_setup(frame, logger).await
            }
            (tag, code) => warn!(logger, "unhandled NGAP PDU"; "tag" => ?tag, "proc_code" => code),
        }
    }
}

/// E1AP (§4.H): CU-UP-facing dispatch.
pub struct E1apHandler {
    shared: Arc<SharedState>,
}

impl E1apHandler {
    pub fn new(shared: Arc<SharedState>) -> Self {
        E1apHandler { shared }
    }

    async fn handle_cu_up_e1_setup(&self, frame: InboundFrame, logger: &Logger) {
        let Some(req) = decode::<e1ap::GnbCuUpE1SetupRequest>(&frame.payload) else {
            warn!(logger, "dropped malformed GNBCUUPE1SetupRequest");
            return;
        };
        debug!(logger, "CU-UP registered"; "gnb_cu_up_id" => req.gnb_cu_up_id.0);
        let response = GnbCuUpE1SetupResponse { gnb_cu_cp_name: self.shared.config.core.ran_node_name.clone() };
        let _ = frame.responder.respond_success(&encode(&response)).await;
    }
}

#[async_trait]
impl PduDispatcher for E1apHandler {
    async fn dispatch(&self, frame: InboundFrame, logger: &Logger) {
        match (frame.tag, frame.proc_code) {
            (FrameTag::Request, code) if code == <GnbCuUpE1Setup as net::Procedure>::CODE => self.handle_cu_up_e1_setup(frame, logger).await,
            (tag, code) => warn!(logger, "unhandled E1AP PDU"; "tag" => ?tag, "proc_code" => code),
        }
    }
}

impl SharedState {
    async fn e1ap_request_bearer_context_setup(
        &self,
        r: BearerContextSetupRequest,
        logger: &Logger,
    ) -> std::result::Result<(e1ap::BearerContextSetupResponse, net::TransactionId), net::RequestError<e1ap::BearerContextFailure>> {
        RequestProvider::<BearerContextSetup>::request(&self.e1ap, r, logger).await
    }

    async fn f1ap_request_ue_context_setup(
        &self,
        r: UeContextSetupRequest,
        logger: &Logger,
    ) -> std::result::Result<(f1ap::UeContextSetupResponse, net::TransactionId), net::RequestError<f1ap::UeContextFailure>> {
        RequestProvider::<UeContextSetup>::request(&self.f1ap, r, logger).await
    }
}
