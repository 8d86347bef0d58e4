//! mock_amf - lets a test script play the AMF side of NG (§4.F/§8): accept
//! the gNB's NG Setup, and drive Initial Context Setup / PDU Session
//! Resource Setup down to it once an Initial UE Message arrives.

use crate::channel_dispatcher::{recv_indication, recv_request, ChannelDispatcher};
use anyhow::{anyhow, Result};
use async_channel::Receiver;
use net::{InboundFrame, RequestError, RequestProvider, SctpTransportProvider, ShutdownHandle, Stack};
use ngap::{
    DlNasTransportIndication, InitialContextSetup, InitialContextSetupRequest,
    InitialContextSetupResponse, InitialUeMessage, InitialUeMessageIndication, NgSetup,
    NgSetupRequest, NgSetupResponse, PduSessionResourceSetup, PduSessionResourceSetupRequest,
    PduSessionResourceSetupResponse, UlNasTransportIndication,
};
use slog::{info, o, Logger};

const NGAP_SCTP_PPID: u32 = 60;
const NGAP_BIND_PORT: u16 = 38412;

pub struct MockAmf {
    stack: Stack,
    rx: Receiver<InboundFrame>,
    logger: Logger,
    shutdown: ShutdownHandle,
}

impl MockAmf {
    pub async fn listen(bind_ip: &str, logger: &Logger) -> Result<Self> {
        let logger = logger.new(o!("role" => "mock-amf"));
        let stack = Stack::new(SctpTransportProvider::new());
        let (dispatcher, rx) = ChannelDispatcher::new();
        let bind_addr = format!("{}:{}", bind_ip, NGAP_BIND_PORT);
        info!(logger, "listening for NG-C"; "bind_addr" => %bind_addr);
        let shutdown = stack.listen(bind_addr, NGAP_SCTP_PPID, dispatcher, logger.clone()).await?;
        Ok(MockAmf { stack, rx, logger, shutdown })
    }

    pub async fn recv_ng_setup(&self, amf_name: &str) -> Result<NgSetupRequest> {
        let (request, responder) = recv_request::<NgSetup>(&self.rx).await?;
        info!(self.logger, "NGSetupRequest <<"; "gnb_id" => request.global_ran_node_id.gnb_id);
        let response = NgSetupResponse { amf_name: amf_name.to_string() };
        let mut w = asn1_per::BitWriter::new();
        net::SerDes::encode(&response, &mut w).expect("well-formed NGSetupResponse cannot fail to encode");
        info!(self.logger, "NGSetupResponse >>");
        responder.respond_success(&w.into_bytes()).await.map_err(|e| anyhow!("respond failed: {:?}", e))?;
        Ok(request)
    }

    pub async fn recv_initial_ue_message(&self) -> Result<InitialUeMessage> {
        let msg = recv_indication::<InitialUeMessageIndication>(&self.rx).await?;
        info!(self.logger, "InitialUEMessage <<"; "ran_ue_ngap_id" => msg.ran_ue_ngap_id.0);
        Ok(msg)
    }

    pub async fn recv_ul_nas_transport(&self) -> Result<ngap::UlNasTransport> {
        let msg = recv_indication::<UlNasTransportIndication>(&self.rx).await?;
        info!(self.logger, "ULNASTransport <<");
        Ok(msg)
    }

    pub async fn send_dl_nas_transport(&self, transport: ngap::DlNasTransport) -> Result<()> {
        info!(self.logger, "DLNASTransport >>");
        <Stack as net::IndicationHandler<DlNasTransportIndication>>::handle(&self.stack, transport, &self.logger).await;
        Ok(())
    }

    pub async fn request_initial_context_setup(&self, request: InitialContextSetupRequest) -> Result<InitialContextSetupResponse> {
        info!(self.logger, "InitialContextSetupRequest >>");
        match <Stack as RequestProvider<InitialContextSetup>>::request(&self.stack, request, &self.logger).await {
            Ok((response, _)) => {
                info!(self.logger, "InitialContextSetupResponse <<");
                Ok(response)
            }
            Err(RequestError::Failure(failure)) => Err(anyhow!("Initial Context Setup rejected: {:?}", failure.cause)),
            Err(e) => Err(anyhow!("Initial Context Setup failed: {}", e)),
        }
    }

    pub async fn request_pdu_session_resource_setup(&self, request: PduSessionResourceSetupRequest) -> Result<PduSessionResourceSetupResponse> {
        info!(self.logger, "PDUSessionResourceSetupRequest >>");
        match <Stack as RequestProvider<PduSessionResourceSetup>>::request(&self.stack, request, &self.logger).await {
            Ok((response, _)) => {
                info!(self.logger, "PDUSessionResourceSetupResponse <<");
                Ok(response)
            }
            Err(RequestError::Failure(failure)) => Err(anyhow!("PDU Session Resource Setup rejected: {:?}", failure.cause)),
            Err(e) => Err(anyhow!("PDU Session Resource Setup failed: {}", e)),
        }
    }

    pub async fn shutdown(self) {
        self.shutdown.graceful_shutdown().await;
    }
}
