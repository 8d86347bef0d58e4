//! End-to-end scenarios (§8) driving a real `gnb_cu_cp::Worker` (and, for
//! the PDU session case, a real `gnb_cu_up::Worker`) against `mocks::MockDu`
//! and `mocks::MockAmf` playing the DU and AMF peers over loopback SCTP.

use anyhow::Result;
use asn1_per::{BitWriter, Encode};
use common::CoreConfig;
use f1ap::ServedCellInformation;
use gnb_cu_cp::Worker as CuCp;
use mocks::{MockAmf, MockDu};
use ngap::{InitialContextSetupRequest, PduSessionResourceSetupItem, PduSessionResourceSetupRequest};
use rrc::{EstablishmentCause, RrcSetupRequest, UlCcchMessage, UlDcchMessage};
use ue_id::{CRnti, GnbCuUeF1apId, GnbDuUeF1apId, RanUeNgapId};
use xxap::{
    GnbDuId, NasPdu, NrCellIdentity, NrCgi, PlmnIdentity, QosCharacteristics,
    QosFlowLevelQosParameters, QosFlowIdentifier, QosFlowSetupRequestItem, SecurityKey, Snssai,
    SrbId, SupportedAlgorithms, Tac,
};

fn test_logger() -> slog::Logger {
    common::logging::build_logger("integration-test")
}

fn cell(nr_cell_id: u64) -> (NrCgi, ServedCellInformation) {
    let nr_cgi = NrCgi { plmn_identity: PlmnIdentity([0x00, 0xf1, 0x10]), nr_cell_identity: NrCellIdentity::new(nr_cell_id) };
    let served = ServedCellInformation { nr_cgi, tac: Tac([0, 0, 1]), packed_mib: vec![0; 3], packed_sib1: vec![0; 8] };
    (nr_cgi, served)
}

fn encode_ccch(msg: &UlCcchMessage) -> Vec<u8> {
    let mut w = BitWriter::new();
    msg.encode(&mut w).unwrap();
    w.into_bytes()
}

#[async_std::test]
async fn ng_setup_happy_path() -> Result<()> {
    let logger = test_logger();
    let ip = "127.0.10.1";

    let mut core = CoreConfig::default();
    core.ran_node_name = Some("gnb-under-test".to_string());
    let cu_cp = CuCp::new(gnb_cu_cp::Config { core, ip_addr: ip.parse()?, amf_ip_addr: ip.parse()? }, logger.clone());

    let amf = MockAmf::listen(ip, &logger).await?;

    let (ng_setup_result, recv_result) = futures_lite::future::zip(cu_cp.ng_setup(), amf.recv_ng_setup("open5gs-amf0")).await;
    recv_result?;
    ng_setup_result?;

    cu_cp.graceful_shutdown().await;
    amf.shutdown().await;
    Ok(())
}

/// Scenario 4 (Initial UE flow) followed immediately by scenario 5 (PDU
/// session setup, happy path): one UE's RRC Setup through to a PDU session
/// resource successfully admitted, driven by a real CU-CP and CU-UP.
#[async_std::test]
async fn initial_ue_attach_then_pdu_session_setup() -> Result<()> {
    let logger = test_logger();
    let cu_ip = "127.0.10.2";
    let du_ip = "127.0.10.3";
    let amf_ip = "127.0.10.2";
    let cu_up_ip = "127.0.10.4";

    let mut core = CoreConfig::default();
    core.ran_node_name = Some("gnb-under-test".to_string());
    let cu_cp = CuCp::new(gnb_cu_cp::Config { core: core.clone(), ip_addr: cu_ip.parse()?, amf_ip_addr: amf_ip.parse()? }, logger.clone());
    cu_cp.serve_f1ap().await?;
    cu_cp.serve_e1ap().await?;

    let amf = MockAmf::listen(amf_ip, &logger).await?;
    let (ng_setup_result, recv_result) = futures_lite::future::zip(cu_cp.ng_setup(), amf.recv_ng_setup("open5gs-amf0")).await;
    recv_result?;
    ng_setup_result?;

    let cu_up = gnb_cu_up::Worker::new(
        gnb_cu_up::Config { core: core.clone(), ip_addr: cu_up_ip.parse()?, cu_cp_ip_addr: cu_ip.parse()?, gnb_cu_up_id: xxap::GnbCuUpId(1), gnb_cu_up_name: None },
        logger.clone(),
    );
    cu_up.connect().await?;
    cu_up.e1_setup().await?;

    let du = MockDu::connect(cu_ip, du_ip, &logger).await?;
    let (nr_cgi, served_cell) = cell(1);
    du.perform_f1_setup(GnbDuId(1), vec![served_cell]).await?;

    let gnb_du_ue_f1ap_id = GnbDuUeF1apId(41255);
    let c_rnti = CRnti(0x4601);
    let rrc_setup_request = UlCcchMessage::RrcSetupRequest(RrcSetupRequest { ue_identity: [0; 5], establishment_cause: EstablishmentCause::MoSignalling });
    du.send_initial_ul_rrc(gnb_du_ue_f1ap_id, c_rnti, nr_cgi, encode_ccch(&rrc_setup_request)).await?;

    let dl_rrc_setup = du.recv_dl_rrc().await?;
    assert_eq!(dl_rrc_setup.srb_id, SrbId(0));
    assert_eq!(dl_rrc_setup.gnb_du_ue_f1ap_id, gnb_du_ue_f1ap_id);
    let gnb_cu_ue_f1ap_id = dl_rrc_setup.gnb_cu_ue_f1ap_id;
    assert_eq!(gnb_cu_ue_f1ap_id, GnbCuUeF1apId(0));

    let rrc_setup_complete = UlDcchMessage::RrcSetupComplete(rrc::RrcSetupComplete {
        rrc_transaction_identifier: rrc::RrcTransactionIdentifier(0),
        selected_plmn_identity: 0,
        dedicated_nas_message: vec![0xaa, 0xbb],
    });
    let (_, initial_ue_message) = futures_lite::future::zip(
        du.send_ul_rrc(gnb_du_ue_f1ap_id, gnb_cu_ue_f1ap_id, SrbId(1), &rrc_setup_complete),
        amf.recv_initial_ue_message(),
    )
    .await;
    let initial_ue_message = initial_ue_message?;
    assert_eq!(initial_ue_message.ran_ue_ngap_id, RanUeNgapId(0));
    assert_eq!(initial_ue_message.nas_pdu, NasPdu(vec![0xaa, 0xbb]));

    let initial_context_setup_request = InitialContextSetupRequest {
        ran_ue_ngap_id: initial_ue_message.ran_ue_ngap_id,
        security_key: SecurityKey([7u8; 32]),
        ue_security_capabilities: ngap::UeSecurityCapabilities {
            nr_integrity_algorithms: SupportedAlgorithms(0xE000),
            nr_ciphering_algorithms: SupportedAlgorithms(0xE000),
        },
        nas_pdu: None,
    };
    let (context_setup_result, smc) = futures_lite::future::zip(
        amf.request_initial_context_setup(initial_context_setup_request),
        du.recv_dl_rrc(),
    )
    .await;
    context_setup_result?;
    let smc = smc?;
    assert_eq!(smc.srb_id, SrbId(1));

    let pdu_session_request = PduSessionResourceSetupRequest {
        ran_ue_ngap_id: initial_ue_message.ran_ue_ngap_id,
        pdu_session_resources: vec![PduSessionResourceSetupItem {
            pdu_session_id: 1,
            snssai: Snssai { sst: 1, sd: None },
            qos_flows: vec![QosFlowSetupRequestItem {
                qos_flow_identifier: QosFlowIdentifier(0),
                qos_flow_level_qos_parameters: QosFlowLevelQosParameters { qos_characteristics: QosCharacteristics::NonDynamic { five_qi: 9 } },
            }],
        }],
    };
    let (response, ue_context_setup) = futures_lite::future::zip(
        amf.request_pdu_session_resource_setup(pdu_session_request),
        du.handle_ue_context_setup(du_ip),
    )
    .await;
    let response = response?;
    assert_eq!(response.succeeded, vec![1]);
    assert!(response.failed.is_empty());
    let ue_context_setup = ue_context_setup?;
    assert_eq!(ue_context_setup.drbs_to_setup.len(), 1);

    let reconfiguration = du.recv_dl_rrc().await?;
    assert_eq!(reconfiguration.srb_id, SrbId(1));

    cu_up.graceful_shutdown().await;
    cu_cp.graceful_shutdown().await;
    amf.shutdown().await;
    Ok(())
}
