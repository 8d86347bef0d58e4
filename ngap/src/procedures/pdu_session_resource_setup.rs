//! PDU Session Resource Setup (§4.F): fans out to the DU processor per
//! session and accumulates succeeded/failed items in the response.

use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use ue_id::RanUeNgapId;
use xxap::{Cause, QosFlowSetupRequestItem, Snssai};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionResourceSetupItem {
    pub pdu_session_id: u16,
    pub snssai: Snssai,
    pub qos_flows: Vec<QosFlowSetupRequestItem>,
}

fn write_snssai(w: &mut BitWriter, s: Snssai) -> Result<(), EncodeError> {
    w.write_constrained_int(s.sst as i64, 0, 255)?;
    w.write_bool(s.sd.is_some());
    if let Some(sd) = s.sd {
        w.write_bytes(&sd);
    }
    Ok(())
}

fn read_snssai(r: &mut BitReader) -> Result<Snssai, DecodeError> {
    let sst = r.read_constrained_int(0, 255)? as u8;
    let sd = if r.read_bool()? {
        let bytes = r.read_bytes(3)?;
        let mut sd = [0u8; 3];
        sd.copy_from_slice(&bytes);
        Some(sd)
    } else {
        None
    };
    Ok(Snssai { sst, sd })
}

fn write_five_qi_flow(w: &mut BitWriter, flow: &QosFlowSetupRequestItem) -> Result<(), EncodeError> {
    w.write_constrained_int(flow.qos_flow_identifier.0 as i64, 0, 63)?;
    let five_qi = flow.qos_flow_level_qos_parameters.qos_characteristics.five_qi().unwrap_or(9);
    w.write_constrained_int(five_qi as i64, 0, 255)
}

fn read_five_qi_flow(r: &mut BitReader) -> Result<QosFlowSetupRequestItem, DecodeError> {
    let qos_flow_identifier = xxap::ids::QosFlowIdentifier(r.read_constrained_int(0, 63)? as u8);
    let five_qi = r.read_constrained_int(0, 255)? as u16;
    Ok(QosFlowSetupRequestItem {
        qos_flow_identifier,
        qos_flow_level_qos_parameters: xxap::QosFlowLevelQosParameters {
            qos_characteristics: xxap::QosCharacteristics::NonDynamic { five_qi },
        },
    })
}

impl PduSessionResourceSetupItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.pdu_session_id as i64, 0, 255)?;
        write_snssai(w, self.snssai)?;
        w.write_constrained_int(self.qos_flows.len() as i64, 1, 64)?;
        for flow in &self.qos_flows {
            write_five_qi_flow(w, flow)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let pdu_session_id = r.read_constrained_int(0, 255)? as u16;
        let snssai = read_snssai(r)?;
        let n = r.read_constrained_int(1, 64)?;
        let mut qos_flows = Vec::with_capacity(n as usize);
        for _ in 0..n {
            qos_flows.push(read_five_qi_flow(r)?);
        }
        Ok(PduSessionResourceSetupItem { pdu_session_id, snssai, qos_flows })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionResourceSetupRequest {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub pdu_session_resources: Vec<PduSessionResourceSetupItem>,
}

impl SerDes for PduSessionResourceSetupRequest {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        w.write_constrained_int(self.pdu_session_resources.len() as i64, 1, 256)?;
        for item in &self.pdu_session_resources {
            item.encode(w)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = crate::wire::read_ran_ue_ngap_id(r)?;
        let n = r.read_constrained_int(1, 256)?;
        let mut pdu_session_resources = Vec::with_capacity(n as usize);
        for _ in 0..n {
            pdu_session_resources.push(PduSessionResourceSetupItem::decode(r)?);
        }
        Ok(PduSessionResourceSetupRequest { ran_ue_ngap_id, pdu_session_resources })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionResourceSetupResponse {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub succeeded: Vec<u16>,
    pub failed: Vec<(u16, Cause)>,
}

impl SerDes for PduSessionResourceSetupResponse {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        w.write_constrained_int(self.succeeded.len() as i64, 0, 256)?;
        for id in &self.succeeded {
            w.write_constrained_int(*id as i64, 0, 255)?;
        }
        w.write_constrained_int(self.failed.len() as i64, 0, 256)?;
        for (id, cause) in &self.failed {
            w.write_constrained_int(*id as i64, 0, 255)?;
            crate::wire::write_cause(w, *cause)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = crate::wire::read_ran_ue_ngap_id(r)?;
        let n_ok = r.read_constrained_int(0, 256)?;
        let mut succeeded = Vec::with_capacity(n_ok as usize);
        for _ in 0..n_ok {
            succeeded.push(r.read_constrained_int(0, 255)? as u16);
        }
        let n_fail = r.read_constrained_int(0, 256)?;
        let mut failed = Vec::with_capacity(n_fail as usize);
        for _ in 0..n_fail {
            let id = r.read_constrained_int(0, 255)? as u16;
            let cause = crate::wire::read_cause(r)?;
            failed.push((id, cause));
        }
        Ok(PduSessionResourceSetupResponse { ran_ue_ngap_id, succeeded, failed })
    }
}

/// PDU Session Resource Setup has no unsuccessful-outcome PDU in TS 38.413
/// (a full failure still answers with `Response`, everything in `failed`);
/// `Procedure` requires a `Failure` type so this only covers malformed
/// requests this crate's codec itself rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduSessionResourceSetupFailure {
    pub cause: Cause,
}

impl SerDes for PduSessionResourceSetupFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(PduSessionResourceSetupFailure { cause: crate::wire::read_cause(r)? })
    }
}

pub struct PduSessionResourceSetup;

impl net::Procedure for PduSessionResourceSetup {
    type Request = PduSessionResourceSetupRequest;
    type Success = PduSessionResourceSetupResponse;
    type Failure = PduSessionResourceSetupFailure;

    const NAME: &'static str = "PDUSessionResourceSetupProcedure";
    const CODE: u16 = 21;
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::ids::QosFlowIdentifier;
    use xxap::{QosCharacteristics, QosFlowLevelQosParameters};

    #[test]
    fn request_round_trips() {
        let req = PduSessionResourceSetupRequest {
            ran_ue_ngap_id: RanUeNgapId(1),
            pdu_session_resources: vec![PduSessionResourceSetupItem {
                pdu_session_id: 5,
                snssai: Snssai { sst: 1, sd: None },
                qos_flows: vec![QosFlowSetupRequestItem {
                    qos_flow_identifier: QosFlowIdentifier(0),
                    qos_flow_level_qos_parameters: QosFlowLevelQosParameters {
                        qos_characteristics: QosCharacteristics::NonDynamic { five_qi: 9 },
                    },
                }],
            }],
        };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(PduSessionResourceSetupRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn response_round_trips_with_mixed_outcomes() {
        let resp = PduSessionResourceSetupResponse {
            ran_ue_ngap_id: RanUeNgapId(1),
            succeeded: vec![5],
            failed: vec![(6, Cause::RADIO_UNSPECIFIED)],
        };
        let mut w = BitWriter::new();
        resp.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(PduSessionResourceSetupResponse::decode(&mut r).unwrap(), resp);
    }
}
