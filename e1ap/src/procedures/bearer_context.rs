//! Bearer Context Setup and Modification (§4.H): the CU-CP asks the CU-UP
//! to instantiate (or change) user-plane bearers for a UE's PDU sessions.
//! Setup and Modification carry the same request/response shape, so both
//! are built from one pair of message bodies with distinct `Procedure`
//! marker types, the same pattern `f1ap::procedures::ue_context` uses.

use crate::ids::{GnbCuCpUeE1apId, GnbCuUpUeE1apId};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use xxap::{Cause, DrbId, Snssai, UpTransportLayerInformation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionToSetupItem {
    pub pdu_session_id: u16,
    pub snssai: Snssai,
    pub drbs_to_setup: Vec<DrbId>,
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

impl PduSessionToSetupItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.pdu_session_id as i64, 0, 255)?;
        write_snssai(w, self.snssai)?;
        w.write_constrained_int(self.drbs_to_setup.len() as i64, 1, 32)?;
        for drb in &self.drbs_to_setup {
            w.write_constrained_int(drb.0 as i64, 1, 32)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let pdu_session_id = r.read_constrained_int(0, 255)? as u16;
        let snssai = read_snssai(r)?;
        let n = r.read_constrained_int(1, 32)?;
        let mut drbs_to_setup = Vec::with_capacity(n as usize);
        for _ in 0..n {
            drbs_to_setup.push(DrbId(r.read_constrained_int(1, 32)? as u8));
        }
        Ok(PduSessionToSetupItem { pdu_session_id, snssai, drbs_to_setup })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrbSetupItem {
    pub drb_id: DrbId,
    pub dl_up_tnl_information: UpTransportLayerInformation,
}

impl DrbSetupItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.drb_id.0 as i64, 1, 32)?;
        crate::wire::write_gtp_tunnel(w, &self.dl_up_tnl_information)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let drb_id = DrbId(r.read_constrained_int(1, 32)? as u8);
        let dl_up_tnl_information = crate::wire::read_gtp_tunnel(r)?;
        Ok(DrbSetupItem { drb_id, dl_up_tnl_information })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSessionSetupItem {
    pub pdu_session_id: u16,
    pub drbs_setup: Vec<DrbSetupItem>,
}

impl PduSessionSetupItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.pdu_session_id as i64, 0, 255)?;
        w.write_constrained_int(self.drbs_setup.len() as i64, 1, 32)?;
        for drb in &self.drbs_setup {
            drb.encode(w)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let pdu_session_id = r.read_constrained_int(0, 255)? as u16;
        let n = r.read_constrained_int(1, 32)?;
        let mut drbs_setup = Vec::with_capacity(n as usize);
        for _ in 0..n {
            drbs_setup.push(DrbSetupItem::decode(r)?);
        }
        Ok(PduSessionSetupItem { pdu_session_id, drbs_setup })
    }
}

macro_rules! bearer_context_request {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub gnb_cu_cp_ue_e1ap_id: GnbCuCpUeE1apId,
            pub gnb_cu_up_ue_e1ap_id: Option<GnbCuUpUeE1apId>,
            pub pdu_sessions_to_setup: Vec<PduSessionToSetupItem>,
        }

        impl SerDes for $name {
            fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
                crate::wire::write_cu_cp_ue_id(w, self.gnb_cu_cp_ue_e1ap_id)?;
                w.write_bool(self.gnb_cu_up_ue_e1ap_id.is_some());
                if let Some(id) = self.gnb_cu_up_ue_e1ap_id {
                    crate::wire::write_cu_up_ue_id(w, id)?;
                }
                w.write_constrained_int(self.pdu_sessions_to_setup.len() as i64, 1, 256)?;
                for session in &self.pdu_sessions_to_setup {
                    session.encode(w)?;
                }
                Ok(())
            }

            fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
                let gnb_cu_cp_ue_e1ap_id = crate::wire::read_cu_cp_ue_id(r)?;
                let gnb_cu_up_ue_e1ap_id =
                    if r.read_bool()? { Some(crate::wire::read_cu_up_ue_id(r)?) } else { None };
                let n = r.read_constrained_int(1, 256)?;
                let mut pdu_sessions_to_setup = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    pdu_sessions_to_setup.push(PduSessionToSetupItem::decode(r)?);
                }
                Ok($name { gnb_cu_cp_ue_e1ap_id, gnb_cu_up_ue_e1ap_id, pdu_sessions_to_setup })
            }
        }
    };
}

macro_rules! bearer_context_response {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub gnb_cu_cp_ue_e1ap_id: GnbCuCpUeE1apId,
            pub gnb_cu_up_ue_e1ap_id: GnbCuUpUeE1apId,
            pub pdu_sessions_setup: Vec<PduSessionSetupItem>,
        }

        impl SerDes for $name {
            fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
                crate::wire::write_cu_cp_ue_id(w, self.gnb_cu_cp_ue_e1ap_id)?;
                crate::wire::write_cu_up_ue_id(w, self.gnb_cu_up_ue_e1ap_id)?;
                w.write_constrained_int(self.pdu_sessions_setup.len() as i64, 1, 256)?;
                for session in &self.pdu_sessions_setup {
                    session.encode(w)?;
                }
                Ok(())
            }

            fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
                let gnb_cu_cp_ue_e1ap_id = crate::wire::read_cu_cp_ue_id(r)?;
                let gnb_cu_up_ue_e1ap_id = crate::wire::read_cu_up_ue_id(r)?;
                let n = r.read_constrained_int(1, 256)?;
                let mut pdu_sessions_setup = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    pdu_sessions_setup.push(PduSessionSetupItem::decode(r)?);
                }
                Ok($name { gnb_cu_cp_ue_e1ap_id, gnb_cu_up_ue_e1ap_id, pdu_sessions_setup })
            }
        }
    };
}

bearer_context_request!(BearerContextSetupRequest);
bearer_context_response!(BearerContextSetupResponse);
bearer_context_request!(BearerContextModificationRequest);
bearer_context_response!(BearerContextModificationResponse);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerContextFailure {
    pub gnb_cu_cp_ue_e1ap_id: GnbCuCpUeE1apId,
    pub cause: Cause,
}

impl SerDes for BearerContextFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_cu_cp_ue_id(w, self.gnb_cu_cp_ue_e1ap_id)?;
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_cu_cp_ue_e1ap_id = crate::wire::read_cu_cp_ue_id(r)?;
        let cause = crate::wire::read_cause(r)?;
        Ok(BearerContextFailure { gnb_cu_cp_ue_e1ap_id, cause })
    }
}

pub struct BearerContextSetup;

impl net::Procedure for BearerContextSetup {
    type Request = BearerContextSetupRequest;
    type Success = BearerContextSetupResponse;
    type Failure = BearerContextFailure;

    const NAME: &'static str = "BearerContextSetupProcedure";
    const CODE: u16 = 10;
}

pub struct BearerContextModification;

impl net::Procedure for BearerContextModification {
    type Request = BearerContextModificationRequest;
    type Success = BearerContextModificationResponse;
    type Failure = BearerContextFailure;

    const NAME: &'static str = "BearerContextModificationProcedure";
    const CODE: u16 = 11;
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::{GtpTeid, GtpTunnel, TransportLayerAddress};

    #[test]
    fn setup_request_round_trips() {
        let req = BearerContextSetupRequest {
            gnb_cu_cp_ue_e1ap_id: GnbCuCpUeE1apId(1),
            gnb_cu_up_ue_e1ap_id: None,
            pdu_sessions_to_setup: vec![PduSessionToSetupItem {
                pdu_session_id: 5,
                snssai: Snssai { sst: 1, sd: None },
                drbs_to_setup: vec![DrbId(1)],
            }],
        };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(BearerContextSetupRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn setup_response_round_trips() {
        let resp = BearerContextSetupResponse {
            gnb_cu_cp_ue_e1ap_id: GnbCuCpUeE1apId(1),
            gnb_cu_up_ue_e1ap_id: GnbCuUpUeE1apId(2),
            pdu_sessions_setup: vec![PduSessionSetupItem {
                pdu_session_id: 5,
                drbs_setup: vec![DrbSetupItem {
                    drb_id: DrbId(1),
                    dl_up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
                        transport_layer_address: TransportLayerAddress(vec![192, 0, 2, 1]),
                        gtp_teid: GtpTeid([0, 0, 0, 7]),
                    }),
                }],
            }],
        };
        let mut w = BitWriter::new();
        resp.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(BearerContextSetupResponse::decode(&mut r).unwrap(), resp);
    }
}
