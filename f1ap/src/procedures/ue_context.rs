//! UE Context Setup, UE Context Modification and UE Context Release (§4.G):
//! the CU drives SRB/DRB bearer establishment at the DU and later tears the
//! UE context down. Setup and Modification share an IE shape - the CU sends
//! the same SRB/DRB-to-setup lists either way - so they're built from one
//! pair of message bodies with distinct `Procedure` marker types.

use crate::DuToCuRrcInformation;
use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};
use net::SerDes;
use ue_id::{GnbCuUeF1apId, GnbDuUeF1apId};
use xxap::{Cause, DrbId, SrbId, UpTransportLayerInformation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrbToSetupItem {
    pub drb_id: DrbId,
    pub ul_up_tnl_information: UpTransportLayerInformation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrbSetupItem {
    pub drb_id: DrbId,
    pub dl_up_tnl_information: UpTransportLayerInformation,
}

fn write_gtp_tunnel(w: &mut BitWriter, t: &UpTransportLayerInformation) -> Result<(), EncodeError> {
    let UpTransportLayerInformation::GtpTunnel(tunnel) = t;
    w.write_octet_string(&tunnel.transport_layer_address.0);
    w.write_bytes(&tunnel.gtp_teid.0);
    Ok(())
}

fn read_gtp_tunnel(r: &mut BitReader) -> Result<UpTransportLayerInformation, DecodeError> {
    let transport_layer_address = xxap::TransportLayerAddress(r.read_octet_string()?);
    let teid_bytes = r.read_bytes(4)?;
    let mut gtp_teid = [0u8; 4];
    gtp_teid.copy_from_slice(&teid_bytes);
    Ok(UpTransportLayerInformation::GtpTunnel(xxap::GtpTunnel {
        transport_layer_address,
        gtp_teid: xxap::GtpTeid(gtp_teid),
    }))
}

impl DrbToSetupItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.drb_id.0 as i64, 1, 32)?;
        write_gtp_tunnel(w, &self.ul_up_tnl_information)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let drb_id = DrbId(r.read_constrained_int(1, 32)? as u8);
        let ul_up_tnl_information = read_gtp_tunnel(r)?;
        Ok(DrbToSetupItem { drb_id, ul_up_tnl_information })
    }
}

impl DrbSetupItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.drb_id.0 as i64, 1, 32)?;
        write_gtp_tunnel(w, &self.dl_up_tnl_information)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let drb_id = DrbId(r.read_constrained_int(1, 32)? as u8);
        let dl_up_tnl_information = read_gtp_tunnel(r)?;
        Ok(DrbSetupItem { drb_id, dl_up_tnl_information })
    }
}

fn write_srb_ids(w: &mut BitWriter, srbs: &[SrbId]) -> Result<(), EncodeError> {
    w.write_constrained_int(srbs.len() as i64, 0, 3)?;
    for srb in srbs {
        w.write_constrained_int(srb.0 as i64, 0, 3)?;
    }
    Ok(())
}

fn read_srb_ids(r: &mut BitReader) -> Result<Vec<SrbId>, DecodeError> {
    let n = r.read_constrained_int(0, 3)?;
    (0..n).map(|_| Ok(SrbId(r.read_constrained_int(0, 3)? as u8))).collect()
}

fn write_drbs_to_setup(w: &mut BitWriter, drbs: &[DrbToSetupItem]) -> Result<(), EncodeError> {
    w.write_constrained_int(drbs.len() as i64, 0, 32)?;
    for drb in drbs {
        drb.encode(w)?;
    }
    Ok(())
}

fn read_drbs_to_setup(r: &mut BitReader) -> Result<Vec<DrbToSetupItem>, DecodeError> {
    let n = r.read_constrained_int(0, 32)?;
    (0..n).map(|_| DrbToSetupItem::decode(r)).collect()
}

fn write_drbs_setup(w: &mut BitWriter, drbs: &[DrbSetupItem]) -> Result<(), EncodeError> {
    w.write_constrained_int(drbs.len() as i64, 0, 32)?;
    for drb in drbs {
        drb.encode(w)?;
    }
    Ok(())
}

fn read_drbs_setup(r: &mut BitReader) -> Result<Vec<DrbSetupItem>, DecodeError> {
    let n = r.read_constrained_int(0, 32)?;
    (0..n).map(|_| DrbSetupItem::decode(r)).collect()
}

macro_rules! ue_context_request {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
            pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
            pub srbs_to_setup: Vec<SrbId>,
            pub drbs_to_setup: Vec<DrbToSetupItem>,
        }

        impl SerDes for $name {
            fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
                crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
                crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
                write_srb_ids(w, &self.srbs_to_setup)?;
                write_drbs_to_setup(w, &self.drbs_to_setup)
            }

            fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
                let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
                let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
                let srbs_to_setup = read_srb_ids(r)?;
                let drbs_to_setup = read_drbs_to_setup(r)?;
                Ok($name { gnb_cu_ue_f1ap_id, gnb_du_ue_f1ap_id, srbs_to_setup, drbs_to_setup })
            }
        }
    };
}

macro_rules! ue_context_response {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
            pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
            pub du_to_cu_rrc_information: DuToCuRrcInformation,
            pub drbs_setup: Vec<DrbSetupItem>,
        }

        impl SerDes for $name {
            fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
                crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
                crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
                self.du_to_cu_rrc_information.encode(w)?;
                write_drbs_setup(w, &self.drbs_setup)
            }

            fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
                let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
                let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
                let du_to_cu_rrc_information = DuToCuRrcInformation::decode(r)?;
                let drbs_setup = read_drbs_setup(r)?;
                Ok($name { gnb_du_ue_f1ap_id, gnb_cu_ue_f1ap_id, du_to_cu_rrc_information, drbs_setup })
            }
        }
    };
}

ue_context_request!(UeContextSetupRequest);
ue_context_response!(UeContextSetupResponse);
ue_context_request!(UeContextModificationRequest);
ue_context_response!(UeContextModificationResponse);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeContextFailure {
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    pub gnb_du_ue_f1ap_id: Option<GnbDuUeF1apId>,
    pub cause: Cause,
}

impl SerDes for UeContextFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
        crate::wire::write_opt_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
        let gnb_du_ue_f1ap_id = crate::wire::read_opt_gnb_du_ue_f1ap_id(r)?;
        let cause = crate::wire::read_cause(r)?;
        Ok(UeContextFailure { gnb_cu_ue_f1ap_id, gnb_du_ue_f1ap_id, cause })
    }
}

pub struct UeContextSetup;

impl net::Procedure for UeContextSetup {
    type Request = UeContextSetupRequest;
    type Success = UeContextSetupResponse;
    type Failure = UeContextFailure;

    const NAME: &'static str = "UEContextSetupProcedure";
    const CODE: u16 = 20;
}

pub struct UeContextModification;

impl net::Procedure for UeContextModification {
    type Request = UeContextModificationRequest;
    type Success = UeContextModificationResponse;
    type Failure = UeContextFailure;

    const NAME: &'static str = "UEContextModificationProcedure";
    const CODE: u16 = 21;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeContextReleaseCommand {
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    pub cause: Cause,
}

impl SerDes for UeContextReleaseCommand {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
        crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
        let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
        let cause = crate::wire::read_cause(r)?;
        Ok(UeContextReleaseCommand { gnb_cu_ue_f1ap_id, gnb_du_ue_f1ap_id, cause })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeContextReleaseComplete {
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
}

impl SerDes for UeContextReleaseComplete {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
        crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
        let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
        Ok(UeContextReleaseComplete { gnb_cu_ue_f1ap_id, gnb_du_ue_f1ap_id })
    }
}

/// The DU has no substantive way to refuse a release, but `Procedure`
/// requires a `Failure` arm - this only fires on a malformed Command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeContextReleaseFailure {
    pub cause: Cause,
}

impl SerDes for UeContextReleaseFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(UeContextReleaseFailure { cause: crate::wire::read_cause(r)? })
    }
}

pub struct UeContextRelease;

impl net::Procedure for UeContextRelease {
    type Request = UeContextReleaseCommand;
    type Success = UeContextReleaseComplete;
    type Failure = UeContextReleaseFailure;

    const NAME: &'static str = "UEContextReleaseProcedure";
    const CODE: u16 = 22;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::CellGroupConfig;
    use xxap::{GtpTeid, GtpTunnel, TransportLayerAddress};

    fn tunnel(teid: u32) -> UpTransportLayerInformation {
        UpTransportLayerInformation::GtpTunnel(GtpTunnel {
            transport_layer_address: TransportLayerAddress(vec![192, 0, 2, 1]),
            gtp_teid: GtpTeid(teid.to_be_bytes()),
        })
    }

    #[test]
    fn setup_request_round_trips() {
        let req = UeContextSetupRequest {
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(1),
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(2),
            srbs_to_setup: vec![SrbId(1)],
            drbs_to_setup: vec![DrbToSetupItem { drb_id: DrbId(1), ul_up_tnl_information: tunnel(7) }],
        };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(UeContextSetupRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn setup_response_round_trips() {
        let resp = UeContextSetupResponse {
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(2),
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(1),
            du_to_cu_rrc_information: DuToCuRrcInformation { cell_group_config: CellGroupConfig(vec![1, 2]) },
            drbs_setup: vec![DrbSetupItem { drb_id: DrbId(1), dl_up_tnl_information: tunnel(9) }],
        };
        let mut w = BitWriter::new();
        resp.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(UeContextSetupResponse::decode(&mut r).unwrap(), resp);
    }

    #[test]
    fn release_command_round_trips() {
        let cmd = UeContextReleaseCommand {
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(1),
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(2),
            cause: Cause::RADIO_UNSPECIFIED,
        };
        let mut w = BitWriter::new();
        cmd.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(UeContextReleaseCommand::decode(&mut r).unwrap(), cmd);
    }
}
