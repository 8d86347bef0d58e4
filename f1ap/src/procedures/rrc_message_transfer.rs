//! UL/DL RRC Message Transfer (§4.G): carries RRC PDUs on any SRB other than
//! the bootstrap SRB0, once a UE has F1AP ids on both sides.

use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use ue_id::{GnbCuUeF1apId, GnbDuUeF1apId};
use xxap::{RrcContainer, SrbId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlRrcMessageTransfer {
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    pub srb_id: SrbId,
    pub rrc_container: RrcContainer,
}

impl SerDes for UlRrcMessageTransfer {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
        crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
        w.write_constrained_int(self.srb_id.0 as i64, 0, 3)?;
        w.write_octet_string(&self.rrc_container.0);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
        let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
        let srb_id = SrbId(r.read_constrained_int(0, 3)? as u8);
        let rrc_container = RrcContainer(r.read_octet_string()?);
        Ok(UlRrcMessageTransfer { gnb_du_ue_f1ap_id, gnb_cu_ue_f1ap_id, srb_id, rrc_container })
    }
}

pub struct UlRrcMessageTransferIndication;

impl net::Indication for UlRrcMessageTransferIndication {
    type Request = UlRrcMessageTransfer;

    const NAME: &'static str = "ULRRCMessageTransfer";
    const CODE: u16 = 11;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlRrcMessageTransfer {
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    pub gnb_cu_ue_f1ap_id: GnbCuUeF1apId,
    pub srb_id: SrbId,
    pub rrc_container: RrcContainer,
}

impl SerDes for DlRrcMessageTransfer {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
        crate::wire::write_gnb_cu_ue_f1ap_id(w, self.gnb_cu_ue_f1ap_id)?;
        w.write_constrained_int(self.srb_id.0 as i64, 0, 3)?;
        w.write_octet_string(&self.rrc_container.0);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
        let gnb_cu_ue_f1ap_id = crate::wire::read_gnb_cu_ue_f1ap_id(r)?;
        let srb_id = SrbId(r.read_constrained_int(0, 3)? as u8);
        let rrc_container = RrcContainer(r.read_octet_string()?);
        Ok(DlRrcMessageTransfer { gnb_du_ue_f1ap_id, gnb_cu_ue_f1ap_id, srb_id, rrc_container })
    }
}

pub struct DlRrcMessageTransferIndication;

impl net::Indication for DlRrcMessageTransferIndication {
    type Request = DlRrcMessageTransfer;

    const NAME: &'static str = "DLRRCMessageTransfer";
    const CODE: u16 = 12;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ul_message_round_trips() {
        let msg = UlRrcMessageTransfer {
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(1),
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(2),
            srb_id: SrbId(1),
            rrc_container: RrcContainer(vec![9, 9, 9]),
        };
        let mut w = BitWriter::new();
        msg.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(UlRrcMessageTransfer::decode(&mut r).unwrap(), msg);
    }

    #[test]
    fn dl_message_round_trips() {
        let msg = DlRrcMessageTransfer {
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(1),
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId(2),
            srb_id: SrbId(2),
            rrc_container: RrcContainer(vec![1]),
        };
        let mut w = BitWriter::new();
        msg.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(DlRrcMessageTransfer::decode(&mut r).unwrap(), msg);
    }
}
