//! Initial UL RRC Message Transfer (§4.G): the DU hands the CU the first
//! UL-CCCH RRC message (RRC Setup Request) it received from a UE on SRB0.

use crate::wire::{read_nr_cgi, write_nr_cgi};
use crate::DuToCuRrcContainer;
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use ue_id::{CRnti, GnbDuUeF1apId};
use xxap::{NrCgi, RrcContainer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialUlRrcMessageTransfer {
    pub gnb_du_ue_f1ap_id: GnbDuUeF1apId,
    pub nr_cgi: NrCgi,
    pub c_rnti: CRnti,
    pub rrc_container: RrcContainer,
    pub du_to_cu_rrc_container: Option<DuToCuRrcContainer>,
}

impl SerDes for InitialUlRrcMessageTransfer {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_gnb_du_ue_f1ap_id(w, self.gnb_du_ue_f1ap_id)?;
        write_nr_cgi(w, self.nr_cgi)?;
        crate::wire::write_crnti(w, self.c_rnti)?;
        w.write_octet_string(&self.rrc_container.0);
        w.write_bool(self.du_to_cu_rrc_container.is_some());
        if let Some(c) = &self.du_to_cu_rrc_container {
            w.write_octet_string(&c.0);
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_du_ue_f1ap_id = crate::wire::read_gnb_du_ue_f1ap_id(r)?;
        let nr_cgi = read_nr_cgi(r)?;
        let c_rnti = crate::wire::read_crnti(r)?;
        let rrc_container = RrcContainer(r.read_octet_string()?);
        let du_to_cu_rrc_container =
            if r.read_bool()? { Some(DuToCuRrcContainer(r.read_octet_string()?)) } else { None };
        Ok(InitialUlRrcMessageTransfer {
            gnb_du_ue_f1ap_id,
            nr_cgi,
            c_rnti,
            rrc_container,
            du_to_cu_rrc_container,
        })
    }
}

pub struct InitialUlRrcMessageTransferIndication;

impl net::Indication for InitialUlRrcMessageTransferIndication {
    type Request = InitialUlRrcMessageTransfer;

    const NAME: &'static str = "InitialULRRCMessageTransfer";
    const CODE: u16 = 10;
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::{NrCellIdentity, PlmnIdentity};

    #[test]
    fn round_trips_without_du_to_cu_container() {
        let msg = InitialUlRrcMessageTransfer {
            gnb_du_ue_f1ap_id: GnbDuUeF1apId(7),
            nr_cgi: NrCgi {
                plmn_identity: PlmnIdentity([0x00, 0xf1, 0x10]),
                nr_cell_identity: NrCellIdentity::new(42),
            },
            c_rnti: CRnti(0x4601),
            rrc_container: RrcContainer(vec![1, 2, 3]),
            du_to_cu_rrc_container: None,
        };
        let mut w = BitWriter::new();
        msg.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(InitialUlRrcMessageTransfer::decode(&mut r).unwrap(), msg);
    }
}
