//! UL/DL NAS Transport (§4.F). UL requires an AMF-UE-NGAP-ID already
//! learned by this NG UE - enforced by the caller via `<NotReady>`, since
//! that check needs the NG UE registry this crate does not own. DL NAS
//! Transport handling (learn-once/verify AMF-UE-NGAP-ID) is likewise caller
//! logic; this only defines the wire shape.

use crate::wire::{
    read_amf_ue_ngap_id, read_opt_amf_ue_ngap_id, read_ran_ue_ngap_id, write_amf_ue_ngap_id,
    write_opt_amf_ue_ngap_id, write_ran_ue_ngap_id,
};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use ue_id::{AmfUeNgapId, RanUeNgapId};
use xxap::NasPdu;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlNasTransport {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub amf_ue_ngap_id: AmfUeNgapId,
    pub nas_pdu: NasPdu,
}

impl SerDes for UlNasTransport {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        write_amf_ue_ngap_id(w, self.amf_ue_ngap_id)?;
        w.write_octet_string(&self.nas_pdu.0);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = read_ran_ue_ngap_id(r)?;
        let amf_ue_ngap_id = read_amf_ue_ngap_id(r)?;
        let nas_pdu = NasPdu(r.read_octet_string()?);
        Ok(UlNasTransport { ran_ue_ngap_id, amf_ue_ngap_id, nas_pdu })
    }
}

pub struct UlNasTransportIndication;

impl net::Indication for UlNasTransportIndication {
    type Request = UlNasTransport;

    const NAME: &'static str = "ULNASTransport";
    const CODE: u16 = 11;
}

/// `amf_ue_ngap_id` is `Option` only on the wire because an NG UE without
/// one yet cannot legally be the target of a DL NAS Transport in a real
/// network; this crate still decodes the field optionally so the one-shot
/// learn-or-verify rule can be enforced by the caller rather than rejected
/// at the codec boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlNasTransport {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub amf_ue_ngap_id: Option<AmfUeNgapId>,
    pub nas_pdu: NasPdu,
}

impl SerDes for DlNasTransport {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        write_opt_amf_ue_ngap_id(w, self.amf_ue_ngap_id)?;
        w.write_octet_string(&self.nas_pdu.0);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = read_ran_ue_ngap_id(r)?;
        let amf_ue_ngap_id = read_opt_amf_ue_ngap_id(r)?;
        let nas_pdu = NasPdu(r.read_octet_string()?);
        Ok(DlNasTransport { ran_ue_ngap_id, amf_ue_ngap_id, nas_pdu })
    }
}

pub struct DlNasTransportIndication;

impl net::Indication for DlNasTransportIndication {
    type Request = DlNasTransport;

    const NAME: &'static str = "DLNASTransport";
    const CODE: u16 = 12;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ul_round_trips() {
        let msg = UlNasTransport {
            ran_ue_ngap_id: RanUeNgapId(1),
            amf_ue_ngap_id: AmfUeNgapId(2),
            nas_pdu: NasPdu(vec![1, 2, 3]),
        };
        let mut w = BitWriter::new();
        msg.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(UlNasTransport::decode(&mut r).unwrap(), msg);
    }

    #[test]
    fn dl_round_trips_without_amf_ue_ngap_id() {
        let msg = DlNasTransport { ran_ue_ngap_id: RanUeNgapId(1), amf_ue_ngap_id: None, nas_pdu: NasPdu(vec![9]) };
        let mut w = BitWriter::new();
        msg.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(DlNasTransport::decode(&mut r).unwrap(), msg);
    }
}
