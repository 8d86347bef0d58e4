//! Initial UE Message (§4.F): the first uplink NGAP message for a new NG
//! UE, carrying the NAS PDU that triggered RRC connection establishment.

use crate::wire::{read_plmn_identity, read_ran_ue_ngap_id, write_plmn_identity, write_ran_ue_ngap_id};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use rrc::EstablishmentCause;
use ue_id::RanUeNgapId;
use xxap::{NasPdu, NrCellIdentity, NrCgi, PlmnIdentity, Tac};

fn write_establishment_cause(w: &mut BitWriter, cause: EstablishmentCause) -> Result<(), EncodeError> {
    let code = match cause {
        EstablishmentCause::Emergency => 0,
        EstablishmentCause::MoSignalling => 1,
        EstablishmentCause::MoData => 2,
        EstablishmentCause::MoVoiceCall => 3,
        EstablishmentCause::MtAccess => 4,
    };
    w.write_constrained_int(code, 0, 4)
}

fn read_establishment_cause(r: &mut BitReader) -> Result<EstablishmentCause, DecodeError> {
    match r.read_constrained_int(0, 4)? {
        0 => Ok(EstablishmentCause::Emergency),
        1 => Ok(EstablishmentCause::MoSignalling),
        2 => Ok(EstablishmentCause::MoData),
        3 => Ok(EstablishmentCause::MoVoiceCall),
        4 => Ok(EstablishmentCause::MtAccess),
        other => Err(DecodeError::InvalidDiscriminant(other as u64, "EstablishmentCause")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialUeMessage {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub nas_pdu: NasPdu,
    pub establishment_cause: EstablishmentCause,
    pub nr_cgi: NrCgi,
    pub tac: Tac,
}

impl SerDes for InitialUeMessage {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        w.write_octet_string(&self.nas_pdu.0);
        write_establishment_cause(w, self.establishment_cause)?;
        write_plmn_identity(w, self.nr_cgi.plmn_identity);
        w.write_bits(self.nr_cgi.nr_cell_identity.0, NrCellIdentity::BIT_LEN);
        w.write_bytes(&self.tac.0);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = read_ran_ue_ngap_id(r)?;
        let nas_pdu = NasPdu(r.read_octet_string()?);
        let establishment_cause = read_establishment_cause(r)?;
        let plmn_identity = read_plmn_identity(r)?;
        let cell = r.read_bits(NrCellIdentity::BIT_LEN)?;
        let nr_cgi = NrCgi { plmn_identity, nr_cell_identity: NrCellIdentity::new(cell) };
        let tac_bytes = r.read_bytes(3)?;
        let mut tac = [0u8; 3];
        tac.copy_from_slice(&tac_bytes);
        Ok(InitialUeMessage { ran_ue_ngap_id, nas_pdu, establishment_cause, nr_cgi, tac: Tac(tac) })
    }
}

pub struct InitialUeMessageIndication;

impl net::Indication for InitialUeMessageIndication {
    type Request = InitialUeMessage;

    const NAME: &'static str = "InitialUEMessage";
    const CODE: u16 = 10;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips() {
        let msg = InitialUeMessage {
            ran_ue_ngap_id: RanUeNgapId(1),
            nas_pdu: NasPdu(vec![1, 2, 3]),
            establishment_cause: EstablishmentCause::MoSignalling,
            nr_cgi: NrCgi { plmn_identity: PlmnIdentity([0x00, 0xf1, 0x10]), nr_cell_identity: NrCellIdentity::new(1) },
            tac: Tac([0, 0, 1]),
        };
        let mut w = BitWriter::new();
        msg.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(InitialUeMessage::decode(&mut r).unwrap(), msg);
    }
}
