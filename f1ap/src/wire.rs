//! Shared IE encode/decode helpers so every F1AP procedure doesn't repeat
//! the same `Option`/identifier/cause plumbing (§4.A bit-cursor boundary).

use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use ue_id::{CRnti, GnbCuUeF1apId, GnbDuUeF1apId};
use xxap::{Cause, CauseGroup, NrCellIdentity, NrCgi, PlmnIdentity, TransactionId};

pub fn write_transaction_id(w: &mut BitWriter, t: TransactionId) -> Result<(), EncodeError> {
    w.write_constrained_int(t.0 as i64, 0, 255)
}

pub fn read_transaction_id(r: &mut BitReader) -> Result<TransactionId, DecodeError> {
    Ok(TransactionId(r.read_constrained_int(0, 255)? as u8))
}

pub fn write_gnb_du_ue_f1ap_id(w: &mut BitWriter, id: GnbDuUeF1apId) -> Result<(), EncodeError> {
    w.write_constrained_int(id.0 as i64, 0, u32::MAX as i64)
}

pub fn read_gnb_du_ue_f1ap_id(r: &mut BitReader) -> Result<GnbDuUeF1apId, DecodeError> {
    Ok(GnbDuUeF1apId(r.read_constrained_int(0, u32::MAX as i64)? as u32))
}

pub fn write_gnb_cu_ue_f1ap_id(w: &mut BitWriter, id: GnbCuUeF1apId) -> Result<(), EncodeError> {
    w.write_constrained_int(id.0 as i64, 0, u32::MAX as i64)
}

pub fn read_gnb_cu_ue_f1ap_id(r: &mut BitReader) -> Result<GnbCuUeF1apId, DecodeError> {
    Ok(GnbCuUeF1apId(r.read_constrained_int(0, u32::MAX as i64)? as u32))
}

pub fn write_opt_gnb_cu_ue_f1ap_id(w: &mut BitWriter, id: Option<GnbCuUeF1apId>) -> Result<(), EncodeError> {
    w.write_bool(id.is_some());
    if let Some(id) = id {
        write_gnb_cu_ue_f1ap_id(w, id)?;
    }
    Ok(())
}

pub fn read_opt_gnb_cu_ue_f1ap_id(r: &mut BitReader) -> Result<Option<GnbCuUeF1apId>, DecodeError> {
    if r.read_bool()? { Ok(Some(read_gnb_cu_ue_f1ap_id(r)?)) } else { Ok(None) }
}

pub fn write_opt_gnb_du_ue_f1ap_id(w: &mut BitWriter, id: Option<GnbDuUeF1apId>) -> Result<(), EncodeError> {
    w.write_bool(id.is_some());
    if let Some(id) = id {
        write_gnb_du_ue_f1ap_id(w, id)?;
    }
    Ok(())
}

pub fn read_opt_gnb_du_ue_f1ap_id(r: &mut BitReader) -> Result<Option<GnbDuUeF1apId>, DecodeError> {
    if r.read_bool()? { Ok(Some(read_gnb_du_ue_f1ap_id(r)?)) } else { Ok(None) }
}

pub fn write_crnti(w: &mut BitWriter, c: CRnti) -> Result<(), EncodeError> {
    w.write_constrained_int(c.0 as i64, 0, 0xFFFF)
}

pub fn read_crnti(r: &mut BitReader) -> Result<CRnti, DecodeError> {
    Ok(CRnti(r.read_constrained_int(0, 0xFFFF)? as u16))
}

pub fn write_nr_cgi(w: &mut BitWriter, cgi: NrCgi) -> Result<(), EncodeError> {
    w.write_bytes(&cgi.plmn_identity.0);
    w.write_bits(cgi.nr_cell_identity.0, NrCellIdentity::BIT_LEN);
    Ok(())
}

pub fn read_nr_cgi(r: &mut BitReader) -> Result<NrCgi, DecodeError> {
    let plmn = r.read_bytes(3)?;
    let mut plmn_identity = [0u8; 3];
    plmn_identity.copy_from_slice(&plmn);
    let cell = r.read_bits(NrCellIdentity::BIT_LEN)?;
    Ok(NrCgi { plmn_identity: PlmnIdentity(plmn_identity), nr_cell_identity: NrCellIdentity::new(cell) })
}

pub fn write_opt_bytes(w: &mut BitWriter, v: &Option<Vec<u8>>) {
    w.write_bool(v.is_some());
    if let Some(b) = v {
        w.write_octet_string(b);
    }
}

pub fn read_opt_bytes(r: &mut BitReader) -> Result<Option<Vec<u8>>, DecodeError> {
    if r.read_bool()? { Ok(Some(r.read_octet_string()?)) } else { Ok(None) }
}

pub fn write_opt_string(w: &mut BitWriter, v: &Option<String>) {
    w.write_bool(v.is_some());
    if let Some(s) = v {
        w.write_octet_string(s.as_bytes());
    }
}

pub fn read_opt_string(r: &mut BitReader) -> Result<Option<String>, DecodeError> {
    if r.read_bool()? {
        let bytes = r.read_octet_string()?;
        String::from_utf8(bytes).map(Some).map_err(|_| DecodeError::InvalidDiscriminant(0, "Utf8String"))
    } else {
        Ok(None)
    }
}

pub fn write_cause(w: &mut BitWriter, cause: Cause) -> Result<(), EncodeError> {
    let group = match cause.group {
        CauseGroup::RadioNetwork => 0,
        CauseGroup::Transport => 1,
        CauseGroup::Protocol => 2,
        CauseGroup::Misc => 3,
    };
    w.write_constrained_int(group, 0, 3)?;
    w.write_constrained_int(cause.value as i64, 0, 255)
}

pub fn read_cause(r: &mut BitReader) -> Result<Cause, DecodeError> {
    let group = match r.read_constrained_int(0, 3)? {
        0 => CauseGroup::RadioNetwork,
        1 => CauseGroup::Transport,
        2 => CauseGroup::Protocol,
        _ => CauseGroup::Misc,
    };
    let value = r.read_constrained_int(0, 255)? as u8;
    Ok(Cause { group, value })
}
