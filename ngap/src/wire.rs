//! Shared NGAP IE encode/decode helpers, mirroring `f1ap::wire`'s role for
//! the F1 interface.

use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use ue_id::{AmfUeNgapId, RanUeNgapId};
use xxap::{Cause, CauseGroup, PlmnIdentity};

/// gNB-ID held at 22 bits, the common default (`common::config::CoreConfig`);
/// a real deployment-configurable bit length is out of scope for this
/// representative codec.
pub const GNB_ID_BITS: u32 = 22;

pub fn write_plmn_identity(w: &mut BitWriter, plmn: PlmnIdentity) {
    w.write_bytes(&plmn.0);
}

pub fn read_plmn_identity(r: &mut BitReader) -> Result<PlmnIdentity, DecodeError> {
    let bytes = r.read_bytes(3)?;
    let mut out = [0u8; 3];
    out.copy_from_slice(&bytes);
    Ok(PlmnIdentity(out))
}

pub fn write_ran_ue_ngap_id(w: &mut BitWriter, id: RanUeNgapId) -> Result<(), EncodeError> {
    w.write_constrained_int(id.0 as i64, 0, u32::MAX as i64)
}

pub fn read_ran_ue_ngap_id(r: &mut BitReader) -> Result<RanUeNgapId, DecodeError> {
    Ok(RanUeNgapId(r.read_constrained_int(0, u32::MAX as i64)? as u32))
}

pub fn write_amf_ue_ngap_id(w: &mut BitWriter, id: AmfUeNgapId) -> Result<(), EncodeError> {
    w.write_constrained_int(id.0 as i64, 0, (1i64 << 40) - 1)
}

pub fn read_amf_ue_ngap_id(r: &mut BitReader) -> Result<AmfUeNgapId, DecodeError> {
    Ok(AmfUeNgapId(r.read_constrained_int(0, (1i64 << 40) - 1)? as u64))
}

pub fn write_opt_amf_ue_ngap_id(w: &mut BitWriter, id: Option<AmfUeNgapId>) -> Result<(), EncodeError> {
    w.write_bool(id.is_some());
    if let Some(id) = id {
        write_amf_ue_ngap_id(w, id)?;
    }
    Ok(())
}

pub fn read_opt_amf_ue_ngap_id(r: &mut BitReader) -> Result<Option<AmfUeNgapId>, DecodeError> {
    if r.read_bool()? { Ok(Some(read_amf_ue_ngap_id(r)?)) } else { Ok(None) }
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

pub fn write_opt_bytes(w: &mut BitWriter, v: &Option<Vec<u8>>) {
    w.write_bool(v.is_some());
    if let Some(b) = v {
        w.write_octet_string(b);
    }
}

pub fn read_opt_bytes(r: &mut BitReader) -> Result<Option<Vec<u8>>, DecodeError> {
    if r.read_bool()? { Ok(Some(r.read_octet_string()?)) } else { Ok(None) }
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
