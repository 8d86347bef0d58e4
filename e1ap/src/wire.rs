//! Shared E1AP IE encode/decode helpers, mirroring `f1ap::wire`/`ngap::wire`.

use crate::ids::{GnbCuCpUeE1apId, GnbCuUpUeE1apId};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use xxap::{Cause, CauseGroup, GtpTeid, GtpTunnel, TransportLayerAddress, UpTransportLayerInformation};

pub fn write_cu_cp_ue_id(w: &mut BitWriter, id: GnbCuCpUeE1apId) -> Result<(), EncodeError> {
    w.write_constrained_int(id.0 as i64, 0, u32::MAX as i64)
}

pub fn read_cu_cp_ue_id(r: &mut BitReader) -> Result<GnbCuCpUeE1apId, DecodeError> {
    Ok(GnbCuCpUeE1apId(r.read_constrained_int(0, u32::MAX as i64)? as u32))
}

pub fn write_cu_up_ue_id(w: &mut BitWriter, id: GnbCuUpUeE1apId) -> Result<(), EncodeError> {
    w.write_constrained_int(id.0 as i64, 0, u32::MAX as i64)
}

pub fn read_cu_up_ue_id(r: &mut BitReader) -> Result<GnbCuUpUeE1apId, DecodeError> {
    Ok(GnbCuUpUeE1apId(r.read_constrained_int(0, u32::MAX as i64)? as u32))
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

pub fn write_gtp_tunnel(w: &mut BitWriter, t: &UpTransportLayerInformation) -> Result<(), EncodeError> {
    let UpTransportLayerInformation::GtpTunnel(tunnel) = t;
    w.write_octet_string(&tunnel.transport_layer_address.0);
    w.write_bytes(&tunnel.gtp_teid.0);
    Ok(())
}

pub fn read_gtp_tunnel(r: &mut BitReader) -> Result<UpTransportLayerInformation, DecodeError> {
    let transport_layer_address = TransportLayerAddress(r.read_octet_string()?);
    let teid_bytes = r.read_bytes(4)?;
    let mut gtp_teid = [0u8; 4];
    gtp_teid.copy_from_slice(&teid_bytes);
    Ok(UpTransportLayerInformation::GtpTunnel(GtpTunnel { transport_layer_address, gtp_teid: GtpTeid(gtp_teid) }))
}
