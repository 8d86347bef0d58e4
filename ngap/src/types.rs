//! NGAP IE shapes that aren't shared with F1AP/E1AP (§4.F).

use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};
use xxap::{PlmnIdentity, Tac};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRanNodeId {
    pub plmn_identity: PlmnIdentity,
    pub gnb_id: u32,
}

impl Encode for GlobalRanNodeId {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_plmn_identity(w, self.plmn_identity);
        w.write_constrained_int(self.gnb_id as i64, 0, (1i64 << crate::wire::GNB_ID_BITS) - 1)
    }
}

impl Decode for GlobalRanNodeId {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let plmn_identity = crate::wire::read_plmn_identity(r)?;
        let gnb_id = r.read_constrained_int(0, (1i64 << crate::wire::GNB_ID_BITS) - 1)? as u32;
        Ok(GlobalRanNodeId { plmn_identity, gnb_id })
    }
}

/// One entry of the supported-TA list advertised in NG Setup: a TAC plus
/// the PLMNs broadcast under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTaItem {
    pub tac: Tac,
    pub broadcast_plmns: Vec<PlmnIdentity>,
}

impl Encode for SupportedTaItem {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_bytes(&self.tac.0);
        w.write_constrained_int(self.broadcast_plmns.len() as i64, 1, 12)?;
        for plmn in &self.broadcast_plmns {
            crate::wire::write_plmn_identity(w, *plmn);
        }
        Ok(())
    }
}

impl Decode for SupportedTaItem {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let tac_bytes = r.read_bytes(3)?;
        let mut tac = [0u8; 3];
        tac.copy_from_slice(&tac_bytes);
        let n = r.read_constrained_int(1, 12)?;
        let mut broadcast_plmns = Vec::with_capacity(n as usize);
        for _ in 0..n {
            broadcast_plmns.push(crate::wire::read_plmn_identity(r)?);
        }
        Ok(SupportedTaItem { tac: Tac(tac), broadcast_plmns })
    }
}
