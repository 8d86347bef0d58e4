//! `CellGroupConfig`, carried opaquely between DU and CU inside F1AP's
//! `DuToCuRrcContainer`/`du_to_cu_rrc_information` IEs (§4.G). The DU never
//! interprets it; the CU only forwards it back to the UE inside
//! `RrcSetup`/`RrcReconfiguration`. A representative subset of TS 38.331's
//! `CellGroupConfig` - most of its fields are cell/bearer scheduling detail
//! this workspace's scheduler doesn't yet model, so they are carried as
//! `None` rather than invented.

use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGroupId(pub u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGroupConfig {
    pub cell_group_id: CellGroupId,
    pub rlc_bearer_to_add_mod_list: Option<Vec<u8>>,
    pub mac_cell_group_config: Option<Vec<u8>>,
}

impl Encode for CellGroupConfig {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.cell_group_id.0 as i64, 0, 3)?;
        w.write_bool(self.rlc_bearer_to_add_mod_list.is_some());
        if let Some(b) = &self.rlc_bearer_to_add_mod_list {
            w.write_octet_string(b);
        }
        w.write_bool(self.mac_cell_group_config.is_some());
        if let Some(b) = &self.mac_cell_group_config {
            w.write_octet_string(b);
        }
        Ok(())
    }
}

impl Decode for CellGroupConfig {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let cell_group_id = CellGroupId(r.read_constrained_int(0, 3)? as u8);
        let rlc_bearer_to_add_mod_list = if r.read_bool()? { Some(r.read_octet_string()?) } else { None };
        let mac_cell_group_config = if r.read_bool()? { Some(r.read_octet_string()?) } else { None };
        Ok(CellGroupConfig { cell_group_id, rlc_bearer_to_add_mod_list, mac_cell_group_config })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use asn1_per::{pack, unpack};

    #[test]
    fn cell_group_config_round_trips() {
        let cfg = CellGroupConfig {
            cell_group_id: CellGroupId(1),
            rlc_bearer_to_add_mod_list: None,
            mac_cell_group_config: Some(vec![1, 2, 3]),
        };
        let bytes = pack(&cfg).unwrap();
        let back: CellGroupConfig = unpack(&bytes).unwrap();
        assert_eq!(cfg, back);
    }
}
