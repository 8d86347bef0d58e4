//! F1AP IEs that wrap RRC-layer bytes without interpreting them (§4.G).
//! F1AP never decodes `CellGroupConfig`/RRC containers itself - it only
//! carries the octets `rrc` produced - so these are opaque byte newtypes
//! at this layer, not the decoded `rrc::CellGroupConfig`.

use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};
use xxap::{NrCgi, Tac};

/// `CellGroupConfig` as carried inside `DuToCuRrcInformation` - the CU
/// forwards these bytes back to the UE inside RRC Setup/Reconfiguration
/// without decoding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGroupConfig(pub Vec<u8>);

/// The DU-to-CU RRC container carried on Initial UL RRC Message Transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuToCuRrcContainer(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuToCuRrcInformation {
    pub cell_group_config: CellGroupConfig,
}

impl Encode for DuToCuRrcInformation {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_octet_string(&self.cell_group_config.0);
        Ok(())
    }
}

impl Decode for DuToCuRrcInformation {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(DuToCuRrcInformation { cell_group_config: CellGroupConfig(r.read_octet_string()?) })
    }
}

/// One cell in a DU's F1 Setup served-cells list (§4.G "served cells and
/// packed MIB/SIB1 per cell").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedCellInformation {
    pub nr_cgi: NrCgi,
    pub tac: Tac,
    pub packed_mib: Vec<u8>,
    pub packed_sib1: Vec<u8>,
}

impl Encode for ServedCellInformation {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_nr_cgi(w, self.nr_cgi)?;
        w.write_bytes(&self.tac.0);
        w.write_octet_string(&self.packed_mib);
        w.write_octet_string(&self.packed_sib1);
        Ok(())
    }
}

impl Decode for ServedCellInformation {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let nr_cgi = crate::wire::read_nr_cgi(r)?;
        let tac_bytes = r.read_bytes(3)?;
        let mut tac = [0u8; 3];
        tac.copy_from_slice(&tac_bytes);
        let packed_mib = r.read_octet_string()?;
        let packed_sib1 = r.read_octet_string()?;
        Ok(ServedCellInformation { nr_cgi, tac: Tac(tac), packed_mib, packed_sib1 })
    }
}
