//! DU cell registry (§4.K): the set of cells this DU operates, indexed by
//! DU-local cell index and secondarily by packed NR-CGI.

use common::{CoreError, CoreResult};
use std::collections::HashMap;
use xxap::{NrCgi, Tac};

/// Cap on the number of cells a single DU process operates. Chosen well
/// above any realistic single-DU deployment (a handful of sectors) while
/// keeping the registry a flat `Vec`.
pub const MAX_DU_CELLS: usize = 16;

/// DU-local cell index, `0..MAX_DU_CELLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DuCellIndex(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellConfig {
    pub nr_cgi: NrCgi,
    pub tac: Tac,
    pub packed_mib: Vec<u8>,
    pub packed_sib1: Vec<u8>,
}

#[derive(Default)]
pub struct CellRegistry {
    cells: Vec<CellConfig>,
    by_cgi: HashMap<u64, DuCellIndex>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cell: CellConfig) -> CoreResult<DuCellIndex> {
        if self.cells.len() >= MAX_DU_CELLS {
            return Err(CoreError::TooManyCells);
        }
        let packed = cell.nr_cgi.pack();
        if self.by_cgi.contains_key(&packed) {
            return Err(CoreError::Duplicate);
        }
        let index = DuCellIndex(self.cells.len());
        self.cells.push(cell);
        self.by_cgi.insert(packed, index);
        Ok(index)
    }

    pub fn by_index(&self, index: DuCellIndex) -> CoreResult<&CellConfig> {
        self.cells.get(index.0).ok_or(CoreError::NotFound)
    }

    pub fn by_nr_cgi(&self, nr_cgi: &NrCgi) -> CoreResult<(DuCellIndex, &CellConfig)> {
        let index = *self.by_cgi.get(&nr_cgi.pack()).ok_or(CoreError::NotFound)?;
        Ok((index, &self.cells[index.0]))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DuCellIndex, &CellConfig)> {
        self.cells.iter().enumerate().map(|(i, c)| (DuCellIndex(i), c))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::{NrCellIdentity, PlmnIdentity};

    fn cell(cell_id: u64) -> CellConfig {
        CellConfig {
            nr_cgi: NrCgi { plmn_identity: PlmnIdentity([0, 0xf1, 0x10]), nr_cell_identity: NrCellIdentity::new(cell_id) },
            tac: Tac([0, 0, 1]),
            packed_mib: vec![0; 3],
            packed_sib1: vec![0; 8],
        }
    }

    #[test]
    fn finds_a_registered_cell_by_index_and_by_cgi() {
        let mut reg = CellRegistry::new();
        let index = reg.add(cell(1)).unwrap();
        assert_eq!(reg.by_index(index).unwrap().tac, Tac([0, 0, 1]));
        let (found_index, _) = reg.by_nr_cgi(&cell(1).nr_cgi).unwrap();
        assert_eq!(found_index, index);
    }

    #[test]
    fn duplicate_nr_cgi_is_rejected() {
        let mut reg = CellRegistry::new();
        reg.add(cell(1)).unwrap();
        assert_eq!(reg.add(cell(1)).unwrap_err(), CoreError::Duplicate);
    }

    #[test]
    fn registry_rejects_beyond_max_du_cells() {
        let mut reg = CellRegistry::new();
        for i in 0..MAX_DU_CELLS as u64 {
            reg.add(cell(i)).unwrap();
        }
        assert_eq!(reg.add(cell(MAX_DU_CELLS as u64)).unwrap_err(), CoreError::TooManyCells);
    }

    #[test]
    fn unknown_cgi_is_not_found() {
        let reg = CellRegistry::new();
        assert_eq!(reg.by_nr_cgi(&cell(1).nr_cgi).unwrap_err(), CoreError::NotFound);
    }
}
