//! UE identifier registries (§4.D): bidirectional maps between a primary
//! index and every secondary ID a UE may carry, tolerant of partial setup,
//! racing peers and release.

use crate::ids::{AmfUeNgapId, CRnti, DuUeIndex, GnbDuUeF1apId};
use common::{CoreError, CoreResult};
use std::collections::HashMap;

/// The DU-side registry: primary key `DuUeIndex`, secondary key `CRnti`.
pub struct DuUeRegistry<T> {
    by_index: HashMap<DuUeIndex, T>,
    by_rnti: HashMap<CRnti, DuUeIndex>,
}

impl<T> Default for DuUeRegistry<T> {
    fn default() -> Self {
        DuUeRegistry {
            by_index: HashMap::new(),
            by_rnti: HashMap::new(),
        }
    }
}

impl<T> DuUeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, index: DuUeIndex, rnti: CRnti, ue: T) -> CoreResult<()> {
        if self.by_index.contains_key(&index) || self.by_rnti.contains_key(&rnti) {
            return Err(CoreError::Duplicate);
        }
        self.by_index.insert(index, ue);
        self.by_rnti.insert(rnti, index);
        Ok(())
    }

    pub fn find_by_index(&self, index: DuUeIndex) -> Option<&T> {
        self.by_index.get(&index)
    }

    pub fn find_by_index_mut(&mut self, index: DuUeIndex) -> Option<&mut T> {
        self.by_index.get_mut(&index)
    }

    pub fn find_by_rnti(&self, rnti: CRnti) -> Option<(DuUeIndex, &T)> {
        let index = *self.by_rnti.get(&rnti)?;
        self.by_index.get(&index).map(|ue| (index, ue))
    }

    pub fn contains_rnti(&self, rnti: CRnti) -> bool {
        self.by_rnti.contains_key(&rnti)
    }

    pub fn remove(&mut self, index: DuUeIndex) -> Option<T> {
        if let Some((rnti, _)) = self.by_rnti.iter().find(|(_, i)| **i == index).map(|(r, i)| (*r, *i)) {
            self.by_rnti.remove(&rnti);
        }
        self.by_index.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

/// The CU-CP-side registry: primary key `CuCpUeIndex` (the caller's
/// `crate::ids::CuCpUeIndex`, kept generic here as `usize` so this module
/// does not need to depend on the derivation formula), secondaries
/// `GnbDuUeF1apId` (learned once the DU UE context is created) and
/// `AmfUeNgapId` (learned at most once, after the first DL NAS transport,
/// §3 invariant iii).
pub struct CuUeRegistry<T> {
    by_index: HashMap<usize, T>,
    by_du_f1ap_id: HashMap<GnbDuUeF1apId, usize>,
    by_amf_ngap_id: HashMap<AmfUeNgapId, usize>,
    du_f1ap_id_of: HashMap<usize, GnbDuUeF1apId>,
    amf_ngap_id_of: HashMap<usize, AmfUeNgapId>,
}

impl<T> Default for CuUeRegistry<T> {
    fn default() -> Self {
        CuUeRegistry {
            by_index: HashMap::new(),
            by_du_f1ap_id: HashMap::new(),
            by_amf_ngap_id: HashMap::new(),
            du_f1ap_id_of: HashMap::new(),
            amf_ngap_id_of: HashMap::new(),
        }
    }
}

impl<T> CuUeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, index: usize, ue: T) -> CoreResult<()> {
        if self.by_index.contains_key(&index) {
            return Err(CoreError::Duplicate);
        }
        self.by_index.insert(index, ue);
        Ok(())
    }

    pub fn find_by_index(&self, index: usize) -> Option<&T> {
        self.by_index.get(&index)
    }

    pub fn find_by_index_mut(&mut self, index: usize) -> Option<&mut T> {
        self.by_index.get_mut(&index)
    }

    pub fn find_by_du_f1ap_id(&self, id: GnbDuUeF1apId) -> Option<(usize, &T)> {
        let index = *self.by_du_f1ap_id.get(&id)?;
        self.by_index.get(&index).map(|ue| (index, ue))
    }

    pub fn find_by_amf_ngap_id(&self, id: AmfUeNgapId) -> Option<(usize, &T)> {
        let index = *self.by_amf_ngap_id.get(&id)?;
        self.by_index.get(&index).map(|ue| (index, ue))
    }

    pub fn du_f1ap_id_of(&self, index: usize) -> Option<GnbDuUeF1apId> {
        self.du_f1ap_id_of.get(&index).copied()
    }

    pub fn amf_ngap_id_of(&self, index: usize) -> Option<AmfUeNgapId> {
        self.amf_ngap_id_of.get(&index).copied()
    }

    /// Learn the DU's F1AP UE ID for this UE. Idempotent for equal values,
    /// fails if already bound to a different UE (§4.D `assign_secondary`).
    pub fn assign_du_f1ap_id(&mut self, index: usize, id: GnbDuUeF1apId) -> CoreResult<()> {
        if !self.by_index.contains_key(&index) {
            return Err(CoreError::NotFound);
        }
        if let Some(existing) = self.du_f1ap_id_of.get(&index) {
            return if *existing == id { Ok(()) } else { Err(CoreError::IdentityMismatch) };
        }
        if let Some(owner) = self.by_du_f1ap_id.get(&id) {
            if *owner != index {
                return Err(CoreError::Duplicate);
            }
        }
        self.du_f1ap_id_of.insert(index, id);
        self.by_du_f1ap_id.insert(id, index);
        Ok(())
    }

    /// Learn the AMF-UE-NGAP-ID for this UE. Set at most once (§3 invariant
    /// iii); idempotent for equal values, `<IdentityMismatch>` on conflict.
    pub fn assign_amf_ngap_id(&mut self, index: usize, id: AmfUeNgapId) -> CoreResult<()> {
        if !self.by_index.contains_key(&index) {
            return Err(CoreError::NotFound);
        }
        if let Some(existing) = self.amf_ngap_id_of.get(&index) {
            return if *existing == id { Ok(()) } else { Err(CoreError::IdentityMismatch) };
        }
        if let Some(owner) = self.by_amf_ngap_id.get(&id) {
            if *owner != index {
                return Err(CoreError::Duplicate);
            }
        }
        self.amf_ngap_id_of.insert(index, id);
        self.by_amf_ngap_id.insert(id, index);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if let Some(id) = self.du_f1ap_id_of.remove(&index) {
            self.by_du_f1ap_id.remove(&id);
        }
        if let Some(id) = self.amf_ngap_id_of.remove(&index) {
            self.by_amf_ngap_id.remove(&id);
        }
        self.by_index.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ids::{CuCpUeIndex, RanUeNgapId};

    #[test]
    fn du_registry_add_find_remove() {
        let mut reg = DuUeRegistry::new();
        reg.add(DuUeIndex(0), CRnti(0x4601), "ue0").unwrap();
        assert_eq!(reg.find_by_index(DuUeIndex(0)), Some(&"ue0"));
        assert_eq!(reg.find_by_rnti(CRnti(0x4601)).unwrap().0, DuUeIndex(0));
        assert_eq!(reg.remove(DuUeIndex(0)), Some("ue0"));
        assert!(reg.find_by_index(DuUeIndex(0)).is_none());
        assert!(reg.find_by_rnti(CRnti(0x4601)).is_none());
    }

    #[test]
    fn du_registry_rejects_duplicate_rnti() {
        let mut reg = DuUeRegistry::new();
        reg.add(DuUeIndex(0), CRnti(1), "a").unwrap();
        assert_eq!(reg.add(DuUeIndex(1), CRnti(1), "b"), Err(CoreError::Duplicate));
    }

    #[test]
    fn cu_registry_amf_id_set_once() {
        let mut reg = CuUeRegistry::new();
        reg.add(0, "ue0").unwrap();
        reg.assign_amf_ngap_id(0, AmfUeNgapId(77)).unwrap();
        // idempotent for the same value
        reg.assign_amf_ngap_id(0, AmfUeNgapId(77)).unwrap();
        // conflicting value is rejected
        assert_eq!(
            reg.assign_amf_ngap_id(0, AmfUeNgapId(78)),
            Err(CoreError::IdentityMismatch)
        );
    }

    #[test]
    fn cu_registry_du_f1ap_id_cannot_be_stolen() {
        let mut reg = CuUeRegistry::new();
        reg.add(0, "a").unwrap();
        reg.add(1, "b").unwrap();
        reg.assign_du_f1ap_id(0, GnbDuUeF1apId(5)).unwrap();
        assert_eq!(
            reg.assign_du_f1ap_id(1, GnbDuUeF1apId(5)),
            Err(CoreError::Duplicate)
        );
    }

    /// §8: derivation is total and its inverse recovers (du_index, ue_index_in_du).
    #[test]
    fn cu_cp_ue_index_derivation_is_total() {
        for d in 0..4usize {
            for u in 0..4usize {
                let cu_id = CuCpUeIndex::derive(DuUeIndex(d), DuUeIndex(u));
                let (back_d, back_u) = cu_id.split();
                assert_eq!(back_d, DuUeIndex(d));
                assert_eq!(back_u, DuUeIndex(u));
            }
        }
    }

    #[test]
    fn cu_cp_ue_id_equals_ran_ue_ngap_id() {
        let cu_id = CuCpUeIndex::derive(DuUeIndex(0), DuUeIndex(0));
        assert_eq!(cu_id.as_ran_ue_ngap_id(), RanUeNgapId(0));
        assert_eq!(cu_id.as_gnb_cu_ue_f1ap_id().0, 0);
    }
}
