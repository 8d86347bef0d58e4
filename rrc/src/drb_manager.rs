//! DRB manager (§4.J): DRB-ID -> DRB context map plus a 5QI -> DRB-ID
//! index, so flows sharing a 5QI fold onto one DRB (`drb_manager_impl.cpp`).

use common::config::{FiveQi, PdcpFiveQiEntry};
use common::{CoreError, CoreResult};
use std::collections::HashMap;
use xxap::{DrbId, QosFlowIdentifier, QosFlowSetupRequestItem, Snssai};

pub const MIN_DRB_ID: u8 = 1;
pub const MAX_DRB_ID: u8 = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdapConfig {
    pub pdu_session_id: u16,
    pub is_default_drb: bool,
    /// §4.J "SDAP header absent both directions" - always `false`.
    pub sdap_header_ul_present: bool,
    pub sdap_header_dl_present: bool,
    pub mapped_qos_flows: Vec<QosFlowIdentifier>,
}

#[derive(Debug, Clone)]
pub struct DrbContext {
    pub drb_id: DrbId,
    pub pdu_session_id: u16,
    pub snssai: Snssai,
    pub five_qi: FiveQi,
    pub pdcp_config: PdcpFiveQiEntry,
    pub sdap_config: SdapConfig,
}

#[derive(Default)]
pub struct DrbManager {
    drbs: HashMap<u8, DrbContext>,
    five_qi_index: HashMap<FiveQi, u8>,
}

impl DrbManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lowest_free_drb_id(&self) -> Option<u8> {
        (MIN_DRB_ID..=MAX_DRB_ID).find(|id| !self.drbs.contains_key(id))
    }

    /// §4.J allocation policy: derive 5QI, reuse an existing DRB with that
    /// 5QI if one exists, otherwise allocate the lowest free DRB-ID.
    pub fn allocate_for_flow(
        &mut self,
        pdu_session_id: u16,
        snssai: Snssai,
        flow: &QosFlowSetupRequestItem,
        five_qi_config: &HashMap<FiveQi, PdcpFiveQiEntry>,
    ) -> CoreResult<DrbId> {
        let five_qi = flow
            .qos_flow_level_qos_parameters
            .qos_characteristics
            .five_qi()
            .ok_or(CoreError::InvalidQoS)?;

        if let Some(&existing) = self.five_qi_index.get(&five_qi) {
            let drb = self.drbs.get_mut(&existing).expect("five_qi_index entries always have a DRB");
            drb.sdap_config.mapped_qos_flows.push(flow.qos_flow_identifier);
            return Ok(DrbId(existing));
        }

        let drb_id = self.lowest_free_drb_id().ok_or(CoreError::DrbsFull)?;
        let pdcp_config = five_qi_config.get(&five_qi).cloned().ok_or(CoreError::UnknownFiveQi)?;
        let is_default_drb = self.drbs.is_empty();

        self.drbs.insert(
            drb_id,
            DrbContext {
                drb_id: DrbId(drb_id),
                pdu_session_id,
                snssai,
                five_qi,
                pdcp_config,
                sdap_config: SdapConfig {
                    pdu_session_id,
                    is_default_drb,
                    sdap_header_ul_present: false,
                    sdap_header_dl_present: false,
                    mapped_qos_flows: vec![flow.qos_flow_identifier],
                },
            },
        );
        self.five_qi_index.insert(five_qi, drb_id);
        Ok(DrbId(drb_id))
    }

    fn get(&self, drb_id: DrbId) -> CoreResult<&DrbContext> {
        self.drbs.get(&drb_id.0).ok_or(CoreError::NotFound)
    }

    pub fn pdcp_config(&self, drb_id: DrbId) -> CoreResult<&PdcpFiveQiEntry> {
        self.get(drb_id).map(|d| &d.pdcp_config)
    }

    pub fn sdap_config(&self, drb_id: DrbId) -> CoreResult<&SdapConfig> {
        self.get(drb_id).map(|d| &d.sdap_config)
    }

    pub fn mapped_flows(&self, drb_id: DrbId) -> CoreResult<&[QosFlowIdentifier]> {
        self.get(drb_id).map(|d| d.sdap_config.mapped_qos_flows.as_slice())
    }

    pub fn pdu_session_id(&self, drb_id: DrbId) -> CoreResult<u16> {
        self.get(drb_id).map(|d| d.pdu_session_id)
    }

    pub fn snssai(&self, drb_id: DrbId) -> CoreResult<Snssai> {
        self.get(drb_id).map(|d| d.snssai)
    }

    pub fn drbs_for_session(&self, pdu_session_id: u16) -> Vec<DrbId> {
        let mut ids: Vec<DrbId> =
            self.drbs.values().filter(|d| d.pdu_session_id == pdu_session_id).map(|d| d.drb_id).collect();
        ids.sort_by_key(|d| d.0);
        ids
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::{ids::QosFlowIdentifier as Qfi, QosCharacteristics, QosFlowLevelQosParameters};

    fn five_qi_config() -> HashMap<FiveQi, PdcpFiveQiEntry> {
        let mut m = HashMap::new();
        m.insert(9, PdcpFiveQiEntry { sn_size_ul: 18, sn_size_dl: 18, discard_timer_ms: 100, t_reordering_ms: 100 });
        m
    }

    fn flow(qfi: u8, five_qi: FiveQi) -> QosFlowSetupRequestItem {
        QosFlowSetupRequestItem {
            qos_flow_identifier: Qfi(qfi),
            qos_flow_level_qos_parameters: QosFlowLevelQosParameters {
                qos_characteristics: QosCharacteristics::NonDynamic { five_qi },
            },
        }
    }

    #[test]
    fn first_drb_is_marked_default() {
        let mut mgr = DrbManager::new();
        let cfg = five_qi_config();
        let drb = mgr.allocate_for_flow(1, Snssai { sst: 1, sd: None }, &flow(0, 9), &cfg).unwrap();
        assert!(mgr.sdap_config(drb).unwrap().is_default_drb);
    }

    #[test]
    fn flows_sharing_a_five_qi_fold_onto_one_drb() {
        let mut mgr = DrbManager::new();
        let cfg = five_qi_config();
        let drb1 = mgr.allocate_for_flow(1, Snssai { sst: 1, sd: None }, &flow(0, 9), &cfg).unwrap();
        let drb2 = mgr.allocate_for_flow(1, Snssai { sst: 1, sd: None }, &flow(1, 9), &cfg).unwrap();
        assert_eq!(drb1, drb2);
        assert_eq!(mgr.mapped_flows(drb1).unwrap().len(), 2);
    }

    #[test]
    fn unknown_five_qi_fails_with_unknown_five_qi() {
        let mut mgr = DrbManager::new();
        let cfg = five_qi_config();
        let err = mgr.allocate_for_flow(1, Snssai { sst: 1, sd: None }, &flow(0, 7), &cfg).unwrap_err();
        assert_eq!(err, CoreError::UnknownFiveQi);
    }

    #[test]
    fn exhausting_drb_ids_fails_with_drbs_full() {
        let mut mgr = DrbManager::new();
        let mut cfg = five_qi_config();
        for five_qi in 0..32u16 {
            cfg.insert(five_qi, cfg[&9].clone());
            mgr.allocate_for_flow(1, Snssai { sst: 1, sd: None }, &flow(0, five_qi), &cfg).unwrap();
        }
        let err = mgr.allocate_for_flow(1, Snssai { sst: 1, sd: None }, &flow(0, 99), &cfg).unwrap_err();
        assert_eq!(err, CoreError::DrbsFull);
    }
}
