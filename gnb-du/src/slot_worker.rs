//! Per-slot DU-high tick (§4.L-O): wires the MAC logical-channel managers
//! to the scheduler's lazy candidate searchers the way `du_high.cpp`'s
//! slot-indication handler wires `dl_logical_channel_manager` to
//! `ue_pdsch_param_candidate_searcher`, without a real PHY/resource grid
//! underneath - allocation "succeeds" as soon as a valid candidate and
//! pending bytes both exist.

use common::CoreConfig;
use mac::{DlLogicalChannelManager, DlMsgLcInfo, TaManager, UlLogicalChannelManager};
use scheduler::{DlHarqProcess, PdschCandidate, PdschCandidateSearcher, PuschCandidate, PuschCandidateSearcher, SearchSpace};

/// Bytes available per OFDM symbol for a TB, standing in for an MCS/PRB
/// derived value this workspace does not model (§9 non-goal: physical layer).
const BYTES_PER_SYMBOL: usize = 25;

pub const NOF_DL_HARQS: u8 = 8;

pub struct UeMacContext {
    pub dl: DlLogicalChannelManager,
    pub ul: UlLogicalChannelManager,
    pub ta: TaManager,
    dl_harqs: Vec<DlHarqProcess>,
}

impl UeMacContext {
    pub fn new(cfg: &CoreConfig) -> Self {
        let dl_harqs = (0..NOF_DL_HARQS)
            .map(|id| DlHarqProcess { id, has_pending_retx: false, is_fallback: false, slot_ack: 0, last_nof_symbols: None })
            .collect();
        UeMacContext { dl: DlLogicalChannelManager::new(), ul: UlLogicalChannelManager::new(), ta: TaManager::new(cfg), dl_harqs }
    }
}

#[derive(Debug)]
pub struct DlAllocation {
    pub candidate: PdschCandidate,
    pub subpdus: Vec<DlMsgLcInfo>,
}

/// Runs one DL slot-indication for a single UE: finds the best PDSCH
/// candidate (new-transmission first HARQ, else a pending retransmission),
/// and if found, packs a transport block from the DL logical-channel
/// manager's current buffer state.
pub fn tick_dl_slot(ue: &mut UeMacContext, search_spaces: &[SearchSpace], pdcch_slot: u64) -> Option<DlAllocation> {
    let has_pending = ue.dl.has_pending_bytes() || ue.dl.has_pending_ces();
    let is_retx = ue.dl_harqs.iter().any(|h| h.has_pending_retx);
    let candidate = PdschCandidateSearcher::new(is_retx, pdcch_slot, search_spaces, &ue.dl_harqs, has_pending).next()?;

    if !is_retx && !has_pending {
        return None;
    }

    let ss = search_spaces.iter().find(|s| s.id == candidate.search_space_id)?;
    let td = ss.time_domain_list.get(candidate.time_res_index)?;
    let tb_size = td.symbol_len as usize * BYTES_PER_SYMBOL;
    let subpdus = ue.dl.pack_transport_block(tb_size);

    if let Some(harq) = ue.dl_harqs.iter_mut().find(|h| h.id == candidate.harq_id) {
        harq.has_pending_retx = !subpdus.is_empty() && !is_retx;
        harq.last_nof_symbols = Some(td.symbol_len);
        harq.slot_ack = pdcch_slot;
    }

    Some(DlAllocation { candidate, subpdus })
}

/// Runs one UL slot-indication: finds a PUSCH candidate when the UE has a
/// pending SR or nonzero BSR.
pub fn tick_ul_slot(ue: &UeMacContext, search_spaces: &[SearchSpace]) -> Option<PuschCandidate> {
    if !ue.ul.has_pending_bytes() && !ue.ul.has_pending_sr() {
        return None;
    }
    PuschCandidateSearcher::new(false, None, search_spaces).next()
}

#[cfg(test)]
mod test {
    use super::*;

    fn cfg() -> CoreConfig {
        CoreConfig::default()
    }

    fn one_search_space() -> Vec<SearchSpace> {
        vec![SearchSpace {
            id: 1,
            is_common_ss0: false,
            coreset_first_symbol: 0,
            coreset_duration: 1,
            time_domain_list: vec![scheduler::TimeDomainResource { k0: 0, symbol_start: 2, symbol_len: 10 }],
            has_pdcch_candidates: true,
        }]
    }

    #[test]
    fn no_pending_bytes_yields_no_allocation() {
        let mut ue = UeMacContext::new(&cfg());
        assert!(tick_dl_slot(&mut ue, &one_search_space(), 0).is_none());
    }

    #[test]
    fn pending_sdu_yields_an_allocation() {
        let mut ue = UeMacContext::new(&cfg());
        ue.dl.handle_dl_buffer_status_indication(mac::lcid_dl_sch::LCID_SRB1, 50);
        ue.dl.set_status(mac::lcid_dl_sch::LCID_SRB1, true);
        let alloc = tick_dl_slot(&mut ue, &one_search_space(), 0).expect("candidate available");
        assert!(!alloc.subpdus.is_empty());
    }

    #[test]
    fn empty_search_spaces_yield_no_allocation() {
        let mut ue = UeMacContext::new(&cfg());
        ue.dl.handle_dl_buffer_status_indication(mac::lcid_dl_sch::LCID_SRB1, 50);
        ue.dl.set_status(mac::lcid_dl_sch::LCID_SRB1, true);
        assert!(tick_dl_slot(&mut ue, &[], 0).is_none());
    }
}
