//! Lazy PDSCH candidate search (§4.O): iterates HARQ x SearchSpace x
//! TimeDomainResource tuples, only computing validity for the candidates
//! actually consumed. Grounded on `ue_pdsch_param_candidate_searcher.h`.

use crate::resources::{nof_dl_symbols_in_slot, SearchSpace, TimeDomainResource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlHarqProcess {
    pub id: u8,
    pub has_pending_retx: bool,
    pub is_fallback: bool,
    /// Slot at which the HARQ-ACK for the last allocation is expected;
    /// retx candidates are visited oldest-first by this value.
    pub slot_ack: u64,
    pub last_nof_symbols: Option<u8>,
}

impl DlHarqProcess {
    pub fn is_empty(&self) -> bool {
        !self.has_pending_retx && self.last_nof_symbols.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdschCandidate {
    pub harq_id: u8,
    pub search_space_id: u8,
    pub time_res_index: usize,
}

/// Ordering defines candidate priority (lower = tried first), mirroring the
/// searcher's `operator<`.
impl PartialOrd for PdschCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PdschCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.harq_id, self.search_space_id, self.time_res_index).cmp(&(
            other.harq_id,
            other.search_space_id,
            other.time_res_index,
        ))
    }
}

pub struct PdschCandidateSearcher<'a> {
    harqs: Vec<DlHarqProcess>,
    search_spaces: &'a [SearchSpace],
    is_retx: bool,
    pdcch_slot: u64,
    harq_idx: usize,
    ss_idx: usize,
    time_res: usize,
}

impl<'a> PdschCandidateSearcher<'a> {
    /// `has_pending_newtx_bytes` / `find_empty_harq` stand in for the full
    /// UE/cell state the original reads off `ue_cell`; callers compute them
    /// once and pass the result in.
    pub fn new(
        is_retx: bool,
        pdcch_slot: u64,
        search_spaces: &'a [SearchSpace],
        dl_harqs: &[DlHarqProcess],
        has_pending_newtx_bytes: bool,
    ) -> Self {
        let mut harqs = Vec::new();
        if is_retx {
            harqs.extend(dl_harqs.iter().filter(|h| h.has_pending_retx && !h.is_fallback).copied());
            harqs.sort_by_key(|h| h.slot_ack);
        } else if has_pending_newtx_bytes {
            if let Some(h) = dl_harqs.iter().find(|h| h.is_empty()) {
                harqs.push(*h);
            }
        }

        let mut searcher = PdschCandidateSearcher {
            harqs,
            search_spaces,
            is_retx,
            pdcch_slot,
            harq_idx: 0,
            ss_idx: 0,
            time_res: 0,
        };
        searcher.advance_to_valid();
        searcher
    }

    fn current_harq(&self) -> Option<&DlHarqProcess> {
        self.harqs.get(self.harq_idx)
    }

    fn is_valid(&self, ss: &SearchSpace, td: &TimeDomainResource, harq: &DlHarqProcess) -> bool {
        if ss.is_common_ss0 {
            return false;
        }
        if !ss.has_pdcch_candidates {
            return false;
        }
        if nof_dl_symbols_in_slot(td.k0) < td.symbol_stop() {
            return false;
        }
        if td.symbol_start < ss.coreset_first_symbol + ss.coreset_duration {
            return false;
        }
        if self.is_retx {
            if let Some(prev_len) = harq.last_nof_symbols {
                if td.symbol_len != prev_len {
                    return false;
                }
            }
        }
        true
    }

    fn advance_to_valid(&mut self) {
        while let Some(harq) = self.current_harq().copied() {
            while self.ss_idx < self.search_spaces.len() {
                let ss = &self.search_spaces[self.ss_idx];
                while self.time_res < ss.time_domain_list.len() {
                    let td = ss.time_domain_list[self.time_res];
                    if self.is_valid(ss, &td, &harq) {
                        return;
                    }
                    self.time_res += 1;
                }
                self.time_res = 0;
                self.ss_idx += 1;
            }
            self.ss_idx = 0;
            self.harq_idx += 1;
        }
    }
}

impl<'a> Iterator for PdschCandidateSearcher<'a> {
    type Item = PdschCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        let harq = self.current_harq()?;
        let ss = &self.search_spaces[self.ss_idx];
        let candidate = PdschCandidate {
            harq_id: harq.id,
            search_space_id: ss.id,
            time_res_index: self.time_res,
        };
        // pdcch_slot is carried for parity with the original's constructor
        // signature even though this simplified validity check is slot-shape
        // independent.
        let _ = self.pdcch_slot;
        self.time_res += 1;
        self.advance_to_valid();
        Some(candidate)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ss(id: u8) -> SearchSpace {
        SearchSpace {
            id,
            is_common_ss0: false,
            coreset_first_symbol: 0,
            coreset_duration: 1,
            time_domain_list: vec![TimeDomainResource { k0: 0, symbol_start: 2, symbol_len: 12 }],
            has_pdcch_candidates: true,
        }
    }

    #[test]
    fn newtx_search_yields_at_most_one_empty_harq_candidate_set() {
        let harqs = vec![
            DlHarqProcess { id: 0, has_pending_retx: false, is_fallback: false, slot_ack: 0, last_nof_symbols: None },
            DlHarqProcess { id: 1, has_pending_retx: false, is_fallback: false, slot_ack: 0, last_nof_symbols: None },
        ];
        let spaces = vec![ss(1)];
        let searcher = PdschCandidateSearcher::new(false, 10, &spaces, &harqs, true);
        let candidates: Vec<_> = searcher.collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].harq_id, 0);
    }

    #[test]
    fn no_newtx_bytes_yields_no_candidates() {
        let harqs = vec![DlHarqProcess { id: 0, has_pending_retx: false, is_fallback: false, slot_ack: 0, last_nof_symbols: None }];
        let spaces = vec![ss(1)];
        let searcher = PdschCandidateSearcher::new(false, 10, &spaces, &harqs, false);
        assert_eq!(searcher.count(), 0);
    }

    #[test]
    fn search_space_zero_is_always_skipped() {
        let mut common_ss0 = ss(0);
        common_ss0.is_common_ss0 = true;
        let harqs = vec![DlHarqProcess { id: 0, has_pending_retx: false, is_fallback: false, slot_ack: 0, last_nof_symbols: None }];
        let spaces = vec![common_ss0, ss(1)];
        let searcher = PdschCandidateSearcher::new(false, 10, &spaces, &harqs, true);
        let candidates: Vec<_> = searcher.collect();
        assert!(candidates.iter().all(|c| c.search_space_id != 0));
    }

    #[test]
    fn retx_candidates_require_matching_symbol_length() {
        let harqs = vec![DlHarqProcess {
            id: 3,
            has_pending_retx: true,
            is_fallback: false,
            slot_ack: 5,
            last_nof_symbols: Some(4),
        }];
        let spaces = vec![ss(1)];
        let searcher = PdschCandidateSearcher::new(true, 10, &spaces, &harqs, false);
        assert_eq!(searcher.count(), 0);
    }

    #[test]
    fn retx_candidates_visited_oldest_ack_first() {
        let harqs = vec![
            DlHarqProcess { id: 0, has_pending_retx: true, is_fallback: false, slot_ack: 20, last_nof_symbols: Some(12) },
            DlHarqProcess { id: 1, has_pending_retx: true, is_fallback: false, slot_ack: 5, last_nof_symbols: Some(12) },
        ];
        let spaces = vec![ss(1)];
        let searcher = PdschCandidateSearcher::new(true, 10, &spaces, &harqs, false);
        let candidates: Vec<_> = searcher.collect();
        assert_eq!(candidates[0].harq_id, 1);
    }
}
