//! Lazy PUSCH candidate search (§4.O): iterates SearchSpace x
//! TimeDomainResource tuples. Grounded on
//! `ue_pusch_alloc_param_candidate_searcher.h`.

use crate::resources::{nof_ul_symbols_in_slot, SearchSpace, TimeDomainResource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuschCandidate {
    pub search_space_id: u8,
    pub time_res_index: usize,
}

impl PartialOrd for PuschCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PuschCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.search_space_id, self.time_res_index).cmp(&(other.search_space_id, other.time_res_index))
    }
}

pub struct PuschCandidateSearcher<'a> {
    search_spaces: &'a [SearchSpace],
    is_retx: bool,
    prev_nof_symbols: Option<u8>,
    ss_idx: usize,
    time_res: usize,
}

impl<'a> PuschCandidateSearcher<'a> {
    pub fn new(is_retx: bool, prev_nof_symbols: Option<u8>, search_spaces: &'a [SearchSpace]) -> Self {
        let mut searcher = PuschCandidateSearcher {
            search_spaces,
            is_retx,
            prev_nof_symbols,
            ss_idx: 0,
            time_res: 0,
        };
        searcher.advance_to_valid();
        searcher
    }

    fn is_valid(&self, ss: &SearchSpace, td: &TimeDomainResource) -> bool {
        // PUSCH candidates are only ever drawn from the UE's dedicated
        // search spaces; SearchSpace#0 carries only common signalling.
        if ss.is_common_ss0 {
            return false;
        }
        if !ss.has_pdcch_candidates {
            return false;
        }
        if nof_ul_symbols_in_slot() < td.symbol_stop() {
            return false;
        }
        if self.is_retx {
            if let Some(prev_len) = self.prev_nof_symbols {
                if td.symbol_len != prev_len {
                    return false;
                }
            }
        }
        true
    }

    fn advance_to_valid(&mut self) {
        while self.ss_idx < self.search_spaces.len() {
            let ss = &self.search_spaces[self.ss_idx];
            while self.time_res < ss.time_domain_list.len() {
                let td = ss.time_domain_list[self.time_res];
                if self.is_valid(ss, &td) {
                    return;
                }
                self.time_res += 1;
            }
            self.time_res = 0;
            self.ss_idx += 1;
        }
    }
}

impl<'a> Iterator for PuschCandidateSearcher<'a> {
    type Item = PuschCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ss_idx >= self.search_spaces.len() {
            return None;
        }
        let ss = &self.search_spaces[self.ss_idx];
        let candidate = PuschCandidate {
            search_space_id: ss.id,
            time_res_index: self.time_res,
        };
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
            time_domain_list: vec![TimeDomainResource { k0: 0, symbol_start: 0, symbol_len: 10 }],
            has_pdcch_candidates: true,
        }
    }

    #[test]
    fn common_search_space_never_yields_candidates() {
        let mut common = ss(0);
        common.is_common_ss0 = true;
        let spaces = vec![common];
        let searcher = PuschCandidateSearcher::new(false, None, &spaces);
        assert_eq!(searcher.count(), 0);
    }

    #[test]
    fn retx_requires_matching_symbol_length() {
        let spaces = vec![ss(1)];
        let searcher = PuschCandidateSearcher::new(true, Some(5), &spaces);
        assert_eq!(searcher.count(), 0);
        let searcher = PuschCandidateSearcher::new(true, Some(10), &spaces);
        assert_eq!(searcher.count(), 1);
    }

    #[test]
    fn newtx_yields_every_dedicated_search_space_candidate() {
        let spaces = vec![ss(1), ss(2)];
        let searcher = PuschCandidateSearcher::new(false, None, &spaces);
        assert_eq!(searcher.count(), 2);
    }
}
