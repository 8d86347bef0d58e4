//! Cell-resource shapes the candidate searchers iterate over. A
//! representative subset of the real RAN cell configuration - enough to
//! drive the lazy search algorithm, not a full resource-grid model
//! (out of scope, §9).

/// One PDSCH/PUSCH time-domain resource: which symbols of the slot it
/// occupies, and (for PDSCH) the K0 slot offset from PDCCH to PDSCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDomainResource {
    pub k0: u8,
    pub symbol_start: u8,
    pub symbol_len: u8,
}

impl TimeDomainResource {
    pub fn symbol_stop(&self) -> u8 {
        self.symbol_start + self.symbol_len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpace {
    pub id: u8,
    /// SearchSpace#0 is reserved for common signalling and is never used
    /// for UE PDSCH/PUSCH allocation candidates.
    pub is_common_ss0: bool,
    pub coreset_first_symbol: u8,
    pub coreset_duration: u8,
    pub time_domain_list: Vec<TimeDomainResource>,
    /// PDCCH candidates monitored in the slot being scheduled; empty means
    /// this search space has nothing to allocate against in this slot.
    pub has_pdcch_candidates: bool,
}

/// DL symbols available in a slot `k0` slots after the PDCCH slot.
pub fn nof_dl_symbols_in_slot(_k0: u8) -> u8 {
    14
}

/// UL symbols available in a slot for PUSCH.
pub fn nof_ul_symbols_in_slot() -> u8 {
    14
}
