//! The configuration surface shared by every gNodeB component (§6).
//!
//! Parsing this out of a file or the command line is explicitly out of
//! scope (non-goal) - something above this workspace builds a `CoreConfig`
//! and passes it to a component's constructor, exactly as `Worker::new`
//! takes an already-built `Config`.

use std::collections::HashMap;

/// PDCP configuration as looked up by 5QI (§4.J). Left abstract here - the
/// `rrc` crate owns the concrete `PdcpConfig` shape; this is the map that
/// feeds it.
pub type FiveQi = u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdcpFiveQiEntry {
    pub sn_size_ul: u8,
    pub sn_size_dl: u8,
    pub discard_timer_ms: u32,
    pub t_reordering_ms: u32,
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// gNB identifier (TS 38.413 GlobalRanNodeId), held as a bit count + value.
    pub gnb_id: u32,
    pub gnb_id_bits: u8,
    pub ran_node_name: Option<String>,
    /// PLMN, BCD-reversed 3-octet encoding (§6: "00101" -> `00 f1 10`).
    pub plmn: [u8; 3],
    pub tac: [u8; 3],
    /// NG/F1 Setup retry cap. Default 5 (§6).
    pub max_setup_retries: u32,
    pub ta_measurement_slot_period: u32,
    pub ta_update_measurement_ul_sinr_threshold: f32,
    pub ta_cmd_offset_threshold: i32,
    /// UL subcarrier-spacing numerology (TS 38.211 §4.2 μ value) the TA
    /// manager scales its N_TA-difference measurements by.
    pub ul_scs_numerology: u8,
    pub five_qi_config: HashMap<FiveQi, PdcpFiveQiEntry>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let mut five_qi_config = HashMap::new();
        // 5QI 9: non-GBR, default bearer traffic (TS 23.501 table 5.7.4-1).
        five_qi_config.insert(
            9,
            PdcpFiveQiEntry {
                sn_size_ul: 18,
                sn_size_dl: 18,
                discard_timer_ms: 100,
                t_reordering_ms: 100,
            },
        );
        // 5QI 1: conversational voice, GBR.
        five_qi_config.insert(
            1,
            PdcpFiveQiEntry {
                sn_size_ul: 12,
                sn_size_dl: 12,
                discard_timer_ms: 75,
                t_reordering_ms: 0,
            },
        );
        CoreConfig {
            gnb_id: 1,
            gnb_id_bits: 22,
            ran_node_name: Some("alsoran-like-gnb".to_string()),
            plmn: [0x00, 0xf1, 0x10],
            tac: [0, 0, 1],
            max_setup_retries: 5,
            ta_measurement_slot_period: 80,
            ta_update_measurement_ul_sinr_threshold: 10.0,
            ta_cmd_offset_threshold: 1,
            ul_scs_numerology: 0,
            five_qi_config,
        }
    }
}

impl CoreConfig {
    /// §4.N: a negative threshold permanently disables the TA manager.
    pub fn ta_manager_disabled(&self) -> bool {
        self.ta_cmd_offset_threshold < 0
    }
}
