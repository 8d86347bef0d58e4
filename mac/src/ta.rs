//! Timing-advance manager (§4.N): accumulates per-TAG N_TA-difference
//! measurements over a configured window, rejects outliers by population
//! standard deviation, and decides when to emit a TA Command MAC CE per
//! TAG. Grounded on `ta_manager.{h,cpp}`.

use crate::lcid_dl_sch::TaCmdCePayload;
use common::CoreConfig;

/// TS 38.213 §4.2: TA Command field range for a MAC CE TA Command, encoded
/// as an unsigned offset from a neutral value of 31 (i.e. commanded
/// adjustment range is [-31, 32] in units of 16*64*Tc).
const TA_CMD_NEUTRAL: i32 = 31;
const TA_CMD_MIN: i32 = 0;
const TA_CMD_MAX: i32 = 63;

/// TS 38.331: a UE may be configured with up to 4 Timing Advance Groups.
const MAX_NOF_TAGS: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Measurement {
    n_ta_diff: f64,
    ul_sinr_db: f32,
}

pub struct TaManager {
    measurement_slot_period: u32,
    ul_sinr_threshold_db: f32,
    cmd_offset_threshold: i32,
    /// UL subcarrier-spacing numerology (μ in TS 38.211 §4.2): scales the
    /// T_C-unit N_TA difference into TA Command units.
    ul_scs_numerology: u8,
    tag_windows: [Vec<Measurement>; MAX_NOF_TAGS],
    slots_since_last_report: u32,
}

impl TaManager {
    pub fn new(cfg: &CoreConfig) -> Self {
        TaManager {
            measurement_slot_period: cfg.ta_measurement_slot_period,
            ul_sinr_threshold_db: cfg.ta_update_measurement_ul_sinr_threshold,
            cmd_offset_threshold: cfg.ta_cmd_offset_threshold,
            ul_scs_numerology: cfg.ul_scs_numerology,
            tag_windows: Default::default(),
            slots_since_last_report: 0,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.cmd_offset_threshold < 0
    }

    /// Record one N_TA-difference sample from a UL PUSCH/PUCCH measurement
    /// against the TAG it belongs to. Samples below the configured UL SINR
    /// threshold are dropped outright (too unreliable to trust even before
    /// outlier rejection).
    pub fn handle_ul_n_ta_update_indication(&mut self, tag_id: u8, n_ta_diff: f64, ul_sinr_db: f32) {
        if self.is_disabled() || ul_sinr_db < self.ul_sinr_threshold_db {
            return;
        }
        self.tag_windows[tag_id as usize].push(Measurement { n_ta_diff, ul_sinr_db });
    }

    /// Advance one slot; returns a TA Command CE payload per TAG whose
    /// measurement window closed this slot and whose filtered average
    /// crosses the configured offset threshold.
    pub fn handle_slot_indication(&mut self) -> Vec<TaCmdCePayload> {
        if self.is_disabled() {
            return Vec::new();
        }
        self.slots_since_last_report += 1;
        if self.slots_since_last_report < self.measurement_slot_period {
            return Vec::new();
        }
        self.slots_since_last_report = 0;

        let mut commands = Vec::new();
        for tag_id in 0..MAX_NOF_TAGS as u8 {
            if let Some(cmd) = self.compute_ta_cmd(tag_id) {
                commands.push(cmd);
            }
            self.tag_windows[tag_id as usize].clear();
        }
        commands
    }

    fn compute_ta_cmd(&self, tag_id: u8) -> Option<TaCmdCePayload> {
        let window = &self.tag_windows[tag_id as usize];
        if window.is_empty() {
            return None;
        }
        let filtered = reject_outliers(window);
        if filtered.is_empty() {
            return None;
        }
        let mean: f64 = filtered.iter().sum::<f64>() / filtered.len() as f64;

        let ta_cmd = compute_new_t_a(mean, self.ul_scs_numerology);

        // ta_cmd_offset_threshold is expressed in the same TA Command units
        // as the offset from the neutral value; below it, do nothing (avoid
        // command churn for measurement noise).
        if (ta_cmd - TA_CMD_NEUTRAL).abs() <= self.cmd_offset_threshold {
            return None;
        }

        Some(TaCmdCePayload {
            tag_id,
            ta_cmd: ta_cmd.clamp(TA_CMD_MIN, TA_CMD_MAX) as u8,
        })
    }
}

/// TS 38.213 §4.2: `new_t_a = round(n_ta_diff * 2^numerology / (16*64)) + 31`.
fn compute_new_t_a(n_ta_diff: f64, numerology: u8) -> i32 {
    let scale = 2f64.powi(numerology as i32);
    (n_ta_diff * scale / (16.0 * 64.0)).round() as i32 + TA_CMD_NEUTRAL
}

/// Population-stddev, ±2σ outlier rejection (§4.N): samples more than two
/// standard deviations from the population mean are dropped before the
/// final averaging pass.
fn reject_outliers(samples: &[Measurement]) -> Vec<f64> {
    let values: Vec<f64> = samples.iter().map(|m| m.n_ta_diff).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return values;
    }
    values.into_iter().filter(|v| (v - mean).abs() <= 2.0 * stddev).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn cfg(period: u32, threshold: i32) -> CoreConfig {
        let mut cfg = CoreConfig::default();
        cfg.ta_measurement_slot_period = period;
        cfg.ta_cmd_offset_threshold = threshold;
        cfg.ta_update_measurement_ul_sinr_threshold = -100.0f32;
        cfg
    }

    #[test]
    fn disabled_when_threshold_negative() {
        let mgr = TaManager::new(&cfg(4, -1));
        assert!(mgr.is_disabled());
    }

    #[test]
    fn no_command_below_window_period() {
        let mut mgr = TaManager::new(&cfg(4, 1));
        mgr.handle_ul_n_ta_update_indication(0, 10.0, 20.0);
        assert_eq!(mgr.handle_slot_indication(), Vec::new());
        assert_eq!(mgr.handle_slot_indication(), Vec::new());
        assert_eq!(mgr.handle_slot_indication(), Vec::new());
    }

    #[test]
    fn low_sinr_samples_are_dropped() {
        let mut mgr = TaManager::new(&cfg(1, 1));
        mgr.handle_ul_n_ta_update_indication(0, 10.0, -200.0);
        assert_eq!(mgr.handle_slot_indication(), Vec::new());
    }

    #[test]
    fn outlier_is_rejected_from_the_average() {
        let samples = vec![
            Measurement { n_ta_diff: 1.0, ul_sinr_db: 0.0 },
            Measurement { n_ta_diff: 1.0, ul_sinr_db: 0.0 },
            Measurement { n_ta_diff: 1.0, ul_sinr_db: 0.0 },
            Measurement { n_ta_diff: 100.0, ul_sinr_db: 0.0 },
        ];
        let filtered = reject_outliers(&samples);
        assert!(!filtered.contains(&100.0));
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn command_emitted_once_average_crosses_threshold() {
        // n_ta_diff=2048, mu=0 => new_t_a = round(2048*1/1024) + 31 = 2 + 31 = 33 (§8 scenario 6).
        let mut mgr = TaManager::new(&cfg(1, 0));
        mgr.handle_ul_n_ta_update_indication(0, 2048.0, 20.0);
        mgr.handle_ul_n_ta_update_indication(0, 2048.0, 20.0);
        let cmds = mgr.handle_slot_indication();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].tag_id, 0);
        assert_eq!(cmds[0].ta_cmd, 33);
    }

    #[test]
    fn numerology_scales_the_command() {
        // Same n_ta_diff at mu=1 doubles the scaled offset: round(2048*2/1024)+31 = 4+31 = 35.
        let mut cfg = cfg(1, 0);
        cfg.ul_scs_numerology = 1;
        let mut mgr = TaManager::new(&cfg);
        mgr.handle_ul_n_ta_update_indication(0, 2048.0, 20.0);
        let cmds = mgr.handle_slot_indication();
        assert_eq!(cmds[0].ta_cmd, 35);
    }

    #[test]
    fn no_command_when_average_within_threshold() {
        let mut mgr = TaManager::new(&cfg(1, 5));
        mgr.handle_ul_n_ta_update_indication(0, 1.0, 20.0);
        assert_eq!(mgr.handle_slot_indication(), Vec::new());
    }

    #[test]
    fn separate_tags_are_tracked_independently() {
        let mut mgr = TaManager::new(&cfg(1, 0));
        mgr.handle_ul_n_ta_update_indication(0, 2048.0, 20.0);
        mgr.handle_ul_n_ta_update_indication(1, -2048.0, 20.0);
        let mut cmds = mgr.handle_slot_indication();
        cmds.sort_by_key(|c| c.tag_id);
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].tag_id, 0);
        assert_eq!(cmds[0].ta_cmd, 33);
        assert_eq!(cmds[1].tag_id, 1);
        assert_eq!(cmds[1].ta_cmd, 29);
    }
}
