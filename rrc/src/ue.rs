//! RRC UE state machine (§4.I).
//!
//! ```text
//! idle -- RrcSetupRequest --> awaiting_setup_complete
//!    |                             |-- timer expires --> release
//!    |                             `-- RrcSetupComplete --> connected
//! connected
//!    |-- InitialContextSetup --> await_smc_complete
//!    |      |-- timer --> release
//!    |      `-- SMC complete --> connected (security enabled on SRB1)
//!    |-- RrcReconfiguration --> await_reconfig_complete
//!    |      |-- timer --> release
//!    |      `-- complete --> connected
//!    `-- release --> terminal
//! ```

use common::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrcUeState {
    Idle,
    AwaitingSetupComplete,
    Connected,
    AwaitSmcComplete,
    AwaitReconfigComplete,
    Released,
}

/// Per-SRB notifier activation (§4.I "SRB activation"). The notifiers
/// themselves live above this crate; this only tracks which are wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrbState {
    pub tx_active: bool,
    pub rx_active: bool,
    pub security_tx_active: bool,
    pub security_rx_active: bool,
}

pub struct RrcUe {
    state: RrcUeState,
    srb0: SrbState,
    srb1: Option<SrbState>,
    next_transaction_id: u8,
}

impl RrcUe {
    /// SRB0 is created at UE creation with only a TX notifier into F1.
    pub fn new() -> Self {
        RrcUe {
            state: RrcUeState::Idle,
            srb0: SrbState { tx_active: true, rx_active: false, ..Default::default() },
            srb1: None,
            next_transaction_id: 0,
        }
    }

    pub fn state(&self) -> RrcUeState {
        self.state
    }

    pub fn srb0(&self) -> SrbState {
        self.srb0
    }

    pub fn srb1(&self) -> Option<SrbState> {
        self.srb1
    }

    fn next_transaction_id(&mut self) -> u8 {
        let id = self.next_transaction_id;
        self.next_transaction_id = (self.next_transaction_id + 1) % 4;
        id
    }

    /// SRB1 is created with both TX and RX notifiers, security initially
    /// inert.
    pub fn on_rrc_setup_request(&mut self) -> CoreResult<u8> {
        if self.state != RrcUeState::Idle {
            return Err(CoreError::NotReady);
        }
        self.srb1 = Some(SrbState { tx_active: true, rx_active: true, ..Default::default() });
        self.state = RrcUeState::AwaitingSetupComplete;
        Ok(self.next_transaction_id())
    }

    pub fn on_rrc_setup_complete(&mut self) -> CoreResult<()> {
        if self.state != RrcUeState::AwaitingSetupComplete {
            return Err(CoreError::NotReady);
        }
        self.state = RrcUeState::Connected;
        Ok(())
    }

    pub fn on_initial_context_setup(&mut self) -> CoreResult<u8> {
        if self.state != RrcUeState::Connected {
            return Err(CoreError::NotReady);
        }
        self.state = RrcUeState::AwaitSmcComplete;
        Ok(self.next_transaction_id())
    }

    /// Security is enabled by the SMC procedure: from this point SRB1 PDUs
    /// are integrity-protected and ciphered.
    pub fn on_security_mode_complete(&mut self) -> CoreResult<()> {
        if self.state != RrcUeState::AwaitSmcComplete {
            return Err(CoreError::NotReady);
        }
        if let Some(srb1) = &mut self.srb1 {
            srb1.security_tx_active = true;
            srb1.security_rx_active = true;
        }
        self.state = RrcUeState::Connected;
        Ok(())
    }

    pub fn on_rrc_reconfiguration(&mut self) -> CoreResult<u8> {
        if self.state != RrcUeState::Connected {
            return Err(CoreError::NotReady);
        }
        self.state = RrcUeState::AwaitReconfigComplete;
        Ok(self.next_transaction_id())
    }

    pub fn on_reconfiguration_complete(&mut self) -> CoreResult<()> {
        if self.state != RrcUeState::AwaitReconfigComplete {
            return Err(CoreError::NotReady);
        }
        self.state = RrcUeState::Connected;
        Ok(())
    }

    /// The guard timer for any of the `await_*` states, or an explicit
    /// release request, both land in `Released` - a terminal state.
    pub fn on_timer_expired_or_release(&mut self) -> CoreResult<()> {
        if self.state == RrcUeState::Released {
            return Err(CoreError::NotReady);
        }
        self.state = RrcUeState::Released;
        Ok(())
    }
}

impl Default for RrcUe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn happy_path_reaches_connected_with_both_srbs_active() {
        let mut ue = RrcUe::new();
        assert!(ue.srb0().tx_active);
        ue.on_rrc_setup_request().unwrap();
        assert_eq!(ue.state(), RrcUeState::AwaitingSetupComplete);
        assert!(ue.srb1().unwrap().tx_active);
        ue.on_rrc_setup_complete().unwrap();
        assert_eq!(ue.state(), RrcUeState::Connected);
    }

    #[test]
    fn security_mode_complete_activates_srb1_security() {
        let mut ue = RrcUe::new();
        ue.on_rrc_setup_request().unwrap();
        ue.on_rrc_setup_complete().unwrap();
        ue.on_initial_context_setup().unwrap();
        assert!(!ue.srb1().unwrap().security_tx_active);
        ue.on_security_mode_complete().unwrap();
        assert!(ue.srb1().unwrap().security_tx_active);
        assert_eq!(ue.state(), RrcUeState::Connected);
    }

    #[test]
    fn reconfiguration_round_trip_returns_to_connected() {
        let mut ue = RrcUe::new();
        ue.on_rrc_setup_request().unwrap();
        ue.on_rrc_setup_complete().unwrap();
        ue.on_rrc_reconfiguration().unwrap();
        assert_eq!(ue.state(), RrcUeState::AwaitReconfigComplete);
        ue.on_reconfiguration_complete().unwrap();
        assert_eq!(ue.state(), RrcUeState::Connected);
    }

    #[test]
    fn timer_expiry_during_any_await_state_releases() {
        let mut ue = RrcUe::new();
        ue.on_rrc_setup_request().unwrap();
        ue.on_timer_expired_or_release().unwrap();
        assert_eq!(ue.state(), RrcUeState::Released);
    }

    #[test]
    fn setup_complete_out_of_order_is_rejected() {
        let mut ue = RrcUe::new();
        assert_eq!(ue.on_rrc_setup_complete(), Err(CoreError::NotReady));
    }

    #[test]
    fn transaction_ids_cycle_mod_four() {
        let mut ue = RrcUe::new();
        let t1 = ue.on_rrc_setup_request().unwrap();
        ue.on_rrc_setup_complete().unwrap();
        let t2 = ue.on_initial_context_setup().unwrap();
        assert_ne!(t1, t2);
        assert!(t2 < 4);
    }
}
