//! Association state machine (§4.B): pure transition logic, independent of
//! the actual socket plumbing in `gateway`. Grounded on the state shape
//! implied by `sctp_network_gateway.h`'s bind/listen/connect/receive split
//! and libc SCTP notification events (`SCTP_ASSOC_CHANGE`).

use common::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssocState {
    Closed,
    Bound,
    Listening,
    Connecting,
    Established,
    ShuttingDown,
}

/// Translated form of an `SCTP_ASSOC_CHANGE` / `SCTP_SHUTDOWN_EVENT`
/// notification, as handed to `handle_notification` in the original
/// gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssocEvent {
    CommUp,
    CommLost,
    Restart,
    ShutdownComplete,
    CantStartAssoc,
}

pub struct AssociationStateMachine {
    state: AssocState,
}

impl Default for AssociationStateMachine {
    fn default() -> Self {
        AssociationStateMachine { state: AssocState::Closed }
    }
}

impl AssociationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AssocState {
        self.state
    }

    pub fn on_bind(&mut self) -> Result<(), CoreError> {
        match self.state {
            AssocState::Closed => {
                self.state = AssocState::Bound;
                Ok(())
            }
            _ => Err(CoreError::NotReady),
        }
    }

    pub fn on_listen(&mut self) -> Result<(), CoreError> {
        match self.state {
            AssocState::Bound => {
                self.state = AssocState::Listening;
                Ok(())
            }
            _ => Err(CoreError::NotReady),
        }
    }

    pub fn on_connect_attempt(&mut self) -> Result<(), CoreError> {
        match self.state {
            AssocState::Closed | AssocState::Bound => {
                self.state = AssocState::Connecting;
                Ok(())
            }
            _ => Err(CoreError::NotReady),
        }
    }

    /// Apply a notification event, returning whether the association is
    /// now usable for data transfer (i.e. just reached `Established`).
    pub fn on_event(&mut self, event: AssocEvent) -> Result<bool, CoreError> {
        match (self.state, event) {
            (AssocState::Connecting | AssocState::Listening, AssocEvent::CommUp) => {
                self.state = AssocState::Established;
                Ok(true)
            }
            (AssocState::Established, AssocEvent::Restart) => Ok(false),
            (AssocState::Established, AssocEvent::ShutdownComplete) => {
                self.state = AssocState::ShuttingDown;
                Ok(false)
            }
            (_, AssocEvent::CommLost) => {
                self.state = AssocState::Closed;
                Ok(false)
            }
            (AssocState::Connecting, AssocEvent::CantStartAssoc) => {
                self.state = AssocState::Closed;
                Ok(false)
            }
            (AssocState::ShuttingDown, AssocEvent::CommLost | AssocEvent::ShutdownComplete) => {
                self.state = AssocState::Closed;
                Ok(false)
            }
            _ => Err(CoreError::NotReady),
        }
    }

    pub fn is_established(&self) -> bool {
        self.state == AssocState::Established
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn client_happy_path() {
        let mut sm = AssociationStateMachine::new();
        sm.on_connect_attempt().unwrap();
        assert_eq!(sm.state(), AssocState::Connecting);
        let became_established = sm.on_event(AssocEvent::CommUp).unwrap();
        assert!(became_established);
        assert!(sm.is_established());
    }

    #[test]
    fn server_happy_path() {
        let mut sm = AssociationStateMachine::new();
        sm.on_bind().unwrap();
        sm.on_listen().unwrap();
        assert_eq!(sm.state(), AssocState::Listening);
        sm.on_event(AssocEvent::CommUp).unwrap();
        assert!(sm.is_established());
    }

    #[test]
    fn comm_lost_returns_to_closed_from_any_state() {
        let mut sm = AssociationStateMachine::new();
        sm.on_connect_attempt().unwrap();
        sm.on_event(AssocEvent::CommUp).unwrap();
        sm.on_event(AssocEvent::CommLost).unwrap();
        assert_eq!(sm.state(), AssocState::Closed);
    }

    #[test]
    fn connect_after_listen_is_rejected() {
        let mut sm = AssociationStateMachine::new();
        sm.on_bind().unwrap();
        sm.on_listen().unwrap();
        assert!(sm.on_connect_attempt().is_err());
    }

    #[test]
    fn graceful_shutdown_sequence() {
        let mut sm = AssociationStateMachine::new();
        sm.on_connect_attempt().unwrap();
        sm.on_event(AssocEvent::CommUp).unwrap();
        sm.on_event(AssocEvent::ShutdownComplete).unwrap();
        assert_eq!(sm.state(), AssocState::ShuttingDown);
        sm.on_event(AssocEvent::CommLost).unwrap();
        assert_eq!(sm.state(), AssocState::Closed);
    }
}
