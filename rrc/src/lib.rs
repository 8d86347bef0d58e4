//! RRC UE state machine and DRB manager (§4.I, §4.J).

pub mod cell_group_config;
pub mod drb_manager;
pub mod messages;
pub mod ue;

pub use cell_group_config::{CellGroupConfig, CellGroupId};
pub use drb_manager::{DrbContext, DrbManager, SdapConfig};
pub use messages::{
    DlCcchMessage, DlDcchMessage, DlInformationTransfer, EstablishmentCause, RrcReconfiguration,
    RrcReconfigurationComplete, RrcSetup, RrcSetupComplete, RrcSetupRequest, RrcTransactionIdentifier,
    SecurityModeCommand, SecurityModeComplete, UlCcchMessage, UlDcchMessage, UlInformationTransfer,
};
pub use ue::{RrcUe, RrcUeState, SrbState};
