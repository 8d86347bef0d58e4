//! F1AP (§4.G): the DU-facing control-plane interface between the DU and
//! the CU-CP. Deliberately does not depend on `rrc` - RRC/`CellGroupConfig`
//! bytes are carried opaquely, never decoded at this layer.

pub mod procedures;
pub mod types;
pub mod wire;

pub use procedures::f1_removal::{F1Removal, F1RemovalFailure, F1RemovalRequest, F1RemovalResponse};
pub use procedures::f1_setup::{F1Setup, F1SetupFailure, F1SetupRequest, F1SetupResponse};
pub use procedures::initial_ul_rrc_transfer::{
    InitialUlRrcMessageTransfer, InitialUlRrcMessageTransferIndication,
};
pub use procedures::rrc_message_transfer::{
    DlRrcMessageTransfer, DlRrcMessageTransferIndication, UlRrcMessageTransfer,
    UlRrcMessageTransferIndication,
};
pub use procedures::ue_context::{
    DrbSetupItem, DrbToSetupItem, UeContextFailure, UeContextModification,
    UeContextModificationRequest, UeContextModificationResponse, UeContextRelease,
    UeContextReleaseCommand, UeContextReleaseComplete, UeContextReleaseFailure, UeContextSetup,
    UeContextSetupRequest, UeContextSetupResponse,
};
pub use types::{CellGroupConfig, DuToCuRrcContainer, DuToCuRrcInformation, ServedCellInformation};
