//! NGAP (§4.F): the gNB-CU-CP-facing control-plane interface to the AMF.

pub mod procedures;
pub mod types;
pub mod wire;

pub use procedures::initial_context_setup::{
    InitialContextSetup, InitialContextSetupFailure, InitialContextSetupRequest,
    InitialContextSetupResponse, UeSecurityCapabilities,
};
pub use procedures::initial_ue_message::{InitialUeMessage, InitialUeMessageIndication};
pub use procedures::nas_transport::{
    DlNasTransport, DlNasTransportIndication, UlNasTransport, UlNasTransportIndication,
};
pub use procedures::ng_setup::{NgSetup, NgSetupFailure, NgSetupRequest, NgSetupResponse, PagingDrx};
pub use procedures::pdu_session_resource_setup::{
    PduSessionResourceSetup, PduSessionResourceSetupFailure, PduSessionResourceSetupItem,
    PduSessionResourceSetupRequest, PduSessionResourceSetupResponse,
};
pub use types::{GlobalRanNodeId, SupportedTaItem};
