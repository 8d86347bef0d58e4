//! E1AP (§4.H): the CU-UP-facing control-plane interface between the
//! CU-CP and the CU-UP.

pub mod ids;
pub mod procedures;
pub mod wire;

pub use ids::{GnbCuCpUeE1apId, GnbCuUpUeE1apId};
pub use procedures::bearer_context::{
    BearerContextFailure, BearerContextModification, BearerContextModificationRequest,
    BearerContextModificationResponse, BearerContextSetup, BearerContextSetupRequest,
    BearerContextSetupResponse, DrbSetupItem, PduSessionSetupItem, PduSessionToSetupItem,
};
pub use procedures::cu_up_setup::{
    GnbCuUpE1Setup, GnbCuUpE1SetupFailure, GnbCuUpE1SetupRequest, GnbCuUpE1SetupResponse,
};
