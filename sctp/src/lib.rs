//! SCTP association management (§4.B): a state machine for the association
//! lifecycle plus an async gateway that drives a real SCTP socket through
//! it. Grounded on `sctp_network_gateway.{h,cpp}`.

pub mod gateway;
pub mod notification;
pub mod state;

pub use gateway::{SctpGateway, SctpGatewayConfig};
pub use state::{AssocEvent, AssocState, AssociationStateMachine};
