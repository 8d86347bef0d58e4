//! gNB-CU-UP (§4.H): the CU-UP role on the E1 interface. Attaches to the
//! CU-CP's E1 listener and answers Bearer Context Setup/Modification with
//! synthetic DL GTP tunnels - the control-plane half of a user-plane node
//! this workspace does not otherwise implement.

pub mod config;
pub mod handlers;
pub mod worker;

pub use config::Config;
pub use worker::Worker;
