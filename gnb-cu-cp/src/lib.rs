//! gNB-CU-CP (§4.G): the control-plane signaling node terminating F1-C
//! towards the DU, E1 towards the CU-UP, and NG-C towards the AMF. Owns UE
//! RRC state, DRB bookkeeping, and the cell registry inherited from the DU
//! crate's `CellRegistry` type.

pub mod config;
pub mod handlers;
pub mod worker;
pub mod workflows;

pub use config::Config;
pub use worker::Worker;
