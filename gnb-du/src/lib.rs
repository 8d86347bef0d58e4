//! gNB-DU (§4.K-O): the DU-high role on the F1 interface plus the MAC and
//! scheduler bookkeeping underneath it. Plays the F1-C client mirrored
//! against `gnb_cu_cp`'s server role, and drives per-UE logical-channel and
//! HARQ state on each slot tick - there is no PHY or real radio below it.

pub mod config;
pub mod handlers;
pub mod slot_worker;
pub mod worker;

pub use config::Config;
pub use worker::Worker;
