//! MAC-layer bookkeeping shared by the scheduler: DL/UL logical-channel
//! buffer-state management, subPDU packing, and timing-advance adaptation
//! (§4.L, §4.M, §4.N).

pub mod dl;
pub mod lcid_dl_sch;
pub mod pdu_format;
pub mod ta;
pub mod ul;

pub use dl::DlLogicalChannelManager;
pub use lcid_dl_sch::{CePayload, DlMsgLcInfo, LcidDlSch, PendingCe, TaCmdCePayload};
pub use ta::TaManager;
pub use ul::UlLogicalChannelManager;
