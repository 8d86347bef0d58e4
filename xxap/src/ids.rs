//! Identifiers and correlation tags shared across NGAP, F1AP and E1AP IEs
//! (§3, §4.F-H) that are not one of the UE-identity spaces `ue-id` owns.

/// Procedure transaction id carried *inside* an NGAP/F1AP/E1AP PDU (e.g.
/// `F1SetupRequest.transaction_id`). Distinct from `net::TransactionId`,
/// which only correlates a request with its response at the wire-framing
/// layer and never appears inside an encoded IE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u8);

/// gNB-DU-ID: 36-bit (TS 38.473), held here as a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GnbDuId(pub u64);

/// gNB-CU-UP-ID: 36-bit (TS 38.463).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GnbCuUpId(pub u64);

/// Signalling Radio Bearer id, 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SrbId(pub u8);

/// Data Radio Bearer id, 1..=32 (§4.J).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrbId(pub u8);

/// QoS Flow Identifier, 0..=63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QosFlowIdentifier(pub u8);

/// Cause IE: coarse (group, value) pair, matching the shape every
/// NGAP/F1AP/E1AP `*Cause` IE shares without reproducing every enumerated
/// cause value from the three specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseGroup {
    RadioNetwork,
    Transport,
    Protocol,
    Misc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cause {
    pub group: CauseGroup,
    pub value: u8,
}

impl Cause {
    pub const RADIO_UNSPECIFIED: Cause = Cause { group: CauseGroup::RadioNetwork, value: 0 };
    pub const TRANSPORT_UNSPECIFIED: Cause = Cause { group: CauseGroup::Transport, value: 0 };
    pub const PROTOCOL_UNSPECIFIED: Cause = Cause { group: CauseGroup::Protocol, value: 0 };
    pub const MISC_UNSPECIFIED: Cause = Cause { group: CauseGroup::Misc, value: 0 };
}
