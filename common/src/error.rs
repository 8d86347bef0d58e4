//! The shared `<ErrorKind>` vocabulary from the error handling design.
//!
//! Data-structure crates (`ue-id`, `mac`, `rrc`'s DRB manager, ...) return
//! this closed enum so callers can `match` on the kind; procedure code at
//! the NGAP/F1AP/E1AP boundary converts it into `anyhow::Error` with
//! `anyhow::Error::from` (via the `std::error::Error` impl below), the same
//! way `ng_setup.rs` turns a connect failure into `anyhow!(...)`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier is already present in a registry.
    Duplicate,
    /// An identifier has no registered handle.
    NotFound,
    /// A peer reused an identifier inconsistently with what was learned before.
    IdentityMismatch,
    /// No UE slot available in the CU-CP or DU UE table.
    NoUeSlots,
    /// No free DU UE index available.
    NoFreeUeIndex,
    /// A C-RNTI is already in use at the DU.
    DuplicateRnti,
    /// The DU's cell registry is already at MAX_DU_CELLS.
    TooManyCells,
    /// All 32 DRB-IDs for a UE are in use.
    DrbsFull,
    /// ASN.1 decode failure.
    DecodeError,
    /// ASN.1 encode failure.
    EncodeError,
    /// A procedure's guard timer expired.
    Timeout,
    /// The peer returned an explicit failure PDU.
    PeerFailure(String),
    /// A QoS flow's 5QI could not be derived.
    InvalidQoS,
    /// No PDCP configuration is provisioned for a 5QI.
    UnknownFiveQi,
    /// Security algorithm negotiation with the UE failed.
    SecurityNegotiationFailed,
    /// The SCTP association was lost or a send failed.
    Transport,
    /// A precondition for the requested operation was not yet met.
    NotReady,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Duplicate => write!(f, "duplicate identifier"),
            CoreError::NotFound => write!(f, "identifier not found"),
            CoreError::IdentityMismatch => write!(f, "identity mismatch"),
            CoreError::NoUeSlots => write!(f, "no UE slots available"),
            CoreError::NoFreeUeIndex => write!(f, "no free UE index"),
            CoreError::DuplicateRnti => write!(f, "duplicate C-RNTI"),
            CoreError::TooManyCells => write!(f, "cell registry is full"),
            CoreError::DrbsFull => write!(f, "all DRB-IDs in use"),
            CoreError::DecodeError => write!(f, "ASN.1 decode error"),
            CoreError::EncodeError => write!(f, "ASN.1 encode error"),
            CoreError::Timeout => write!(f, "procedure timed out"),
            CoreError::PeerFailure(cause) => write!(f, "peer failure: {cause}"),
            CoreError::InvalidQoS => write!(f, "invalid QoS flow characteristics"),
            CoreError::UnknownFiveQi => write!(f, "no PDCP config for 5QI"),
            CoreError::SecurityNegotiationFailed => write!(f, "security negotiation failed"),
            CoreError::Transport => write!(f, "transport failure"),
            CoreError::NotReady => write!(f, "precondition not met"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
