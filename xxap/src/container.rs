//! Opaque byte-container IEs that F1AP/NGAP pass through without
//! interpreting - the RRC/NAS payload belongs to the `rrc` crate and the
//! core respectively, not to the transport protocol carrying it.

/// An RRC PDU (CCCH or, once SRB1 exists, PDCP-encapsulated DCCH) as
/// carried inside an F1AP RRC Message Transfer IE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcContainer(pub Vec<u8>);

/// A NAS-PDU IE (opaque to F1AP/RRC, meaningful only to NGAP and the core).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasPdu(pub Vec<u8>);
