//! E1AP UE identifiers (TS 38.463). Not part of the UE-identity table
//! every other interface's ids belong to (§3) - these correlate a UE only
//! across the CU-CP/CU-UP split, so they live in `e1ap`, not `ue-id`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GnbCuCpUeE1apId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GnbCuUpUeE1apId(pub u32);
