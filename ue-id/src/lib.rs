//! UE identifier federation (§3, §4.D): the newtypes for every ID space a
//! UE participates in, and the bidirectional registries that translate
//! between them.

pub mod ids;
pub mod registry;

pub use ids::{
    AmfUeNgapId, CRnti, CuCpUeIndex, DuUeIndex, GnbCuUeF1apId, GnbDuUeF1apId, RanUeNgapId,
    MAX_DU_UES, MAX_UE_PER_DU,
};
pub use registry::{CuUeRegistry, DuUeRegistry};
