//! DU processor (§4.K): the DU-local cell registry and UE manager.

pub mod cells;
pub mod ue_manager;

pub use cells::{CellConfig, CellRegistry, DuCellIndex, MAX_DU_CELLS};
pub use ue_manager::{UeHandle, UeManager};
