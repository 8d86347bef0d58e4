//! Cross-protocol IE vocabulary shared by `ngap`, `f1ap`, `e1ap` and `rrc`
//! (§3, §4.F-J): identifiers, PLMN/cell identity, GTP transport addressing,
//! QoS descriptors and security material that more than one application
//! protocol carries verbatim. UE identity spaces belong to `ue-id`, not
//! here - this crate only holds IEs that do not already have a federated
//! home.

pub mod container;
pub mod ids;
pub mod plmn;
pub mod qos;
pub mod security;
pub mod transport;

pub use container::{NasPdu, RrcContainer};
pub use ids::{Cause, CauseGroup, DrbId, GnbCuUpId, GnbDuId, QosFlowIdentifier, SrbId, TransactionId};
pub use plmn::{NrCellIdentity, NrCgi, PlmnIdentity, Tac};
pub use qos::{FiveQi, QosCharacteristics, QosFlowLevelQosParameters, QosFlowSetupRequestItem, Snssai};
pub use security::{SecurityKey, SupportedAlgorithms};
pub use transport::{GtpTeid, GtpTunnel, TransportLayerAddress, UpTransportLayerInformation};
