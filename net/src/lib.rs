//! The async procedure runtime shared by NGAP, F1AP and E1AP (§4.B/§4.F-H):
//! `Stack` owns the SCTP bindings for one interface and turns
//! request/response/indication traffic into the `Procedure`/`Indication`
//! vocabulary the application-protocol crates define their messages in
//! terms of.

pub mod frame;
pub mod shutdown;
pub mod stack;
pub mod traits;
pub mod transaction;
pub mod transport;

pub use frame::{InboundFrame, PduDispatcher, Responder};
pub use shutdown::ShutdownHandle;
pub use stack::Stack;
pub use traits::{Indication, IndicationHandler, Procedure, RequestError, RequestProvider, SerDes, TransactionId};
pub use transport::{Binding, SctpTransportProvider};
