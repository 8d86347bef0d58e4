//! Outbound workflows the CU-CP drives itself, as opposed to the reactive
//! dispatch in `handlers` that answers messages the DU/CU-UP/AMF send in.
//! NG Setup is the only one of these: everything else in the UE lifecycle
//! (Initial UE Message, Initial Context Setup, PDU Session Resource Setup)
//! is driven by an inbound PDU and lives in `handlers` next to the
//! dispatcher that received it.

mod ng_setup;
