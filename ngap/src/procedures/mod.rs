pub mod initial_context_setup;
pub mod initial_ue_message;
pub mod nas_transport;
pub mod ng_setup;
pub mod pdu_session_resource_setup;
