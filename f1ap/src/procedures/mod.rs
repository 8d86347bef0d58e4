pub mod f1_removal;
pub mod f1_setup;
pub mod initial_ul_rrc_transfer;
pub mod rrc_message_transfer;
pub mod ue_context;
