pub mod bearer_context;
pub mod cu_up_setup;
