pub mod form;
pub mod queue_handlers;
pub mod tool_handlers;
