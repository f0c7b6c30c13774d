pub mod handlers;
pub mod pipeline;
