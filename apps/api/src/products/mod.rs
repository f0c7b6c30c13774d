pub mod handlers;
pub mod insights;
