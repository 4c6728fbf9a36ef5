// Review API: upload validation, on-disk staging, and the HTTP handler that
// runs the agent pipeline over a staged resume.

pub mod handlers;
pub mod staging;
pub mod validation;
