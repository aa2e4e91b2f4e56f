// Keyword analysis: matching job phrases against a resume and filtering the
// missing ones down to what a candidate can act on.

pub mod analysis;
pub mod filter;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod prompts;
