// Resume Reconstruction: one edit pass over the original resume, resolved into a
// single canonical plain-text resume and checked for fidelity and keyword coverage.

pub mod edit_result;
pub mod handlers;
pub mod prompts;
pub mod reconstructor;
pub mod serializer;
pub mod verification;
