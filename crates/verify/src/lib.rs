pub mod pipeline;

pub use pipeline::VerificationPipeline;

pub use evidence::{ClaimStatus, TrustFilter};
pub use judge::{ClaimResult, SourceType};
