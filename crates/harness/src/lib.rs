pub mod drafts;
pub mod fixture;

pub use fixture::TestLog;
