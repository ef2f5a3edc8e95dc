pub mod codec;
pub mod error;
pub mod ids;
pub mod image;
pub mod query;
pub mod record;
pub mod self_exam;

pub use codec::PersistedRow;
pub use error::CoreError;
pub use ids::RecordId;
pub use image::ImageData;
pub use query::{RecordFilter, SortDirection};
pub use record::ScanRecord;
pub use self_exam::SelfExamFlag;
