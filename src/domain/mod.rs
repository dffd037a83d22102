pub mod category;
pub mod file;
pub mod hot;
pub mod item;
pub mod search;

pub use category::{ArchiveCategory, LATEST_CATEGORY};
pub use file::{ArchiveFile, ArchiveMetadata, MetadataResponse};
pub use hot::HotPeriod;
pub use item::ArchiveItem;
pub use search::{SearchDoc, SearchResponse, SearchResponseData};
