pub mod dump;
pub mod format;
pub mod store;

pub use dump::render_dump;
pub use format::{StoreDocument, FORMAT_TAG, FORMAT_VERSION};
pub use store::{novel, titles, RecordStore};
