mod error;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use name::ImageName;
pub use traits::{BoxReader, ImageStore, StoredImage};
