mod error;

pub mod upload;

pub use error::StorageError;
pub use upload::{
    ALLOWED_EXTENSIONS, StoredUpload, TempUploadStore, image_extension, is_allowed_image,
};
