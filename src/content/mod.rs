//! Protected course material: examples list and uploaded files

pub mod examples;
pub mod uploads;

pub use examples::{Example, ExampleCatalog};
pub use uploads::{stored_name, StoredUpload, UploadStore, UPLOADS_ROUTE};
