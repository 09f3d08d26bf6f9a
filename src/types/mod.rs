//! Public types for the mdmint API.

mod conversion;
mod download;

pub use conversion::{ConversionInput, ConversionResponse};
pub use download::DownloadOptions;
