//! Uploaded image handling
//!
//! Validates that uploaded bytes are a real image and prepares them for the
//! model request. Images are never resized or otherwise altered.

pub mod decoder;

pub use decoder::decode_upload;

/// Raw upload as received from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// An upload that decoded successfully, in a format the model accepts.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}
