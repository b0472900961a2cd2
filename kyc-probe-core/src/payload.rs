//! Document payload attached to every submission
//!
//! The payload is built once and then shared read-only by every concurrent
//! upload. It must pass the backend's content-type check; a rejected file
//! would make every submission fail for reasons unrelated to concurrency.

use bytes::Bytes;
use std::fmt;
use std::path::Path;

use crate::errors::PayloadError;

/// Minimal 1x1 RGB PNG: signature, IHDR, IDAT and IEND with valid CRCs
const MINIMAL_PNG: [u8; 69] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, // signature
    0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00,
    0x90, 0x77, 0x53, 0xde,
    0x00, 0x00, 0x00, 0x0c, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x08, 0xd7, 0x63, 0xf8, 0xff, 0xff, 0x3f, 0x00, 0x05, 0xfe, 0x02, 0xfe,
    0xdc, 0xcc, 0x59, 0xe7,
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, // IEND
    0xae, 0x42, 0x60, 0x82,
];

const BUILTIN_FILE_NAME: &str = "test_doc.png";

/// Immutable upload body plus the metadata the multipart part needs
#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    file_name: String,
    content_type: &'static str,
    bytes: Bytes,
}

impl Payload {
    /// The builtin 1x1 PNG
    pub fn builtin() -> Self {
        Self {
            file_name: BUILTIN_FILE_NAME.to_string(),
            content_type: "image/png",
            bytes: Bytes::from_static(&MINIMAL_PNG),
        }
    }

    /// Read a real document once into memory
    pub fn from_file(path: &Path) -> Result<Self, PayloadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let content_type =
            content_type_for(&extension).ok_or_else(|| PayloadError::UnsupportedType {
                path: path.to_path_buf(),
                extension: extension.clone(),
            })?;

        let data = std::fs::read(path).map_err(|source| PayloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if data.is_empty() {
            return Err(PayloadError::Empty(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| BUILTIN_FILE_NAME.to_string());

        Ok(Self {
            file_name,
            content_type,
            bytes: Bytes::from(data),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Cheap handle onto the shared buffer
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes, {})",
            self.file_name,
            self.bytes.len(),
            self.content_type
        )
    }
}

/// Build the run's payload: the configured file if any, else the builtin PNG
pub fn build_payload(path: Option<&Path>) -> Result<Payload, PayloadError> {
    match path {
        Some(path) => Payload::from_file(path),
        None => Ok(Payload::builtin()),
    }
}

fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
