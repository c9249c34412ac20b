//! Error types for `LuxeVault`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `LuxeVault` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file selected for upload could not be read.
    #[error("cannot read {path}: {message}")]
    UnreadableFile {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },

    // ==================== HTTP Errors ====================
    /// The remote service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The response body or error message.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Transport(String),

    // ==================== Media Host Errors ====================
    /// The media host rejected an upload.
    #[error("{message}")]
    UploadRejected {
        /// The message reported by the media host.
        message: String,
    },

    /// The media host response was missing a required field.
    #[error("media host response missing `{field}`")]
    UploadResponseIncomplete {
        /// The missing field name.
        field: &'static str,
    },

    // ==================== Store Errors ====================
    /// The store answered a push without assigning a key.
    #[error("store did not assign a key to the new record")]
    MissingKey,

    /// The live subscription stream broke.
    #[error("subscription error: {0}")]
    Subscription(String),

    // ==================== Validation Errors ====================
    /// The upload form failed client-side validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ==================== Session Errors ====================
    /// The credential pair did not match.
    #[error("Authorization Failed.")]
    AuthorizationFailed,

    // ==================== glTF Errors ====================
    /// Failed to load or parse a glTF file.
    #[error("failed to load glTF: {message}")]
    GltfLoadFailed {
        /// The error message from the glTF parser.
        message: String,
    },

    /// The model needs a mesh compression extension that cannot be decoded.
    #[error("models using {extension} are not supported")]
    UnsupportedCompression {
        /// The required glTF extension name.
        extension: String,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== Configuration Errors ====================
    /// The configuration directory could not be determined.
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Client-side validation failures of the admin upload form.
///
/// The `Display` strings are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name, model file, or thumbnail file is missing.
    #[error("Asset Title, 3D Model, and Thumbnail are all required.")]
    MissingFields,

    /// The selected model file is not a `.glb`.
    #[error("3D Asset must be a .glb file.")]
    WrongModelExtension,

    /// The model is compressed with an extension the viewer cannot decode.
    #[error("3D Asset uses {extension}, which the viewer cannot display. Export it uncompressed.")]
    CompressedModel {
        /// The required glTF extension name.
        extension: String,
    },
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                Error::HttpStatus { status, message: body }
            }
            ureq::Error::Transport(transport) => Error::Transport(transport.to_string()),
        }
    }
}

impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::GltfLoadFailed {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for `LuxeVault` operations.
pub type Result<T> = std::result::Result<T, Error>;
