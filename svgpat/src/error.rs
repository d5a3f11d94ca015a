//! Error type for the conversion pipeline.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Every variant here is fatal for a conversion run: each one means the
//! active coordinate mapping, and so every point after it, would be wrong.
//! Recoverable input problems never become a `ConvertError`; they are
//! logged through `tracing` and skipped at the place they occur.

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("malformed length `{value}`")]
    MalformedLength { value: String },

    #[error("unsupported unit in length `{value}` ({unit} units are not supported)")]
    UnsupportedUnit { value: String, unit: &'static str },

    #[error("malformed viewBox `{value}`")]
    MalformedViewBox { value: String },

    #[error("malformed transform `{value}`: {reason}")]
    MalformedTransform { value: String, reason: String },

    #[error("unsupported transform operation `{op}` in `{value}`")]
    UnsupportedTransformOp { op: &'static str, value: String },

    #[error("unsupported path command `{command}` at offset {offset}")]
    UnsupportedPathCommand { command: char, offset: usize },

    #[error("malformed number at offset {offset} in path data near `{near}`")]
    MalformedNumber { offset: usize, near: String },

    #[error("coordinate {value}in is too large to write as a pattern coordinate")]
    CoordinateOutOfRange { value: f64 },

    #[error("XML error: {0}")]
    Xml(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ConvertError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}
