use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimReportError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Invalid claim file: {0}")]
    InvalidClaim(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    PdfGeneration(String),

    #[error("No photos found in {0}")]
    NoImagesFound(String),
}

pub type Result<T> = std::result::Result<T, ClaimReportError>;
