use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode source image: {0}")]
    DecodeError(String),

    #[error("Unsupported color model: {0} channels per pixel")]
    UnsupportedColorModel(usize),

    #[error("Unknown conversion mode: {0:?}")]
    UnknownTransformMode(String),

    #[error("Unsupported feature for {format}: {feature}")]
    UnsupportedFormatFeature { format: String, feature: String },

    #[error("Failed to encode output image: {0}")]
    EncodeIoError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid preset file: {0}")]
    InvalidPreset(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
