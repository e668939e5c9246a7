// Copyright @yucwang 2026

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("bounces must be at least 1, got {0}")]
    Bounces(u32),
    #[error("branch must be at least 1, got {0}")]
    Branch(u32),
    #[error("image must have a non-zero size, got {width}x{height}")]
    EmptyImage { width: usize, height: usize },
    #[error("samples per pixel must be at least 1")]
    SamplesPerPixel,
    #[error("at least one worker is required")]
    Workers,
}

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Parse(String),
    #[error("missing required element or attribute: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to write EXR: {0}")]
    Exr(#[from] exr::error::Error),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
