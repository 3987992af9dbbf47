//! Asset Loading
//!
//! Parses mesh and image files into CPU-side buffers. Uploading to the GPU
//! happens once on the render thread, in the renderer that owns the asset.

pub mod obj;
pub mod texture;

use std::path::PathBuf;

use thiserror::Error;

pub use obj::{Mesh, load_mesh, parse_obj};
pub use texture::{Texture, decode_texture, load_texture};

/// Missing or corrupt asset. The renderer that needed it is left unusable
/// for the session.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

impl AssetError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        AssetError::Parse {
            line,
            message: message.into(),
        }
    }
}
