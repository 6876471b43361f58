pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod font;
pub mod geometry;
pub mod logging;
pub mod output;
pub mod raster;
pub mod state;
pub use error::{EditorError, EditorResult};
