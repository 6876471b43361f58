//! Delivery seam for exported images.
//!
//! The editor hands an [`EncodedImage`] to an [`OutputSink`] and the host
//! decides where the bytes go. [`FileOutputSink`] writes them to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::EncodedImage;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output rejected: {reason}")]
    Rejected { reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Receives finished exports.
pub trait OutputSink {
    fn deliver(&mut self, image: &EncodedImage) -> OutputResult<()>;
}

/// Writes every delivered export to a fixed path, creating parent
/// directories as needed and overwriting earlier deliveries.
#[derive(Debug, Clone)]
pub struct FileOutputSink {
    target: PathBuf,
}

impl FileOutputSink {
    pub const fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl OutputSink for FileOutputSink {
    fn deliver(&mut self, image: &EncodedImage) -> OutputResult<()> {
        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.target, &image.bytes)?;
        tracing::debug!(
            path = %self.target.display(),
            bytes = image.bytes.len(),
            "export written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ExportFormat;

    fn encoded(bytes: &[u8]) -> EncodedImage {
        EncodedImage {
            format: ExportFormat::Png,
            bytes: bytes.to_vec(),
        }
    }

    fn temp_target(name: &str) -> PathBuf {
        let mut target = std::env::temp_dir();
        target.push("sseuk-output-tests");
        target.push(name);
        let _ = fs::remove_file(&target);
        target
    }

    #[test]
    fn file_sink_writes_bytes_to_the_target_path() {
        let target = temp_target("delivered.png");
        let mut sink = FileOutputSink::new(target.clone());

        sink.deliver(&encoded(b"payload")).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"payload");
        fs::remove_file(&target).unwrap();
    }

    #[test]
    fn file_sink_overwrites_previous_deliveries() {
        let target = temp_target("overwritten.png");
        let mut sink = FileOutputSink::new(target.clone());

        sink.deliver(&encoded(b"first")).unwrap();
        sink.deliver(&encoded(b"second")).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"second");
        fs::remove_file(&target).unwrap();
    }
}
