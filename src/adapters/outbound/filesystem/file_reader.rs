use crate::ports::outbound::BomReader;
use crate::shared::error::SbomError;
use crate::shared::security::{check_input_file, MAX_FILE_SIZE};
use crate::shared::Result;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// FileSystemReader adapter for reading an input document from disk
///
/// The path is validated before any bytes are read: symbolic links,
/// non-regular files and files above `MAX_FILE_SIZE` are rejected.
pub struct FileSystemReader {
    input_path: PathBuf,
}

impl FileSystemReader {
    pub fn new(input_path: PathBuf) -> Self {
        Self { input_path }
    }
}

impl BomReader for FileSystemReader {
    fn read_bom(&self) -> Result<(Vec<u8>, Option<PathBuf>)> {
        if !self.input_path.exists() {
            return Err(SbomError::FileReadError {
                path: self.input_path.clone(),
                details: "File does not exist".to_string(),
            }
            .into());
        }
        check_input_file(&self.input_path, MAX_FILE_SIZE)?;

        let content = fs::read(&self.input_path).map_err(|e| SbomError::FileReadError {
            path: self.input_path.clone(),
            details: e.to_string(),
        })?;
        log::debug!(
            "Read {} bytes from {}",
            content.len(),
            self.input_path.display()
        );
        Ok((content, Some(self.input_path.clone())))
    }
}

/// StdinReader adapter for reading an input document from standard input
///
/// There is no filename to detect the format from, so callers must supply
/// the input format explicitly.
pub struct StdinReader;

impl StdinReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

impl BomReader for StdinReader {
    fn read_bom(&self) -> Result<(Vec<u8>, Option<PathBuf>)> {
        let mut content = Vec::new();
        io::stdin()
            .lock()
            .take(MAX_FILE_SIZE + 1)
            .read_to_end(&mut content)
            .map_err(|e| anyhow::anyhow!("Failed to read from stdin: {}", e))?;

        if content.len() as u64 > MAX_FILE_SIZE {
            anyhow::bail!(
                "Security: standard input exceeds the maximum allowed size of {} bytes",
                MAX_FILE_SIZE
            );
        }
        Ok((content, None))
    }
}
