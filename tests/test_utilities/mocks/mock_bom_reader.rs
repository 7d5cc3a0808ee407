use bom_convert::prelude::*;
use std::path::PathBuf;

/// Mock BomReader for testing that serves an in-memory document
pub struct MockBomReader {
    content: Vec<u8>,
    filename: Option<PathBuf>,
    should_fail: bool,
}

impl MockBomReader {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            filename: None,
            should_fail: false,
        }
    }

    pub fn named(mut self, filename: &str) -> Self {
        self.filename = Some(PathBuf::from(filename));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            content: Vec::new(),
            filename: None,
            should_fail: true,
        }
    }
}

impl BomReader for MockBomReader {
    fn read_bom(&self) -> Result<(Vec<u8>, Option<PathBuf>)> {
        if self.should_fail {
            anyhow::bail!("Mock read failure");
        }
        Ok((self.content.clone(), self.filename.clone()))
    }
}
