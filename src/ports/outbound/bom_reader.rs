use crate::shared::Result;
use std::path::PathBuf;

/// BomReader port for loading raw input documents
///
/// This port abstracts the input source (file, stdin, etc.) so the
/// conversion core only ever sees an in-memory byte buffer.
pub trait BomReader {
    /// Reads the whole input document
    ///
    /// # Returns
    /// The document bytes and, when the source has one, its filename for
    /// format detection
    fn read_bom(&self) -> Result<(Vec<u8>, Option<PathBuf>)>;
}
