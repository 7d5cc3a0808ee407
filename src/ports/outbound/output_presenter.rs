use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts the output destination (stdout, file, etc.)
/// where the encoded BOM is delivered.
pub trait OutputPresenter {
    /// Presents the encoded BOM to the output destination
    ///
    /// # Arguments
    /// * `content` - The encoded document bytes
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - File permissions prevent writing
    fn present(&self, content: &[u8]) -> Result<()>;
}
