use super::error::SbomError;
use std::fs;
use std::path::Path;

/// Maximum input document size (100 MB)
///
/// Documents are always loaded fully into memory before conversion.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Checks that an input document can be read safely
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if:
/// - The metadata cannot be read (missing file, permissions)
/// - The path is a symbolic link
/// - The path is not a regular file
/// - The file is larger than `max_size`
///
/// # Returns
/// The file size in bytes
pub fn check_input_file(path: &Path, max_size: u64) -> Result<u64, SbomError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read file metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: "Input path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
            hint: "Pass the path of the target file instead".to_string(),
        });
    }

    if !metadata.is_file() {
        return Err(SbomError::FileReadError {
            path: path.to_path_buf(),
            details: "Not a regular file".to_string(),
        });
    }

    let file_size = metadata.len();
    if file_size > max_size {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "File is too large ({} bytes). Maximum allowed size is {} bytes.",
                file_size, max_size
            ),
            hint: "Split the BOM or convert it with a streaming tool".to_string(),
        });
    }

    Ok(file_size)
}

/// Checks that an output path can be written safely
///
/// # Errors
/// Returns an error if the parent directory does not exist or the path
/// already exists as a symbolic link
pub fn check_output_file(path: &Path) -> Result<(), SbomError> {
    if let Some(parent) = path.parent() {
        if parent != Path::new("") && !parent.is_dir() {
            return Err(SbomError::FileWriteError {
                path: path.to_path_buf(),
                details: format!("Parent directory does not exist: {}", parent.display()),
            });
        }
    }

    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: "Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.".to_string(),
            hint: "Choose an output path that is not a symbolic link".to_string(),
        }),
        _ => Ok(()),
    }
}
