/// Filesystem adapters for reading input documents and writing output
mod file_reader;
mod file_writer;

pub use file_reader::{FileSystemReader, StdinReader};
pub use file_writer::{FileSystemWriter, StdoutPresenter};
