use crate::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemWriter, StdinReader, StdoutPresenter,
};
use crate::ports::outbound::{BomReader, OutputPresenter};
use std::path::PathBuf;

/// Where the input document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl From<Option<PathBuf>> for InputSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(InputSource::Stdin, InputSource::File)
    }
}

/// Where the converted document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for OutputSink {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(OutputSink::Stdout, OutputSink::File)
    }
}

/// Factory for the I/O adapters on either side of a conversion
///
/// Selecting between file and standard stream adapters is an application
/// concern; the adapters themselves know nothing about each other.
pub struct IoFactory;

impl IoFactory {
    /// Creates a reader for the given input source
    ///
    /// # Examples
    /// ```
    /// use bom_convert::application::factories::{InputSource, IoFactory};
    /// use std::path::PathBuf;
    ///
    /// let reader = IoFactory::reader(InputSource::File(PathBuf::from("bom.json")));
    /// ```
    pub fn reader(source: InputSource) -> Box<dyn BomReader> {
        match source {
            InputSource::Stdin => Box::new(StdinReader::new()),
            InputSource::File(path) => Box::new(FileSystemReader::new(path)),
        }
    }

    /// Creates a presenter for the given output sink
    pub fn presenter(sink: OutputSink) -> Box<dyn OutputPresenter> {
        match sink {
            OutputSink::Stdout => Box::new(StdoutPresenter::new()),
            OutputSink::File(path) => Box::new(FileSystemWriter::new(path)),
        }
    }
}
