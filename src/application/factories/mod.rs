mod codec_registry;
mod io_factory;

pub use codec_registry::{CodecRegistry, CodecRegistryBuilder};
pub use io_factory::{InputSource, IoFactory, OutputSink};
