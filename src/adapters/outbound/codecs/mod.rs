/// Codec adapters translating wire formats to and from the canonical model
mod csv_codec;
mod json_codec;
mod spdx_tag_codec;
mod xml_codec;

pub use csv_codec::CsvCodec;
pub use json_codec::JsonCodec;
pub use spdx_tag_codec::SpdxTagCodec;
pub use xml_codec::XmlCodec;
