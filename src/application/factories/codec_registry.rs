use crate::adapters::outbound::codecs::{CsvCodec, JsonCodec, SpdxTagCodec, XmlCodec};
use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_conversion::domain::{Bom, FormatTarget, SpdxVersion, SpecVersion, WireFormat};
use crate::shared::error::SbomError;
use crate::shared::ConvertResult;
use log::debug;
use std::collections::HashMap;

type DynDecoder = Box<dyn BomDecoder + Send + Sync>;
type DynEncoder = Box<dyn BomEncoder + Send + Sync>;

/// Registry of codecs keyed by wire format and (format, version) pair
///
/// The registry is the single source of truth for which combinations are
/// supported. It is built once and never mutated afterwards; "is this pair
/// supported" is a single map lookup.
pub struct CodecRegistry {
    decoders: HashMap<WireFormat, DynDecoder>,
    encoders: HashMap<FormatTarget, DynEncoder>,
}

impl CodecRegistry {
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// The registry with every built-in codec
    ///
    /// | Format  | Decode        | Encode              |
    /// |---------|---------------|---------------------|
    /// | json    | 1.2, 1.3      | 1.2, 1.3            |
    /// | xml     | 1.0 - 1.3     | 1.0 - 1.3           |
    /// | spdxtag | SPDX-2.1, 2.2 | SPDX-2.1, SPDX-2.2  |
    /// | csv     | yes           | 1.3 only            |
    pub fn standard() -> Self {
        let mut builder = Self::builder()
            .decoder(WireFormat::Json, JsonCodec::default())
            .decoder(WireFormat::Xml, XmlCodec::default())
            .decoder(WireFormat::SpdxTag, SpdxTagCodec::default())
            .decoder(WireFormat::Csv, CsvCodec::new());

        for version in JsonCodec::VERSIONS {
            builder = builder.encoder(
                FormatTarget::schema(WireFormat::Json, version),
                JsonCodec::new(version),
            );
        }
        for version in SpecVersion::ALL {
            builder = builder.encoder(
                FormatTarget::schema(WireFormat::Xml, version),
                XmlCodec::new(version),
            );
        }
        for version in SpdxVersion::ALL {
            builder = builder.encoder(FormatTarget::tag_value(version), SpdxTagCodec::new(version));
        }

        builder
            .encoder(
                FormatTarget::schema(WireFormat::Csv, SpecVersion::NEWEST),
                CsvCodec::new(),
            )
            .build()
    }

    /// Decodes a document and returns it at `SpecVersion::NEWEST`
    ///
    /// # Errors
    /// - `SbomError::UnsupportedFormat` if no decoder is registered for `format`
    /// - `SbomError::Parse` if the decoder rejects the bytes
    pub fn decode(&self, data: &[u8], format: WireFormat) -> ConvertResult<Bom> {
        let decoder = self
            .decoders
            .get(&format)
            .ok_or(SbomError::UnsupportedFormat {
                format,
                version: None,
            })?;

        let mut bom = decoder.decode(data)?;
        if bom.spec_version != SpecVersion::NEWEST {
            debug!(
                "{} decoder returned a {} document; lifting to {}",
                format,
                bom.spec_version,
                SpecVersion::NEWEST
            );
            bom.spec_version = SpecVersion::NEWEST;
        }
        Ok(bom)
    }

    /// Encodes a document that is already at the target's schema version
    ///
    /// # Errors
    /// - `SbomError::UnsupportedFormat` naming the pair if it is not registered
    /// - `SbomError::InvalidRequest` if the document is at another schema version
    /// - `SbomError::Encode` if the encoder fails
    pub fn encode(&self, bom: &Bom, target: FormatTarget) -> ConvertResult<Vec<u8>> {
        let encoder = self
            .encoders
            .get(&target)
            .ok_or_else(|| SbomError::unsupported_target(target))?;

        if bom.spec_version != target.schema_version() {
            return Err(SbomError::InvalidRequest {
                reason: format!(
                    "Cannot encode a CycloneDX {} document as {}; it must first be converted to {}",
                    bom.spec_version,
                    target,
                    target.schema_version()
                ),
            });
        }

        encoder.encode(bom)
    }

    pub fn supports_decode(&self, format: WireFormat) -> bool {
        self.decoders.contains_key(&format)
    }

    pub fn supports_encode(&self, target: FormatTarget) -> bool {
        self.encoders.contains_key(&target)
    }

    /// Formats with a registered decoder, sorted
    pub fn decodable_formats(&self) -> Vec<WireFormat> {
        let mut formats: Vec<_> = self.decoders.keys().copied().collect();
        formats.sort();
        formats
    }

    /// Pairs with a registered encoder, sorted by format then version
    pub fn encodable_targets(&self) -> Vec<FormatTarget> {
        let mut targets: Vec<_> = self.encoders.keys().copied().collect();
        targets.sort();
        targets
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Collects codecs before freezing them into a [`CodecRegistry`]
#[derive(Default)]
pub struct CodecRegistryBuilder {
    decoders: HashMap<WireFormat, DynDecoder>,
    encoders: HashMap<FormatTarget, DynEncoder>,
}

impl CodecRegistryBuilder {
    /// Registers the decoder for a wire format, replacing any previous one
    ///
    /// Registrations for `WireFormat::Unsupported` are ignored.
    pub fn decoder(
        mut self,
        format: WireFormat,
        decoder: impl BomDecoder + Send + Sync + 'static,
    ) -> Self {
        if format != WireFormat::Unsupported {
            self.decoders.insert(format, Box::new(decoder));
        }
        self
    }

    /// Registers the encoder for a (format, version) pair, replacing any previous one
    ///
    /// Registrations for `WireFormat::Unsupported` are ignored.
    pub fn encoder(
        mut self,
        target: FormatTarget,
        encoder: impl BomEncoder + Send + Sync + 'static,
    ) -> Self {
        if target.format != WireFormat::Unsupported {
            self.encoders.insert(target, Box::new(encoder));
        }
        self
    }

    pub fn build(self) -> CodecRegistry {
        CodecRegistry {
            decoders: self.decoders,
            encoders: self.encoders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_conversion::domain::{Component, ComponentType, FormatVersion};
    use rstest::rstest;

    struct FixedDecoder(SpecVersion);

    impl BomDecoder for FixedDecoder {
        fn decode(&self, _data: &[u8]) -> ConvertResult<Bom> {
            Ok(Bom::new(self.0))
        }
    }

    struct NameEncoder;

    impl BomEncoder for NameEncoder {
        fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>> {
            Ok(bom
                .components
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(",")
                .into_bytes())
        }
    }

    #[test]
    fn test_every_supported_format_has_newest_codecs() {
        let registry = CodecRegistry::standard();
        for format in WireFormat::SUPPORTED {
            assert!(registry.supports_decode(format), "no decoder for {}", format);
            let target = FormatTarget::default_for(format);
            assert!(registry.supports_encode(target), "no encoder for {}", target);
        }
    }

    #[test]
    fn test_standard_table() {
        let registry = CodecRegistry::standard();
        let targets: Vec<String> = registry
            .encodable_targets()
            .iter()
            .map(|t| t.to_string())
            .collect();

        assert_eq!(
            targets,
            vec![
                "json/1.2",
                "json/1.3",
                "xml/1.0",
                "xml/1.1",
                "xml/1.2",
                "xml/1.3",
                "spdxtag/SPDX-2.1",
                "spdxtag/SPDX-2.2",
                "csv/1.3",
            ]
        );
        assert_eq!(
            registry.decodable_formats(),
            vec![
                WireFormat::Json,
                WireFormat::Xml,
                WireFormat::SpdxTag,
                WireFormat::Csv
            ]
        );
    }

    #[rstest]
    #[case(FormatTarget::schema(WireFormat::Csv, SpecVersion::V1_0))]
    #[case(FormatTarget::schema(WireFormat::Csv, SpecVersion::V1_2))]
    #[case(FormatTarget::schema(WireFormat::Json, SpecVersion::V1_1))]
    #[case(FormatTarget::schema(WireFormat::SpdxTag, SpecVersion::V1_3))]
    #[case(FormatTarget::new(WireFormat::Xml, FormatVersion::TagValue(SpdxVersion::V2_2)))]
    #[case(FormatTarget::schema(WireFormat::Unsupported, SpecVersion::V1_3))]
    fn test_unsupported_pairs_are_rejected(#[case] target: FormatTarget) {
        let registry = CodecRegistry::standard();
        assert!(!registry.supports_encode(target));

        let bom = Bom::new(target.schema_version());
        match registry.encode(&bom, target) {
            Err(SbomError::UnsupportedFormat { format, version }) => {
                assert_eq!(format, target.format);
                assert_eq!(version, Some(target.version));
            }
            other => panic!("expected UnsupportedFormat, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_unsupported_format() {
        let registry = CodecRegistry::standard();
        let err = registry.decode(b"{}", WireFormat::Unsupported).unwrap_err();
        assert!(matches!(
            err,
            SbomError::UnsupportedFormat {
                format: WireFormat::Unsupported,
                version: None
            }
        ));
    }

    #[test]
    fn test_decode_lifts_to_newest() {
        let registry = CodecRegistry::builder()
            .decoder(WireFormat::Json, FixedDecoder(SpecVersion::V1_1))
            .build();

        let bom = registry.decode(b"", WireFormat::Json).unwrap();
        assert_eq!(bom.spec_version, SpecVersion::NEWEST);
    }

    #[test]
    fn test_encode_rejects_version_mismatch() {
        let target = FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_0);
        let registry = CodecRegistry::builder().encoder(target, NameEncoder).build();

        let err = registry.encode(&Bom::new(SpecVersion::V1_3), target).unwrap_err();
        assert!(matches!(err, SbomError::InvalidRequest { .. }));
    }

    #[test]
    fn test_custom_registry_dispatch() {
        let target = FormatTarget::schema(WireFormat::Csv, SpecVersion::V1_3);
        let registry = CodecRegistry::builder().encoder(target, NameEncoder).build();

        let mut bom = Bom::new(SpecVersion::V1_3);
        bom.components
            .push(Component::new(ComponentType::Library, "a", "1"));
        bom.components
            .push(Component::new(ComponentType::Library, "b", "1"));

        assert_eq!(registry.encode(&bom, target).unwrap(), b"a,b".to_vec());
        assert!(!registry.supports_decode(WireFormat::Csv));
    }

    #[test]
    fn test_builder_ignores_unsupported_registrations() {
        let registry = CodecRegistry::builder()
            .decoder(WireFormat::Unsupported, FixedDecoder(SpecVersion::V1_3))
            .build();
        assert!(!registry.supports_decode(WireFormat::Unsupported));
        assert!(registry.decodable_formats().is_empty());
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<CodecRegistry>();
    }
}
