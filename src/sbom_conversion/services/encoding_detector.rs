use crate::sbom_conversion::domain::WireFormat;
use std::path::Path;

/// EncodingDetector service for mapping filenames to wire formats
///
/// Detection looks at the file extension only. File contents are never read,
/// so callers can override the result before any bytes are loaded.
pub struct EncodingDetector;

impl EncodingDetector {
    /// Detects the wire format of a file from its extension
    ///
    /// # Arguments
    /// * `filename` - Path or bare filename of the input document
    ///
    /// # Returns
    /// The matching `WireFormat`, or `WireFormat::Unsupported` when the
    /// extension is missing or unknown
    ///
    /// # Examples
    /// ```
    /// use bom_convert::sbom_conversion::domain::WireFormat;
    /// use bom_convert::sbom_conversion::services::EncodingDetector;
    ///
    /// assert_eq!(EncodingDetector::detect("bom.xml"), WireFormat::Xml);
    /// assert_eq!(EncodingDetector::detect("report.bom"), WireFormat::Unsupported);
    /// ```
    pub fn detect(filename: impl AsRef<Path>) -> WireFormat {
        let Some(extension) = filename.as_ref().extension().and_then(|e| e.to_str()) else {
            return WireFormat::Unsupported;
        };

        // Extensions are matched exactly; `.JSON` is not `.json`
        match extension {
            "json" => WireFormat::Json,
            "xml" => WireFormat::Xml,
            "spdx" => WireFormat::SpdxTag,
            "csv" => WireFormat::Csv,
            _ => WireFormat::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("bom.json", WireFormat::Json)]
    #[case("bom.xml", WireFormat::Xml)]
    #[case("bom.spdx", WireFormat::SpdxTag)]
    #[case("bom.csv", WireFormat::Csv)]
    #[case("/abs/path/to/bom.json", WireFormat::Json)]
    #[case("nested.dir.name/bom.xml", WireFormat::Xml)]
    #[case("bom.JSON", WireFormat::Unsupported)]
    #[case("bom.Xml", WireFormat::Unsupported)]
    #[case("bom.SPDX", WireFormat::Unsupported)]
    #[case("report.bom", WireFormat::Unsupported)]
    #[case("bom.json.gz", WireFormat::Unsupported)]
    #[case("noextension", WireFormat::Unsupported)]
    #[case(".json", WireFormat::Unsupported)]
    #[case("", WireFormat::Unsupported)]
    fn test_detect(#[case] filename: &str, #[case] expected: WireFormat) {
        assert_eq!(EncodingDetector::detect(filename), expected);
    }

    #[test]
    fn test_detect_does_not_touch_filesystem() {
        // The file does not exist; detection must still succeed
        assert_eq!(
            EncodingDetector::detect("/nonexistent/dir/bom.csv"),
            WireFormat::Csv
        );
    }

    proptest! {
        #[test]
        fn prop_detect_depends_only_on_extension(
            stem_a in "[a-zA-Z0-9_-]{1,16}",
            stem_b in "[a-zA-Z0-9_-]{1,16}",
            ext in "(json|xml|spdx|csv|bom|txt|yaml)",
        ) {
            let a = EncodingDetector::detect(format!("{}.{}", stem_a, ext));
            let b = EncodingDetector::detect(format!("dir/{}.{}", stem_b, ext));
            prop_assert_eq!(a, b);
        }
    }
}
