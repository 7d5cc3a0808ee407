use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_conversion::domain::{
    Bom, Component, ComponentType, Hash, LicenseChoice, OrganizationalEntity, SpecVersion,
    WireFormat,
};
use crate::shared::error::SbomError;
use crate::shared::ConvertResult;
use std::collections::HashMap;
use uuid::Uuid;

/// Hash algorithms with their own column, in column order
const HASH_COLUMNS: [&str; 12] = [
    "MD5",
    "SHA-1",
    "SHA-256",
    "SHA-384",
    "SHA-512",
    "SHA3-256",
    "SHA3-384",
    "SHA3-512",
    "BLAKE2b-256",
    "BLAKE2b-384",
    "BLAKE2b-512",
    "BLAKE3",
];

const FIELD_COLUMNS: [&str; 17] = [
    "Type",
    "BomRef",
    "MimeType",
    "Supplier",
    "Author",
    "Publisher",
    "Group",
    "Name",
    "Version",
    "Scope",
    "Description",
    "LicenseExpressions",
    "LicenseIds",
    "LicenseNames",
    "Copyright",
    "Cpe",
    "Purl",
];

const MODIFIED_COLUMN: &str = "Modified";

/// Separator for multi-valued cells such as license ids
///
/// License names may contain commas; a pipe does not occur in SPDX ids,
/// expressions or license names.
const LIST_SEPARATOR: &str = "|";

/// CsvCodec adapter for a flat component table
///
/// One row per component, nested components flattened depth-first. Only
/// component data survives; metadata, services and dependencies have no
/// columns. Quoting follows RFC 4180.
#[derive(Debug, Default)]
pub struct CsvCodec;

impl CsvCodec {
    pub fn new() -> Self {
        Self
    }

    fn header() -> Vec<&'static str> {
        FIELD_COLUMNS
            .iter()
            .copied()
            .chain(std::iter::once(MODIFIED_COLUMN))
            .chain(HASH_COLUMNS.iter().copied())
            .collect()
    }

    fn row(component: &Component) -> Vec<String> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut row = vec![
            component.component_type.as_str().to_string(),
            text(&component.bom_ref),
            text(&component.mime_type),
            component
                .supplier
                .as_ref()
                .and_then(|s| s.name.clone())
                .unwrap_or_default(),
            text(&component.author),
            text(&component.publisher),
            text(&component.group),
            component.name.clone(),
            component.version.clone(),
            component.scope.map(|s| s.as_str().to_string()).unwrap_or_default(),
            text(&component.description),
            join_licenses(&component.licenses, |l| match l {
                LicenseChoice::Expression(e) => Some(e.as_str()),
                LicenseChoice::License(_) => None,
            }),
            join_licenses(&component.licenses, |l| match l {
                LicenseChoice::License(license) => license.id.as_deref(),
                LicenseChoice::Expression(_) => None,
            }),
            join_licenses(&component.licenses, |l| match l {
                LicenseChoice::License(license) if license.id.is_none() => license.name.as_deref(),
                _ => None,
            }),
            text(&component.copyright),
            text(&component.cpe),
            text(&component.purl),
            component.modified.map(|m| m.to_string()).unwrap_or_default(),
        ];
        row.extend(HASH_COLUMNS.iter().map(|alg| {
            component
                .hashes
                .iter()
                .find(|h| h.alg.eq_ignore_ascii_case(alg))
                .map(|h| h.content.clone())
                .unwrap_or_default()
        }));
        row
    }

    fn read_row(
        columns: &HashMap<String, usize>,
        record: &[String],
        line: usize,
    ) -> Result<Component, String> {
        let cell = |name: &str| -> Option<&str> {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };
        let owned = |name: &str| cell(name).map(str::to_string);
        let list = |name: &str| -> Vec<String> {
            cell(name)
                .map(|v| {
                    v.split(LIST_SEPARATOR)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let name = cell("Name").ok_or_else(|| format!("Row {}: Name is empty", line))?;
        let component_type = match cell("Type") {
            Some(t) => t.parse().map_err(|e| format!("Row {}: {}", line, e))?,
            None => ComponentType::Library,
        };
        let mut component =
            Component::new(component_type, name, cell("Version").unwrap_or_default());

        component.bom_ref = owned("BomRef");
        component.mime_type = owned("MimeType");
        component.supplier = owned("Supplier").map(|name| OrganizationalEntity {
            name: Some(name),
            ..OrganizationalEntity::default()
        });
        component.author = owned("Author");
        component.publisher = owned("Publisher");
        component.group = owned("Group");
        component.scope = cell("Scope")
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| format!("Row {}: {}", line, e))?;
        component.description = owned("Description");
        component.copyright = owned("Copyright");
        component.cpe = owned("Cpe");
        component.purl = owned("Purl");
        component.modified = match cell(MODIFIED_COLUMN) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => return Err(format!("Row {}: invalid Modified value '{}'", line, other)),
            None => None,
        };

        component.licenses = list("LicenseExpressions")
            .into_iter()
            .map(LicenseChoice::Expression)
            .chain(list("LicenseIds").into_iter().map(LicenseChoice::id))
            .chain(list("LicenseNames").into_iter().map(LicenseChoice::name))
            .collect();
        component.hashes = HASH_COLUMNS
            .iter()
            .filter_map(|&alg| cell(alg).map(|content| Hash::new(alg, content)))
            .collect();

        Ok(component)
    }
}

impl BomEncoder for CsvCodec {
    fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>> {
        let mut out = String::new();
        write_record(&mut out, Self::header().iter().copied());
        for component in bom.flattened_components() {
            let row = Self::row(component);
            write_record(&mut out, row.iter().map(String::as_str));
        }
        Ok(out.into_bytes())
    }
}

impl BomDecoder for CsvCodec {
    fn decode(&self, data: &[u8]) -> ConvertResult<Bom> {
        let text = std::str::from_utf8(data).map_err(|e| SbomError::parse(WireFormat::Csv, e))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_records(text)
            .map_err(|e| SbomError::parse(WireFormat::Csv, e))?
            .into_iter();

        let header = records
            .next()
            .ok_or_else(|| SbomError::parse(WireFormat::Csv, "Missing header row"))?;
        let columns: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        if !columns.contains_key("Name") {
            return Err(SbomError::parse(
                WireFormat::Csv,
                "Header row has no Name column",
            ));
        }

        let mut bom = Bom::new(SpecVersion::NEWEST);
        bom.serial_number = Some(format!("urn:uuid:{}", Uuid::new_v4()));
        for (index, record) in records.enumerate() {
            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            let component = Self::read_row(&columns, &record, index + 2)
                .map_err(|e| SbomError::parse(WireFormat::Csv, e))?;
            bom.components.push(component);
        }
        Ok(bom)
    }
}

fn join_licenses(
    licenses: &[LicenseChoice],
    pick: fn(&LicenseChoice) -> Option<&str>,
) -> String {
    licenses
        .iter()
        .filter_map(pick)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        let needs_quotes = field.contains(&[',', '"', '\r', '\n'][..])
            || field.starts_with(' ')
            || field.ends_with(' ');
        if needs_quotes {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}

/// Splits RFC 4180 text into records; quoted fields may span lines
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => in_quotes = false,
            (true, c) => {
                if c == '\n' {
                    line += 1;
                }
                field.push(c);
            }
            (false, '"') if field.is_empty() => in_quotes = true,
            (false, '"') => {
                return Err(format!("Line {}: unexpected quote in unquoted field", line))
            }
            (false, ',') => record.push(std::mem::take(&mut field)),
            (false, '\r') if chars.peek() == Some(&'\n') => {}
            (false, '\n') => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                line += 1;
            }
            (false, c) => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!("Line {}: unterminated quoted field", line));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_conversion::domain::Scope;
    use rstest::rstest;

    fn decode(input: &str) -> ConvertResult<Bom> {
        CsvCodec::new().decode(input.as_bytes())
    }

    #[test]
    fn test_parse_records_quoting() {
        let records = parse_records("a,\"b,c\",\"say \"\"hi\"\"\"\r\n\"multi\nline\",,x\n").unwrap();
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b,c".to_string(), "say \"hi\"".to_string()],
                vec!["multi\nline".to_string(), String::new(), "x".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_records_without_trailing_newline() {
        let records = parse_records("Name\nserde").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], vec!["serde".to_string()]);
    }

    #[rstest]
    #[case("Name\n\"open")]
    #[case("Name\nab\"c\n")]
    fn test_parse_records_rejects(#[case] input: &str) {
        assert!(parse_records(input).is_err());
    }

    #[test]
    fn test_decode_is_header_driven() {
        let bom = decode(
            "Version,Unknown,Name,Type,LicenseIds,SHA-256,Scope\n\
             1.0.0,ignored,serde,framework,MIT|Apache-2.0,abcd,optional\n",
        )
        .unwrap();

        assert_eq!(bom.spec_version, SpecVersion::NEWEST);
        assert!(bom.serial_number.as_deref().unwrap().starts_with("urn:uuid:"));
        let component = &bom.components[0];
        assert_eq!(component.name, "serde");
        assert_eq!(component.version, "1.0.0");
        assert_eq!(component.component_type, ComponentType::Framework);
        assert_eq!(component.scope, Some(Scope::Optional));
        assert_eq!(
            component.licenses,
            vec![LicenseChoice::id("MIT"), LicenseChoice::id("Apache-2.0")]
        );
        assert_eq!(component.hashes, vec![Hash::new("SHA-256", "abcd")]);
    }

    #[test]
    fn test_decode_defaults_and_blank_rows() {
        let bom = decode("Name\nfoo\n\n,\nbar\n").unwrap();
        let names: Vec<_> = bom.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
        assert_eq!(bom.components[0].component_type, ComponentType::Library);
        assert!(bom.components[0].licenses.is_empty());
    }

    #[rstest]
    #[case("", "Missing header row")]
    #[case("Type,Version\nlibrary,1.0\n", "no Name column")]
    #[case("Name,Version\n,1.0\n", "Row 2: Name is empty")]
    #[case("Name,Type\nx,spaceship\n", "Unknown component type")]
    #[case("Name,Modified\nx,maybe\n", "invalid Modified value")]
    fn test_decode_rejects(#[case] input: &str, #[case] message: &str) {
        let err = decode(input).unwrap_err();
        assert!(matches!(err, SbomError::Parse { format: WireFormat::Csv, .. }));
        assert!(err.to_string().contains(message), "{}", err);
    }

    #[test]
    fn test_encode_flattens_and_quotes() {
        let mut parent = Component::new(ComponentType::Application, "app", "1.0");
        parent.description = Some("Fast, \"safe\"".to_string());
        parent.hashes.push(Hash::new("SHA-1", "aaaa"));
        parent
            .components
            .push(Component::new(ComponentType::Library, "child", "0.1"));
        let mut bom = Bom::new(SpecVersion::V1_3);
        bom.components.push(parent);

        let csv = String::from_utf8(CsvCodec::new().encode(&bom).unwrap()).unwrap();
        let lines: Vec<_> = csv.split("\r\n").collect();

        assert!(lines[0].starts_with("Type,BomRef,MimeType,Supplier,Author,Publisher,Group,Name,Version"));
        assert!(lines[0].ends_with("BLAKE2b-512,BLAKE3"));
        assert!(lines[1].starts_with("application,,,,,,,app,1.0,,\"Fast, \"\"safe\"\"\","));
        assert!(lines[2].starts_with("library,,,,,,,child,0.1,"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_encode_then_decode_preserves_components() {
        let mut component = Component::new(ComponentType::Device, "sensor", "3");
        component.bom_ref = Some("sensor".to_string());
        component.supplier = Some(OrganizationalEntity {
            name: Some("Acme".to_string()),
            ..OrganizationalEntity::default()
        });
        component.licenses = vec![
            LicenseChoice::Expression("MIT OR Apache-2.0".to_string()),
            LicenseChoice::id("BSD-3-Clause"),
            LicenseChoice::name("Proprietary"),
        ];
        component.hashes = vec![Hash::new("MD5", "1111"), Hash::new("SHA-512", "2222")];
        component.modified = Some(false);
        component.copyright = Some("Line one\nLine two".to_string());

        let mut bom = Bom::new(SpecVersion::V1_3);
        bom.components.push(component.clone());

        let codec = CsvCodec::new();
        let decoded = codec.decode(&codec.encode(&bom).unwrap()).unwrap();
        assert_eq!(decoded.components, vec![component]);
    }

    #[test]
    fn test_license_names_with_commas_survive_round_trip() {
        let mut component = Component::new(ComponentType::Library, "commons-io", "2.11.0");
        component.licenses = vec![
            LicenseChoice::name("Apache License, Version 2.0"),
            LicenseChoice::name("Eclipse Public License, v1.0"),
        ];
        let mut bom = Bom::new(SpecVersion::V1_3);
        bom.components.push(component.clone());

        let codec = CsvCodec::new();
        let csv = codec.encode(&bom).unwrap();
        assert!(String::from_utf8_lossy(&csv)
            .contains("\"Apache License, Version 2.0|Eclipse Public License, v1.0\""));

        let decoded = codec.decode(&csv).unwrap();
        assert_eq!(decoded.components, vec![component]);
    }
}
