use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_conversion::domain::{
    Bom, Component, ComponentType, Dependency, Hash, License, LicenseChoice, Metadata,
    OrganizationalContact, OrganizationalEntity, SpdxVersion, SpecVersion, Tool, WireFormat,
};
use crate::shared::error::SbomError;
use crate::shared::ConvertResult;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

const NOASSERTION: &str = "NOASSERTION";
const DEFAULT_DOCUMENT_NAME: &str = "CycloneDX-BOM";
const NAMESPACE_BASE: &str = "https://spdx.org/spdxdocs/";

/// SPDX checksum algorithms, paired with their CycloneDX names
const CHECKSUM_ALGORITHMS: [(&str, &str); 9] = [
    ("SHA1", "SHA-1"),
    ("SHA224", "SHA-224"),
    ("SHA256", "SHA-256"),
    ("SHA384", "SHA-384"),
    ("SHA512", "SHA-512"),
    ("MD2", "MD2"),
    ("MD4", "MD4"),
    ("MD5", "MD5"),
    ("MD6", "MD6"),
];

/// SpdxTagCodec adapter for SPDX tag-value documents
///
/// Encoding flattens the component tree into one package per component.
/// Decoding reads the packages, creators and relationships back; SPDX files
/// and snippets are skipped.
pub struct SpdxTagCodec {
    version: SpdxVersion,
}

impl SpdxTagCodec {
    pub fn new(version: SpdxVersion) -> Self {
        Self { version }
    }

    /// Checksum algorithms the bound SPDX version defines
    fn supports_checksum(&self, spdx_alg: &str) -> bool {
        match self.version {
            SpdxVersion::V2_1 => matches!(spdx_alg, "SHA1" | "SHA256" | "MD5"),
            SpdxVersion::V2_2 => CHECKSUM_ALGORITHMS.iter().any(|(a, _)| *a == spdx_alg),
        }
    }
}

impl Default for SpdxTagCodec {
    fn default() -> Self {
        Self::new(SpdxVersion::default())
    }
}

fn spdx_checksum_name(cyclonedx_alg: &str) -> Option<&'static str> {
    CHECKSUM_ALGORITHMS
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(cyclonedx_alg))
        .map(|(s, _)| *s)
}

fn cyclonedx_hash_name(spdx_alg: &str) -> Option<&'static str> {
    CHECKSUM_ALGORITHMS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(spdx_alg))
        .map(|(_, c)| *c)
}

/// Number of packages a component expands to when flattened
fn subtree_len(component: &Component) -> usize {
    1 + component.components.iter().map(subtree_len).sum::<usize>()
}

/// SPDX identifiers allow letters, digits, `.` and `-` only
fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '-' })
        .collect()
}

fn text_value(text: &str) -> String {
    if text.contains('\n') || text.contains(':') {
        format!("<text>{}</text>", text)
    } else {
        text.to_string()
    }
}

fn declared_license(licenses: &[LicenseChoice]) -> String {
    let terms: Vec<String> = licenses
        .iter()
        .filter_map(|choice| match choice {
            LicenseChoice::Expression(e) if licenses.len() == 1 => Some(e.clone()),
            LicenseChoice::Expression(e) => Some(format!("({})", e)),
            LicenseChoice::License(License { id: Some(id), .. }) => Some(id.clone()),
            LicenseChoice::License(License { name: Some(name), .. }) => {
                Some(format!("LicenseRef-{}", sanitize_id(name)))
            }
            LicenseChoice::License(_) => None,
        })
        .collect();

    if terms.is_empty() {
        NOASSERTION.to_string()
    } else {
        terms.join(" AND ")
    }
}

fn tool_creator(tool: &Tool) -> Option<String> {
    let name = tool.name.as_deref()?;
    let mut creator = String::new();
    if let Some(vendor) = &tool.vendor {
        creator.push_str(vendor);
        creator.push('-');
    }
    creator.push_str(name);
    if let Some(version) = &tool.version {
        creator.push('-');
        creator.push_str(version);
    }
    Some(creator)
}

impl BomEncoder for SpdxTagCodec {
    fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>> {
        let metadata = bom.metadata.as_ref();
        let components = bom.flattened_components();
        let mut out = String::new();

        // Document header
        let document_name = metadata
            .and_then(|m| m.component.as_ref())
            .map(|c| c.name.as_str())
            .unwrap_or(DEFAULT_DOCUMENT_NAME);
        let document_uuid = bom
            .serial_number
            .as_deref()
            .and_then(|s| Uuid::parse_str(s.trim_start_matches("urn:uuid:")).ok())
            .unwrap_or_else(Uuid::new_v4);
        let created = metadata
            .and_then(|m| m.timestamp.clone())
            .unwrap_or_else(|| Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        out.push_str(&format!("SPDXVersion: {}\n", self.version.as_tag()));
        out.push_str("DataLicense: CC0-1.0\n");
        out.push_str("SPDXID: SPDXRef-DOCUMENT\n");
        out.push_str(&format!("DocumentName: {}\n", document_name));
        out.push_str(&format!(
            "DocumentNamespace: {}{}-{}\n",
            NAMESPACE_BASE,
            sanitize_id(document_name),
            document_uuid
        ));
        let mut creators: Vec<String> = metadata
            .map(|m| {
                let tools = m
                    .tools
                    .iter()
                    .filter_map(tool_creator)
                    .map(|t| format!("Tool: {}", t));
                let people = m.authors.iter().filter_map(|a| {
                    a.name.as_ref().map(|name| match &a.email {
                        Some(email) => format!("Person: {} ({})", name, email),
                        None => format!("Person: {}", name),
                    })
                });
                tools.chain(people).collect()
            })
            .unwrap_or_default();
        if creators.is_empty() {
            creators.push(format!(
                "Tool: {}-{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ));
        }
        for creator in &creators {
            out.push_str(&format!("Creator: {}\n", creator));
        }
        out.push_str(&format!("Created: {}\n", created));

        // Packages
        let mut ids: HashMap<&str, String> = HashMap::new();
        let package_ids: Vec<String> = components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let id = format!("SPDXRef-Package-{}", index + 1);
                if let Some(bom_ref) = &component.bom_ref {
                    ids.entry(bom_ref.as_str()).or_insert_with(|| id.clone());
                }
                id
            })
            .collect();

        for (component, id) in components.iter().zip(&package_ids) {
            self.write_package(&mut out, component, id);
        }

        // Relationships
        out.push('\n');
        let mut index = 0;
        for top in &bom.components {
            if let Some(id) = package_ids.get(index) {
                out.push_str(&format!("Relationship: SPDXRef-DOCUMENT DESCRIBES {}\n", id));
            }
            index += subtree_len(top);
        }
        for dependency in &bom.dependencies {
            let Some(from) = ids.get(dependency.dependency_ref.as_str()) else {
                continue;
            };
            for target in &dependency.depends_on {
                if let Some(to) = ids.get(target.as_str()) {
                    out.push_str(&format!("Relationship: {} DEPENDS_ON {}\n", from, to));
                }
            }
        }

        Ok(out.into_bytes())
    }
}

impl SpdxTagCodec {
    fn write_package(&self, out: &mut String, component: &Component, id: &str) {
        out.push('\n');
        out.push_str(&format!("PackageName: {}\n", component.name));
        out.push_str(&format!("SPDXID: {}\n", id));
        if !component.version.is_empty() {
            out.push_str(&format!("PackageVersion: {}\n", component.version));
        }
        let supplier = component
            .supplier
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .map(|name| format!("Organization: {}", name))
            .or_else(|| {
                component
                    .author
                    .as_deref()
                    .or(component.publisher.as_deref())
                    .map(|name| format!("Person: {}", name))
            })
            .unwrap_or_else(|| NOASSERTION.to_string());
        out.push_str(&format!("PackageSupplier: {}\n", supplier));
        out.push_str(&format!("PackageDownloadLocation: {}\n", NOASSERTION));
        out.push_str("FilesAnalyzed: false\n");

        for hash in &component.hashes {
            match spdx_checksum_name(&hash.alg) {
                Some(alg) if self.supports_checksum(alg) => {
                    out.push_str(&format!("PackageChecksum: {}: {}\n", alg, hash.content));
                }
                _ => log::debug!(
                    "Skipping {} hash of {}; not defined in {}",
                    hash.alg,
                    component.name,
                    self.version
                ),
            }
        }

        out.push_str(&format!("PackageLicenseConcluded: {}\n", NOASSERTION));
        out.push_str(&format!(
            "PackageLicenseDeclared: {}\n",
            declared_license(&component.licenses)
        ));
        let copyright = component
            .copyright
            .as_deref()
            .map(text_value)
            .unwrap_or_else(|| NOASSERTION.to_string());
        out.push_str(&format!("PackageCopyrightText: {}\n", copyright));
        if let Some(description) = &component.description {
            out.push_str(&format!("PackageDescription: {}\n", text_value(description)));
        }
        if let Some(purl) = &component.purl {
            out.push_str(&format!("ExternalRef: PACKAGE-MANAGER purl {}\n", purl));
        }
        if let Some(cpe) = &component.cpe {
            let reference_type = if cpe.starts_with("cpe:2.3:") {
                "cpe23Type"
            } else {
                "cpe22Type"
            };
            out.push_str(&format!("ExternalRef: SECURITY {} {}\n", reference_type, cpe));
        }
    }
}

/// Reads `Tag: value` pairs, joining multi-line `<text>` values
fn tag_values(text: &str) -> Result<Vec<(usize, String, String)>, String> {
    let mut pairs = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (tag, value) = trimmed.split_once(':').ok_or_else(|| {
            format!(
                "Line {}: expected 'Tag: value', found '{}'",
                line_number, trimmed
            )
        })?;
        let mut value = value.trim().to_string();

        if let Some(rest) = value.strip_prefix("<text>") {
            let mut body = rest.to_string();
            while !body.contains("</text>") {
                let (_, next) = lines
                    .next()
                    .ok_or_else(|| format!("Line {}: unterminated <text> value", line_number))?;
                body.push('\n');
                body.push_str(next);
            }
            let end = body.find("</text>").unwrap_or(body.len());
            body.truncate(end);
            value = body;
        }
        pairs.push((line_number, tag.trim().to_string(), value));
    }
    Ok(pairs)
}

fn optional(value: &str) -> Option<String> {
    match value {
        "" | NOASSERTION | "NONE" => None,
        other => Some(other.to_string()),
    }
}

fn parse_declared_license(value: &str) -> Vec<LicenseChoice> {
    let Some(value) = optional(value) else {
        return Vec::new();
    };
    if value.contains(' ') {
        vec![LicenseChoice::Expression(value)]
    } else if let Some(name) = value.strip_prefix("LicenseRef-") {
        vec![LicenseChoice::name(name)]
    } else {
        vec![LicenseChoice::id(value)]
    }
}

fn parse_tool(value: &str) -> Tool {
    match value.rsplit_once('-') {
        Some((name, version)) if version.starts_with(|c: char| c.is_ascii_digit()) => Tool {
            vendor: None,
            name: Some(name.to_string()),
            version: Some(version.to_string()),
        },
        _ => Tool {
            vendor: None,
            name: Some(value.to_string()),
            version: None,
        },
    }
}

fn parse_person(value: &str) -> OrganizationalContact {
    match value.split_once('(') {
        Some((name, email)) => OrganizationalContact {
            name: Some(name.trim().to_string()),
            email: optional(email.trim_end_matches(')').trim()),
            phone: None,
        },
        None => OrganizationalContact {
            name: Some(value.trim().to_string()),
            ..OrganizationalContact::default()
        },
    }
}

impl BomDecoder for SpdxTagCodec {
    fn decode(&self, data: &[u8]) -> ConvertResult<Bom> {
        let text = std::str::from_utf8(data).map_err(|e| SbomError::parse(WireFormat::SpdxTag, e))?;
        let pairs = tag_values(text).map_err(|e| SbomError::parse(WireFormat::SpdxTag, e))?;

        match pairs.first() {
            Some((_, tag, value)) if tag == "SPDXVersion" => {
                value
                    .parse::<SpdxVersion>()
                    .map_err(|e| SbomError::parse(WireFormat::SpdxTag, e))?;
            }
            _ => {
                return Err(SbomError::parse(
                    WireFormat::SpdxTag,
                    "Document must start with an SPDXVersion tag",
                ))
            }
        }

        let mut bom = Bom::new(SpecVersion::NEWEST);
        let mut metadata = Metadata::default();
        let mut components: Vec<Component> = Vec::new();
        let mut depends_on: Vec<(String, String)> = Vec::new();

        for (line, tag, value) in pairs {
            match tag.as_str() {
                "DocumentNamespace" => {
                    // Trailing 36 characters are the document UUID when we wrote it
                    let tail = value.len().checked_sub(36).and_then(|i| value.get(i..));
                    bom.serial_number = tail
                        .and_then(|t| Uuid::parse_str(t).ok())
                        .map(|u| format!("urn:uuid:{}", u));
                }
                "Creator" => match value.split_once(':') {
                    Some(("Tool", tool)) => metadata.tools.push(parse_tool(tool.trim())),
                    Some(("Person", person)) => metadata.authors.push(parse_person(person)),
                    _ => {}
                },
                "Created" => metadata.timestamp = optional(&value),
                "PackageName" => {
                    components.push(Component::new(ComponentType::Library, value, ""))
                }
                "Relationship" => {
                    let parts: Vec<&str> = value.split_whitespace().collect();
                    if let [from, "DEPENDS_ON", to] = parts.as_slice() {
                        depends_on.push((from.to_string(), to.to_string()));
                    }
                }
                package_tag
                    if package_tag.starts_with("Package")
                        || package_tag == "SPDXID"
                        || package_tag == "ExternalRef" =>
                {
                    let Some(component) = components.last_mut() else {
                        // Document-level SPDXID precedes the first package
                        if package_tag == "SPDXID" {
                            continue;
                        }
                        return Err(SbomError::parse(
                            WireFormat::SpdxTag,
                            format!("Line {}: {} outside of a package", line, package_tag),
                        ));
                    };
                    Self::read_package_tag(component, package_tag, &value);
                }
                _ => {}
            }
        }

        let mut dependencies: Vec<Dependency> = Vec::new();
        for (from, to) in depends_on {
            match dependencies.iter_mut().find(|d| d.dependency_ref == from) {
                Some(dependency) => dependency.depends_on.push(to),
                None => dependencies.push(Dependency {
                    dependency_ref: from,
                    depends_on: vec![to],
                }),
            }
        }

        if metadata != Metadata::default() {
            bom.metadata = Some(metadata);
        }
        bom.components = components;
        bom.dependencies = dependencies;
        Ok(bom)
    }
}

impl SpdxTagCodec {
    fn read_package_tag(component: &mut Component, tag: &str, value: &str) {
        match tag {
            "SPDXID" => component.bom_ref = Some(value.to_string()),
            "PackageVersion" => component.version = value.to_string(),
            "PackageSupplier" => match value.split_once(':') {
                Some(("Organization", name)) => {
                    component.supplier = Some(OrganizationalEntity {
                        name: Some(name.trim().to_string()),
                        ..OrganizationalEntity::default()
                    })
                }
                Some(("Person", name)) => component.author = Some(name.trim().to_string()),
                _ => {}
            },
            "PackageChecksum" => {
                if let Some((alg, content)) = value.split_once(':') {
                    match cyclonedx_hash_name(alg.trim()) {
                        Some(alg) => component.hashes.push(Hash::new(alg, content.trim())),
                        None => log::debug!("Ignoring unknown checksum algorithm {}", alg),
                    }
                }
            }
            "PackageLicenseDeclared" => component.licenses = parse_declared_license(value),
            "PackageCopyrightText" => component.copyright = optional(value),
            "PackageDescription" => component.description = optional(value),
            "ExternalRef" => {
                let parts: Vec<&str> = value.split_whitespace().collect();
                match parts.as_slice() {
                    [_, "purl", locator] => component.purl = Some(locator.to_string()),
                    [_, "cpe23Type" | "cpe22Type", locator] => {
                        component.cpe = Some(locator.to_string())
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}
