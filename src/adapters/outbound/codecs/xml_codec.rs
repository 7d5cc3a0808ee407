use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_conversion::domain::{
    AttachedText, Bom, Component, Composition, Copyright, Dependency, Evidence,
    ExternalReference, FormatTarget, Hash, License, LicenseChoice, Metadata,
    OrganizationalContact, OrganizationalEntity, Pedigree, Property, Service, SpecVersion, Tool,
    WireFormat,
};
use crate::shared::error::SbomError;
use crate::shared::ConvertResult;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

const NAMESPACE_PREFIX: &str = "http://cyclonedx.org/schema/bom/";

/// XmlCodec adapter for CycloneDX XML
///
/// Every schema version has an XML encoding. The decoder reads the version
/// from the root element's namespace; the encoder writes the element layout
/// of the version it was created for.
pub struct XmlCodec {
    version: SpecVersion,
}

impl XmlCodec {
    pub fn new(version: SpecVersion) -> Self {
        Self { version }
    }

    fn namespace(version: SpecVersion) -> String {
        format!("{}{}", NAMESPACE_PREFIX, version)
    }

    fn target(&self) -> FormatTarget {
        FormatTarget::schema(WireFormat::Xml, self.version)
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new(SpecVersion::NEWEST)
    }
}

impl BomDecoder for XmlCodec {
    fn decode(&self, data: &[u8]) -> ConvertResult<Bom> {
        let root = XmlNode::parse(data).map_err(|e| SbomError::parse(WireFormat::Xml, e))?;
        let mut bom = read_bom(&root).map_err(|e| SbomError::parse(WireFormat::Xml, e))?;
        bom.spec_version = SpecVersion::NEWEST;
        Ok(bom)
    }
}

impl BomEncoder for XmlCodec {
    fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>> {
        let root = ElementLayout::new(self.version).bom(bom);
        root.write().map_err(|details| SbomError::Encode {
            target: self.target(),
            details,
        })
    }
}

/// A parsed XML element with its attributes, text and children
///
/// Element and attribute names are stored without namespace prefixes.
#[derive(Debug, Clone, Default, PartialEq)]
struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Children of the wrapper element `wrapper`, e.g. `<components><component/>...`
    fn list<'a>(&'a self, wrapper: &str, item: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.child(wrapper)
            .into_iter()
            .flat_map(move |w| w.children_named(item))
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn child_bool(&self, name: &str) -> Result<Option<bool>, String> {
        self.child_text(name).map(|t| parse_bool(&t)).transpose()
    }

    fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.push((key.to_string(), value.into()));
        self
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    fn push_text(&mut self, name: &str, text: Option<&str>) {
        if let Some(text) = text {
            self.push(XmlNode::new(name).with_text(text));
        }
    }

    /// Pushes `<wrapper>items...</wrapper>` unless there are no items
    fn push_list(&mut self, wrapper: &str, items: Vec<XmlNode>) {
        if !items.is_empty() {
            let mut node = XmlNode::new(wrapper);
            node.children = items;
            self.push(node);
        }
    }

    fn parse(data: &[u8]) -> Result<XmlNode, String> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let node = Self::from_start(e)?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::End(_)) => {
                    let node = stack.pop().ok_or("Unbalanced closing tag")?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| format!("Invalid text: {e}"))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    ))
                }
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err("Unexpected end of document".to_string());
        }
        root.ok_or_else(|| "Document has no root element".to_string())
    }

    fn from_start(e: &BytesStart<'_>) -> Result<XmlNode, String> {
        let local = e.local_name();
        let name = std::str::from_utf8(local.as_ref())
            .map_err(|e| format!("Invalid tag name: {e}"))?;
        let mut node = XmlNode::new(name);

        for attr in e.attributes() {
            let attr = attr.map_err(|e| format!("Attribute error: {e}"))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| format!("Attribute key error: {e}"))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| format!("Attribute value error: {e}"))?
                .to_string();
            node.attributes.push((key, value));
        }
        Ok(node)
    }

    fn attach(
        stack: &mut [XmlNode],
        root: &mut Option<XmlNode>,
        node: XmlNode,
    ) -> Result<(), String> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None if root.is_some() => return Err("Multiple root elements".to_string()),
            None => *root = Some(node),
        }
        Ok(())
    }

    fn write(&self) -> Result<Vec<u8>, String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| format!("Write error: {e}"))?;
        self.write_into(&mut writer)?;

        let mut output = writer.into_inner().into_inner();
        output.push(b'\n');
        Ok(output)
    }

    fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), String> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| format!("Write error: {e}"));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| format!("Write error: {e}"))?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(|e| format!("Write error: {e}"))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| format!("Write error: {e}"))
    }
}

fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(format!("Invalid boolean: {}", other)),
    }
}

/// Reads the schema version from `xmlns` or any prefixed CycloneDX namespace
fn read_namespace_version(root: &XmlNode) -> Result<SpecVersion, String> {
    let namespace = root
        .attributes
        .iter()
        .filter(|(k, _)| k == "xmlns" || k.starts_with("xmlns:"))
        .map(|(_, v)| v.as_str())
        .find(|v| v.starts_with(NAMESPACE_PREFIX))
        .ok_or("Root element is not in a CycloneDX namespace")?;

    namespace[NAMESPACE_PREFIX.len()..]
        .parse::<SpecVersion>()
        .map_err(|_| format!("Unknown CycloneDX namespace: {}", namespace))
}

// Decoding

fn read_bom(root: &XmlNode) -> Result<Bom, String> {
    if root.name != "bom" {
        return Err(format!("Expected <bom> root element, found <{}>", root.name));
    }
    let mut bom = Bom::new(read_namespace_version(root)?);

    bom.serial_number = root.attr("serialNumber").map(str::to_string);
    if let Some(version) = root.attr("version") {
        bom.version = version
            .parse()
            .map_err(|_| format!("Invalid BOM version: {}", version))?;
    }
    bom.metadata = root.child("metadata").map(read_metadata).transpose()?;
    bom.components = read_components(root)?;
    bom.services = root
        .list("services", "service")
        .map(read_service)
        .collect::<Result<_, _>>()?;
    bom.external_references = read_external_references(root);
    bom.dependencies = root
        .list("dependencies", "dependency")
        .map(read_dependency)
        .collect::<Result<_, _>>()?;
    bom.compositions = root
        .list("compositions", "composition")
        .map(read_composition)
        .collect::<Result<_, _>>()?;
    Ok(bom)
}

fn read_metadata(node: &XmlNode) -> Result<Metadata, String> {
    Ok(Metadata {
        timestamp: node.child_text("timestamp"),
        tools: node
            .list("tools", "tool")
            .map(|t| Tool {
                vendor: t.child_text("vendor"),
                name: t.child_text("name"),
                version: t.child_text("version"),
            })
            .collect(),
        authors: node.list("authors", "author").map(read_contact).collect(),
        component: node.child("component").map(read_component).transpose()?,
        manufacture: node.child("manufacture").map(read_entity),
        supplier: node.child("supplier").map(read_entity),
        licenses: read_licenses(node),
        properties: read_properties(node),
    })
}

fn read_contact(node: &XmlNode) -> OrganizationalContact {
    OrganizationalContact {
        name: node.child_text("name"),
        email: node.child_text("email"),
        phone: node.child_text("phone"),
    }
}

fn read_entity(node: &XmlNode) -> OrganizationalEntity {
    OrganizationalEntity {
        name: node.child_text("name"),
        url: node
            .children_named("url")
            .map(|u| u.text.trim().to_string())
            .collect(),
        contact: node.children_named("contact").map(read_contact).collect(),
    }
}

fn read_components(node: &XmlNode) -> Result<Vec<Component>, String> {
    node.list("components", "component")
        .map(read_component)
        .collect()
}

fn read_component(node: &XmlNode) -> Result<Component, String> {
    let component_type = match node.attr("type") {
        Some(t) => t.parse()?,
        None => return Err("Component is missing the type attribute".to_string()),
    };
    let name = node
        .child_text("name")
        .ok_or("Component is missing a name")?;

    Ok(Component {
        component_type,
        mime_type: node.attr("mime-type").map(str::to_string),
        bom_ref: node.attr("bom-ref").map(str::to_string),
        supplier: node.child("supplier").map(read_entity),
        author: node.child_text("author"),
        publisher: node.child_text("publisher"),
        group: node.child_text("group"),
        name,
        version: node.child_text("version").unwrap_or_default(),
        description: node.child_text("description"),
        scope: node.child_text("scope").map(|s| s.parse()).transpose()?,
        hashes: node
            .list("hashes", "hash")
            .map(|h| Hash::new(h.attr("alg").unwrap_or_default(), h.text.trim()))
            .collect(),
        licenses: read_licenses(node),
        copyright: node.child_text("copyright"),
        cpe: node.child_text("cpe"),
        purl: node.child_text("purl"),
        modified: node.child_bool("modified")?,
        pedigree: node.child("pedigree").map(read_pedigree).transpose()?,
        external_references: read_external_references(node),
        properties: read_properties(node),
        components: read_components(node)?,
        evidence: node.child("evidence").map(read_evidence),
    })
}

fn read_pedigree(node: &XmlNode) -> Result<Pedigree, String> {
    let list = |wrapper: &str| -> Result<Vec<Component>, String> {
        node.list(wrapper, "component").map(read_component).collect()
    };
    Ok(Pedigree {
        ancestors: list("ancestors")?,
        descendants: list("descendants")?,
        variants: list("variants")?,
        notes: node.child_text("notes"),
    })
}

fn read_licenses(node: &XmlNode) -> Vec<LicenseChoice> {
    let Some(licenses) = node.child("licenses") else {
        return Vec::new();
    };
    licenses
        .children
        .iter()
        .filter_map(|choice| match choice.name.as_str() {
            "license" => Some(LicenseChoice::License(License {
                id: choice.child_text("id"),
                name: choice.child_text("name"),
                text: choice.child("text").map(|t| AttachedText {
                    content_type: t.attr("content-type").map(str::to_string),
                    encoding: t.attr("encoding").map(str::to_string),
                    content: t.text.trim().to_string(),
                }),
                url: choice.child_text("url"),
            })),
            "expression" => Some(LicenseChoice::Expression(choice.text.trim().to_string())),
            _ => None,
        })
        .collect()
}

fn read_external_references(node: &XmlNode) -> Vec<ExternalReference> {
    node.list("externalReferences", "reference")
        .map(|r| ExternalReference {
            url: r.child_text("url").unwrap_or_default(),
            reference_type: r.attr("type").unwrap_or("other").to_string(),
            comment: r.child_text("comment"),
        })
        .collect()
}

fn read_properties(node: &XmlNode) -> Vec<Property> {
    node.list("properties", "property")
        .map(|p| Property::new(p.attr("name").unwrap_or_default(), p.text.trim()))
        .collect()
}

fn read_evidence(node: &XmlNode) -> Evidence {
    Evidence {
        licenses: read_licenses(node),
        copyright: node
            .list("copyright", "text")
            .map(|t| Copyright {
                text: t.text.trim().to_string(),
            })
            .collect(),
    }
}

fn read_service(node: &XmlNode) -> Result<Service, String> {
    Ok(Service {
        bom_ref: node.attr("bom-ref").map(str::to_string),
        provider: node.child("provider").map(read_entity),
        group: node.child_text("group"),
        name: node.child_text("name").ok_or("Service is missing a name")?,
        version: node.child_text("version"),
        description: node.child_text("description"),
        endpoints: node
            .list("endpoints", "endpoint")
            .map(|e| e.text.trim().to_string())
            .collect(),
        authenticated: node.child_bool("authenticated")?,
        x_trust_boundary: node.child_bool("x-trust-boundary")?,
        licenses: read_licenses(node),
        external_references: read_external_references(node),
        properties: read_properties(node),
        services: node
            .list("services", "service")
            .map(read_service)
            .collect::<Result<_, _>>()?,
    })
}

fn read_dependency(node: &XmlNode) -> Result<Dependency, String> {
    Ok(Dependency {
        dependency_ref: node
            .attr("ref")
            .ok_or("Dependency is missing the ref attribute")?
            .to_string(),
        depends_on: node
            .children_named("dependency")
            .filter_map(|d| d.attr("ref").map(str::to_string))
            .collect(),
    })
}

fn read_composition(node: &XmlNode) -> Result<Composition, String> {
    let refs = |wrapper: &str, item: &str| -> Vec<String> {
        node.list(wrapper, item)
            .filter_map(|a| a.attr("ref").map(str::to_string))
            .collect()
    };
    Ok(Composition {
        aggregate: node
            .child_text("aggregate")
            .ok_or("Composition is missing an aggregate")?,
        assemblies: refs("assemblies", "assembly"),
        dependencies: refs("dependencies", "dependency"),
    })
}

// Encoding

/// Builds the element tree for one schema version
struct ElementLayout {
    version: SpecVersion,
}

impl ElementLayout {
    fn new(version: SpecVersion) -> Self {
        Self { version }
    }

    fn since(&self, version: SpecVersion) -> bool {
        self.version >= version
    }

    fn bom(&self, bom: &Bom) -> XmlNode {
        let mut root = XmlNode::new("bom").with_attr("xmlns", XmlCodec::namespace(self.version));
        if self.since(SpecVersion::V1_1) {
            if let Some(serial) = &bom.serial_number {
                root = root.with_attr("serialNumber", serial.as_str());
            }
        }
        root = root.with_attr("version", bom.version.to_string());

        if self.since(SpecVersion::V1_2) {
            if let Some(metadata) = &bom.metadata {
                root.push(self.metadata(metadata));
            }
        }
        // <components> is required in 1.0
        if bom.components.is_empty() && !self.since(SpecVersion::V1_1) {
            root.push(XmlNode::new("components"));
        }
        root.push_list("components", self.components(&bom.components));
        if self.since(SpecVersion::V1_2) {
            root.push_list("services", bom.services.iter().map(|s| self.service(s)).collect());
        }
        if self.since(SpecVersion::V1_1) {
            root.push_list(
                "externalReferences",
                self.external_references(&bom.external_references),
            );
        }
        if self.since(SpecVersion::V1_2) {
            root.push_list(
                "dependencies",
                bom.dependencies.iter().map(Self::dependency).collect(),
            );
        }
        if self.since(SpecVersion::V1_3) {
            root.push_list(
                "compositions",
                bom.compositions.iter().map(Self::composition).collect(),
            );
        }
        root
    }

    fn metadata(&self, metadata: &Metadata) -> XmlNode {
        let mut node = XmlNode::new("metadata");
        node.push_text("timestamp", metadata.timestamp.as_deref());
        node.push_list(
            "tools",
            metadata
                .tools
                .iter()
                .map(|t| {
                    let mut tool = XmlNode::new("tool");
                    tool.push_text("vendor", t.vendor.as_deref());
                    tool.push_text("name", t.name.as_deref());
                    tool.push_text("version", t.version.as_deref());
                    tool
                })
                .collect(),
        );
        node.push_list(
            "authors",
            metadata
                .authors
                .iter()
                .map(|a| Self::contact("author", a))
                .collect(),
        );
        if let Some(component) = &metadata.component {
            node.push(self.component(component));
        }
        if let Some(manufacture) = &metadata.manufacture {
            node.push(Self::entity("manufacture", manufacture));
        }
        if let Some(supplier) = &metadata.supplier {
            node.push(Self::entity("supplier", supplier));
        }
        if self.since(SpecVersion::V1_3) {
            node.push_list("licenses", self.licenses(&metadata.licenses));
            node.push_list("properties", Self::properties(&metadata.properties));
        }
        node
    }

    fn contact(name: &str, contact: &OrganizationalContact) -> XmlNode {
        let mut node = XmlNode::new(name);
        node.push_text("name", contact.name.as_deref());
        node.push_text("email", contact.email.as_deref());
        node.push_text("phone", contact.phone.as_deref());
        node
    }

    fn entity(name: &str, entity: &OrganizationalEntity) -> XmlNode {
        let mut node = XmlNode::new(name);
        node.push_text("name", entity.name.as_deref());
        for url in &entity.url {
            node.push_text("url", Some(url));
        }
        for contact in &entity.contact {
            node.push(Self::contact("contact", contact));
        }
        node
    }

    fn components(&self, components: &[Component]) -> Vec<XmlNode> {
        components.iter().map(|c| self.component(c)).collect()
    }

    fn component(&self, component: &Component) -> XmlNode {
        let mut node =
            XmlNode::new("component").with_attr("type", component.component_type.as_str());
        if self.since(SpecVersion::V1_2) {
            if let Some(mime_type) = &component.mime_type {
                node = node.with_attr("mime-type", mime_type.as_str());
            }
        }
        if self.since(SpecVersion::V1_1) {
            if let Some(bom_ref) = &component.bom_ref {
                node = node.with_attr("bom-ref", bom_ref.as_str());
            }
        }

        if self.since(SpecVersion::V1_2) {
            if let Some(supplier) = &component.supplier {
                node.push(Self::entity("supplier", supplier));
            }
            node.push_text("author", component.author.as_deref());
        }
        node.push_text("publisher", component.publisher.as_deref());
        node.push_text("group", component.group.as_deref());
        node.push_text("name", Some(&component.name));
        node.push_text("version", Some(&component.version));
        node.push_text("description", component.description.as_deref());
        node.push_text("scope", component.scope.map(|s| s.as_str()));
        node.push_list(
            "hashes",
            component
                .hashes
                .iter()
                .map(|h| {
                    XmlNode::new("hash")
                        .with_attr("alg", h.alg.as_str())
                        .with_text(h.content.as_str())
                })
                .collect(),
        );
        node.push_list("licenses", self.licenses(&component.licenses));
        node.push_text("copyright", component.copyright.as_deref());
        node.push_text("cpe", component.cpe.as_deref());
        node.push_text("purl", component.purl.as_deref());

        if self.since(SpecVersion::V1_1) {
            if let Some(modified) = component.modified {
                node.push_text("modified", Some(&modified.to_string()));
            }
            if let Some(pedigree) = &component.pedigree {
                node.push(self.pedigree(pedigree));
            }
            node.push_list(
                "externalReferences",
                self.external_references(&component.external_references),
            );
        } else {
            // Required element in 1.0
            let modified = component.modified.unwrap_or(false);
            node.push_text("modified", Some(&modified.to_string()));
        }
        if self.since(SpecVersion::V1_3) {
            node.push_list("properties", Self::properties(&component.properties));
        }
        node.push_list("components", self.components(&component.components));
        if self.since(SpecVersion::V1_3) {
            if let Some(evidence) = &component.evidence {
                node.push(self.evidence(evidence));
            }
        }
        node
    }

    fn pedigree(&self, pedigree: &Pedigree) -> XmlNode {
        let mut node = XmlNode::new("pedigree");
        node.push_list("ancestors", self.components(&pedigree.ancestors));
        node.push_list("descendants", self.components(&pedigree.descendants));
        node.push_list("variants", self.components(&pedigree.variants));
        node.push_text("notes", pedigree.notes.as_deref());
        node
    }

    fn licenses(&self, licenses: &[LicenseChoice]) -> Vec<XmlNode> {
        licenses
            .iter()
            .map(|choice| match choice {
                LicenseChoice::Expression(expression) if self.since(SpecVersion::V1_1) => {
                    XmlNode::new("expression").with_text(expression.as_str())
                }
                LicenseChoice::Expression(expression) => {
                    let mut node = XmlNode::new("license");
                    node.push_text("name", Some(expression));
                    node
                }
                LicenseChoice::License(license) => self.license(license),
            })
            .collect()
    }

    fn license(&self, license: &License) -> XmlNode {
        let mut node = XmlNode::new("license");
        match (&license.id, &license.name) {
            (Some(id), _) => node.push_text("id", Some(id)),
            (None, Some(name)) => node.push_text("name", Some(name)),
            (None, None) => {}
        }
        if let Some(text) = &license.text {
            let mut text_node = XmlNode::new("text").with_text(text.content.as_str());
            if let Some(content_type) = &text.content_type {
                text_node = text_node.with_attr("content-type", content_type.as_str());
            }
            if let Some(encoding) = &text.encoding {
                text_node = text_node.with_attr("encoding", encoding.as_str());
            }
            node.push(text_node);
        }
        if self.since(SpecVersion::V1_1) {
            node.push_text("url", license.url.as_deref());
        }
        node
    }

    fn external_references(&self, references: &[ExternalReference]) -> Vec<XmlNode> {
        references
            .iter()
            .map(|r| {
                let mut node =
                    XmlNode::new("reference").with_attr("type", r.reference_type.as_str());
                node.push_text("url", Some(&r.url));
                node.push_text("comment", r.comment.as_deref());
                node
            })
            .collect()
    }

    fn properties(properties: &[Property]) -> Vec<XmlNode> {
        properties
            .iter()
            .map(|p| {
                XmlNode::new("property")
                    .with_attr("name", p.name.as_str())
                    .with_text(p.value.as_str())
            })
            .collect()
    }

    fn evidence(&self, evidence: &Evidence) -> XmlNode {
        let mut node = XmlNode::new("evidence");
        node.push_list("licenses", self.licenses(&evidence.licenses));
        node.push_list(
            "copyright",
            evidence
                .copyright
                .iter()
                .map(|c| XmlNode::new("text").with_text(c.text.as_str()))
                .collect(),
        );
        node
    }

    fn service(&self, service: &Service) -> XmlNode {
        let mut node = XmlNode::new("service");
        if let Some(bom_ref) = &service.bom_ref {
            node = node.with_attr("bom-ref", bom_ref.as_str());
        }
        if let Some(provider) = &service.provider {
            node.push(Self::entity("provider", provider));
        }
        node.push_text("group", service.group.as_deref());
        node.push_text("name", Some(&service.name));
        node.push_text("version", service.version.as_deref());
        node.push_text("description", service.description.as_deref());
        node.push_list(
            "endpoints",
            service
                .endpoints
                .iter()
                .map(|e| XmlNode::new("endpoint").with_text(e.as_str()))
                .collect(),
        );
        node.push_text(
            "authenticated",
            service.authenticated.map(|b| b.to_string()).as_deref(),
        );
        node.push_text(
            "x-trust-boundary",
            service.x_trust_boundary.map(|b| b.to_string()).as_deref(),
        );
        node.push_list("licenses", self.licenses(&service.licenses));
        node.push_list(
            "externalReferences",
            self.external_references(&service.external_references),
        );
        if self.since(SpecVersion::V1_3) {
            node.push_list("properties", Self::properties(&service.properties));
        }
        node.push_list(
            "services",
            service.services.iter().map(|s| self.service(s)).collect(),
        );
        node
    }

    fn dependency(dependency: &Dependency) -> XmlNode {
        let mut node =
            XmlNode::new("dependency").with_attr("ref", dependency.dependency_ref.as_str());
        for target in &dependency.depends_on {
            node.push(XmlNode::new("dependency").with_attr("ref", target.as_str()));
        }
        node
    }

    fn composition(composition: &Composition) -> XmlNode {
        let refs = |item: &str, refs: &[String]| -> Vec<XmlNode> {
            refs.iter()
                .map(|r| XmlNode::new(item).with_attr("ref", r.as_str()))
                .collect()
        };
        let mut node = XmlNode::new("composition");
        node.push_text("aggregate", Some(&composition.aggregate));
        node.push_list("assemblies", refs("assembly", &composition.assemblies));
        node.push_list("dependencies", refs("dependency", &composition.dependencies));
        node
    }
}
