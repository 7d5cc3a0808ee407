pub mod bom;
pub mod spec_version;
pub mod wire_format;

pub use bom::{
    AttachedText, Bom, Component, ComponentType, Composition, Copyright, Dependency, Evidence,
    ExternalReference, Hash, License, LicenseChoice, Metadata, OrganizationalContact,
    OrganizationalEntity, Pedigree, Property, Scope, Service, Tool,
};
pub use spec_version::{SpdxVersion, SpecVersion};
pub use wire_format::{FormatTarget, FormatVersion, WireFormat};
