use crate::sbom_conversion::domain::{
    Bom, Component, ComponentType, License, LicenseChoice, Pedigree, Scope, Service, SpecVersion,
};
use log::{debug, trace};

/// Converts a BOM at one schema version into the adjacent older version
pub type DowngradeStep = fn(Bom) -> Bom;

/// Adjacent-pair converters, oldest first
///
/// Entry `i` converts a BOM at `SpecVersion::ALL[i + 1]` down to
/// `SpecVersion::ALL[i]`.
const STEPS: [(SpecVersion, DowngradeStep); 3] = [
    (SpecVersion::V1_1, downgrade_1_1_to_1_0),
    (SpecVersion::V1_2, downgrade_1_2_to_1_1),
    (SpecVersion::V1_3, downgrade_1_3_to_1_2),
];

/// Hash algorithms known to the 1.0 and 1.1 schemas
const LEGACY_HASH_ALGORITHMS: [&str; 7] = [
    "MD5", "SHA-1", "SHA-256", "SHA-384", "SHA-512", "SHA3-256", "SHA3-512",
];

/// DowngradeChain service for lossy schema version conversion
///
/// Every step is total: fields that do not exist in the older version are
/// dropped or folded into an older shape, never reported as errors. Steps
/// always run one adjacent pair at a time, newest first, so converting
/// N -> N-2 is exactly N -> N-1 -> N-2.
pub struct DowngradeChain;

impl DowngradeChain {
    /// Converts a BOM to the adjacent older schema version
    ///
    /// A BOM already at the oldest version is returned unchanged.
    pub fn downgrade(bom: Bom) -> Bom {
        match Self::step_from(bom.spec_version) {
            Some(step) => step(bom),
            None => bom,
        }
    }

    /// Applies `count` downgrade steps, stopping at the oldest version
    pub fn downgrade_steps(bom: Bom, count: usize) -> Bom {
        let target_index = bom.spec_version.index().saturating_sub(count);
        Self::downgrade_to(bom, SpecVersion::ALL[target_index])
    }

    /// Walks the chain from the BOM's current version down to `target`
    ///
    /// A target at or above the current version leaves the BOM unchanged;
    /// the chain never upgrades.
    pub fn downgrade_to(bom: Bom, target: SpecVersion) -> Bom {
        Self::steps_between(bom.spec_version, target)
            .iter()
            .rev()
            .fold(bom, |bom, (from, step)| {
                debug!(
                    "Downgrading BOM from {} to {}",
                    from,
                    from.previous().unwrap_or(*from)
                );
                step(bom)
            })
    }

    /// The steps needed to go from `from` down to `to`, oldest first
    pub fn steps_between(
        from: SpecVersion,
        to: SpecVersion,
    ) -> &'static [(SpecVersion, DowngradeStep)] {
        if to >= from {
            return &[];
        }
        &STEPS[to.index()..from.index()]
    }

    fn step_from(version: SpecVersion) -> Option<DowngradeStep> {
        version
            .index()
            .checked_sub(1)
            .map(|i| STEPS[i].1)
    }
}

/// 1.3 -> 1.2: properties, compositions and evidence do not exist yet
fn downgrade_1_3_to_1_2(mut bom: Bom) -> Bom {
    if !bom.compositions.is_empty() {
        debug!("Dropping {} composition(s)", bom.compositions.len());
        bom.compositions.clear();
    }

    if let Some(metadata) = bom.metadata.as_mut() {
        metadata.licenses.clear();
        metadata.properties.clear();
        metadata.component = metadata
            .component
            .take()
            .map(|c| map_component(c, component_1_3_to_1_2));
    }

    bom.components = map_components(bom.components, component_1_3_to_1_2);
    bom.services = map_services(bom.services, service_1_3_to_1_2);
    bom.spec_version = SpecVersion::V1_2;
    bom
}

fn component_1_3_to_1_2(mut component: Component) -> Component {
    component.properties.clear();

    // Evidence folds back into the declared fields when those are empty
    if let Some(evidence) = component.evidence.take() {
        if component.copyright.is_none() && !evidence.copyright.is_empty() {
            let texts: Vec<String> = evidence.copyright.into_iter().map(|c| c.text).collect();
            component.copyright = Some(texts.join("\n"));
        }
        if component.licenses.is_empty() {
            component.licenses = evidence.licenses;
        }
        trace!("Folded evidence of component '{}'", component.name);
    }

    component
}

fn service_1_3_to_1_2(mut service: Service) -> Service {
    service.properties.clear();
    service
}

/// 1.2 -> 1.1: metadata, services and dependencies do not exist yet
fn downgrade_1_2_to_1_1(mut bom: Bom) -> Bom {
    if bom.metadata.take().is_some() {
        debug!("Dropping BOM metadata");
    }
    if !bom.services.is_empty() {
        debug!("Dropping {} service(s)", bom.services.len());
        bom.services.clear();
    }
    if !bom.dependencies.is_empty() {
        debug!("Dropping {} dependency relationship(s)", bom.dependencies.len());
        bom.dependencies.clear();
    }

    bom.components = map_components(bom.components, component_1_2_to_1_1);
    bom.spec_version = SpecVersion::V1_1;
    bom
}

fn component_1_2_to_1_1(mut component: Component) -> Component {
    component.mime_type = None;
    component.supplier = None;

    let before = component.hashes.len();
    component
        .hashes
        .retain(|hash| LEGACY_HASH_ALGORITHMS.contains(&hash.alg.as_str()));
    if component.hashes.len() < before {
        debug!(
            "Dropping {} hash(es) of component '{}' with algorithms unknown before 1.2",
            before - component.hashes.len(),
            component.name
        );
    }

    if let Some(author) = component.author.take() {
        if component.publisher.is_none() {
            component.publisher = Some(author);
        }
    }

    component.component_type = match component.component_type {
        ComponentType::Container => ComponentType::Application,
        ComponentType::Firmware => ComponentType::Device,
        other => other,
    };

    component
}

/// 1.1 -> 1.0: no serial numbers, references, pedigree or license expressions
fn downgrade_1_1_to_1_0(mut bom: Bom) -> Bom {
    bom.serial_number = None;
    bom.external_references.clear();
    bom.components = map_components(bom.components, component_1_1_to_1_0);
    bom.spec_version = SpecVersion::V1_0;
    bom
}

fn component_1_1_to_1_0(mut component: Component) -> Component {
    component.bom_ref = None;
    component.external_references.clear();

    // 1.0 requires the modified flag; pedigree is its successor
    let modified = component.modified.unwrap_or(false) || component.pedigree.is_some();
    component.pedigree = None;
    component.modified = Some(modified);

    component.licenses = component
        .licenses
        .into_iter()
        .map(legacy_license)
        .collect();

    if component.component_type == ComponentType::File {
        component.component_type = ComponentType::Library;
    }
    if component.scope == Some(Scope::Excluded) {
        component.scope = Some(Scope::Optional);
    }

    component
}

fn legacy_license(choice: LicenseChoice) -> LicenseChoice {
    match choice {
        LicenseChoice::Expression(expression) => LicenseChoice::License(License {
            name: Some(expression),
            ..License::default()
        }),
        LicenseChoice::License(license) => LicenseChoice::License(License {
            url: None,
            ..license
        }),
    }
}

fn map_components(
    components: Vec<Component>,
    step: fn(Component) -> Component,
) -> Vec<Component> {
    components
        .into_iter()
        .map(|c| map_component(c, step))
        .collect()
}

/// Applies a per-component step to a component and everything nested in it
fn map_component(component: Component, step: fn(Component) -> Component) -> Component {
    let mut component = step(component);
    component.components = map_components(std::mem::take(&mut component.components), step);
    component.pedigree = component.pedigree.take().map(|pedigree| Pedigree {
        ancestors: map_components(pedigree.ancestors, step),
        descendants: map_components(pedigree.descendants, step),
        variants: map_components(pedigree.variants, step),
        notes: pedigree.notes,
    });
    component
}

fn map_services(services: Vec<Service>, step: fn(Service) -> Service) -> Vec<Service> {
    services
        .into_iter()
        .map(|service| {
            let mut service = step(service);
            service.services = map_services(std::mem::take(&mut service.services), step);
            service
        })
        .collect()
}
