use super::*;
use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_conversion::domain::{
    Component, ComponentType, Composition, FormatVersion, SpdxVersion,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct RecordingReporter {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingReporter {
    fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.messages.borrow_mut().push(format!(
            "[{}/{}] {}",
            current,
            total,
            message.unwrap_or_default()
        ));
    }

    fn report_error(&self, message: &str) {
        self.messages.borrow_mut().push(format!("ERROR: {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Ignores its input and yields a 1.3 document using 1.3-only fields
struct RichDecoder;

impl BomDecoder for RichDecoder {
    fn decode(&self, _data: &[u8]) -> ConvertResult<Bom> {
        let mut bom = Bom::new(SpecVersion::V1_3);
        let mut component = Component::new(ComponentType::Container, "image", "1.0");
        component.bom_ref = Some("image@1.0".to_string());
        bom.components.push(component);
        bom.compositions.push(Composition {
            aggregate: "complete".to_string(),
            ..Composition::default()
        });
        Ok(bom)
    }
}

struct FailingDecoder;

impl BomDecoder for FailingDecoder {
    fn decode(&self, _data: &[u8]) -> ConvertResult<Bom> {
        Err(SbomError::parse(WireFormat::Json, "boom"))
    }
}

/// Encodes the resulting document as debug text so tests can inspect it
struct DebugEncoder;

impl BomEncoder for DebugEncoder {
    fn encode(&self, bom: &Bom) -> ConvertResult<Vec<u8>> {
        Ok(format!("{:?}", bom).into_bytes())
    }
}

fn use_case(reporter: RecordingReporter) -> ConvertBomUseCase<RecordingReporter> {
    let mut builder = CodecRegistry::builder().decoder(WireFormat::Json, RichDecoder);
    for version in SpecVersion::ALL {
        builder = builder.encoder(FormatTarget::schema(WireFormat::Xml, version), DebugEncoder);
    }
    let registry = builder
        .encoder(FormatTarget::tag_value(SpdxVersion::V2_1), DebugEncoder)
        .build();
    ConvertBomUseCase::new(registry, reporter)
}

fn json_request(target: FormatTarget) -> ConversionRequest {
    ConversionRequest::new(b"{}".to_vec(), target).with_filename("bom.json")
}

#[test]
fn test_same_version_applies_no_steps() {
    let reporter = RecordingReporter::default();
    let uc = use_case(reporter.clone());

    let response = uc
        .execute(json_request(FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3)))
        .unwrap();

    assert_eq!(response.steps_applied, 0);
    assert_eq!(response.source_format, WireFormat::Json);
    let text = String::from_utf8(response.content).unwrap();
    assert!(text.contains("compositions: [Composition"));
    assert!(!reporter.messages().iter().any(|m| m.starts_with('[')));
}

#[test]
fn test_downgrade_to_oldest_drops_newer_fields() {
    let reporter = RecordingReporter::default();
    let uc = use_case(reporter.clone());

    let response = uc
        .execute(json_request(FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_0)))
        .unwrap();

    assert_eq!(response.steps_applied, 3);
    let text = String::from_utf8(response.content).unwrap();
    assert!(text.contains("spec_version: V1_0"));
    assert!(text.contains("compositions: []"));
    assert!(text.contains("bom_ref: None"));
    assert!(text.contains("component_type: Application"));

    let progress: Vec<_> = reporter
        .messages()
        .into_iter()
        .filter(|m| m.starts_with('['))
        .collect();
    assert_eq!(
        progress,
        vec!["[1/3] 1.3 -> 1.2", "[2/3] 1.2 -> 1.1", "[3/3] 1.1 -> 1.0"]
    );
}

#[test]
fn test_tag_value_target_is_encoded_from_newest() {
    let uc = use_case(RecordingReporter::default());

    let response = uc
        .execute(json_request(FormatTarget::tag_value(SpdxVersion::V2_1)))
        .unwrap();

    assert_eq!(response.steps_applied, 0);
    assert_eq!(
        response.target.version,
        FormatVersion::TagValue(SpdxVersion::V2_1)
    );
}

#[test]
fn test_explicit_input_format_overrides_detection() {
    let uc = use_case(RecordingReporter::default());
    let request = ConversionRequest::new(
        b"{}".to_vec(),
        FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3),
    )
    .with_filename("report.bom")
    .with_input_format(WireFormat::Json);

    assert!(uc.execute(request).is_ok());
}

#[test]
fn test_undetectable_input_fails_before_decode() {
    let reporter = RecordingReporter::default();
    let uc = use_case(reporter.clone());
    let request = ConversionRequest::new(
        b"{}".to_vec(),
        FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3),
    )
    .with_filename("report.bom");

    let err = uc.execute(request).unwrap_err();
    assert!(matches!(
        err,
        SbomError::UnsupportedFormat {
            format: WireFormat::Unsupported,
            version: None
        }
    ));
    assert!(reporter.messages().is_empty());
}

#[test]
fn test_missing_filename_and_format_is_unsupported() {
    let uc = use_case(RecordingReporter::default());
    let request = ConversionRequest::new(
        b"{}".to_vec(),
        FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3),
    );

    assert!(matches!(
        uc.execute(request),
        Err(SbomError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_unregistered_decoder_is_unsupported() {
    let uc = use_case(RecordingReporter::default());
    let request = ConversionRequest::new(
        b"a,b".to_vec(),
        FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3),
    )
    .with_filename("bom.csv");

    match uc.execute(request) {
        Err(SbomError::UnsupportedFormat { format, version }) => {
            assert_eq!(format, WireFormat::Csv);
            assert_eq!(version, None);
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.target)),
    }
}

#[test]
fn test_unsupported_target_fails_before_decode() {
    let reporter = RecordingReporter::default();
    let uc = use_case(reporter.clone());
    let target = FormatTarget::schema(WireFormat::Csv, SpecVersion::V1_0);

    match uc.execute(json_request(target)) {
        Err(SbomError::UnsupportedFormat { format, version }) => {
            assert_eq!(format, WireFormat::Csv);
            assert_eq!(version, Some(FormatVersion::Schema(SpecVersion::V1_0)));
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.target)),
    }
    assert!(reporter.messages().is_empty());
}

#[test]
fn test_decode_error_is_propagated() {
    let registry = CodecRegistry::builder()
        .decoder(WireFormat::Json, FailingDecoder)
        .encoder(
            FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3),
            DebugEncoder,
        )
        .build();
    let uc = ConvertBomUseCase::new(registry, RecordingReporter::default());

    let err = uc
        .execute(json_request(FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_3)))
        .unwrap_err();
    assert!(matches!(err, SbomError::Parse { .. }));
}

#[test]
fn test_port_lists_registry_targets() {
    let uc = use_case(RecordingReporter::default());
    let targets = uc.supported_targets();

    assert_eq!(targets.len(), 5);
    assert_eq!(
        targets[0],
        FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_0)
    );
    assert_eq!(
        targets[4],
        FormatTarget::tag_value(SpdxVersion::V2_1)
    );
}

#[test]
fn test_port_convert_delegates_to_execute() {
    let uc = use_case(RecordingReporter::default());
    let port: &dyn BomConversionPort = &uc;

    let response = port
        .convert(json_request(FormatTarget::schema(WireFormat::Xml, SpecVersion::V1_2)))
        .unwrap();
    assert_eq!(response.steps_applied, 1);
}
