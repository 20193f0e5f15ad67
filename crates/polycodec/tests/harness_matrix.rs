use std::sync::Arc;

use polycodec::codecs::{CodecError, TinyCodec};
use polycodec::harness::{round_trip, FailedStage, FailureCause, Harness, HarnessConfig, ValueKind};
use polycodec::registry::{default_registry, TypeRegistry};
use polycodec::{new_map_sequence, new_record, Capability, CodecId};

#[test]
fn full_matrix_from_toml() {
    let config = HarnessConfig::from_toml_str(
        r#"
        codecs = ["cbor", "msgpack", "tiny", "json"]
        map_size = 250
        sequence_size = 20
        "#,
    )
    .unwrap();
    let mut harness = Harness::with_registry(config, Arc::new(default_registry().unwrap()));
    let report = harness.run();

    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 16);
    for codec in CodecId::ALL {
        let kinds: Vec<_> = report
            .verified()
            .filter(|v| v.codec == codec)
            .map(|v| v.kind)
            .collect();
        let first = if codec == CodecId::Json {
            ValueKind::Record
        } else {
            ValueKind::Capability
        };
        assert_eq!(
            kinds,
            vec![
                first,
                ValueKind::Int64FloatMap,
                ValueKind::Int64FloatMap,
                ValueKind::MapSequence
            ]
        );
    }
}

#[test]
fn config_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("polycodec-harness-{}.toml", std::process::id()));
    std::fs::write(&path, "codecs = [\"tiny\"]\nsequence_size = 3\n").unwrap();
    let config = HarnessConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.codecs, vec![CodecId::Tiny]);
    assert_eq!(config.map_size, 100);
    let report = Harness::with_registry(config, Arc::new(default_registry().unwrap())).run();
    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 4);
}

#[test]
fn unregistered_capability_is_reported_not_zeroed() {
    let cap: Capability = Box::new(new_record());
    let mut codec = TinyCodec::with_registry(Arc::new(TypeRegistry::empty()));
    let failure = round_trip(&mut codec, ValueKind::Capability, &cap).unwrap_err();
    assert_eq!(failure.codec, CodecId::Tiny);
    assert_eq!(failure.kind, ValueKind::Capability);
    assert_eq!(failure.stage, FailedStage::Encode);
    assert!(matches!(
        failure.cause,
        FailureCause::Codec(CodecError::UnsupportedType { .. })
    ));
}

#[test]
fn sequence_round_trip_reports_size() {
    let sequence = new_map_sequence(5);
    let registry = Arc::new(default_registry().unwrap());
    let verified = round_trip(
        &mut TinyCodec::with_registry(registry),
        ValueKind::MapSequence,
        &sequence,
    )
    .unwrap();
    // 1 count byte, then per map: 1 count byte and 5 × (1 key byte + 8 float bytes)
    assert_eq!(verified.encoded_len, 1 + 5 * (1 + 5 * 9));
}
