use std::sync::Arc;

use polycodec::codecs::{Codecs, ValueCodec};
use polycodec::registry::default_registry;
use polycodec::{new_map_sequence, MapSequence};

fn assert_sequence_survives<C: ValueCodec>(codec: &mut C, sequence: &MapSequence) {
    let bytes = codec.encode_value(sequence).unwrap();
    let decoded: MapSequence = codec.decode_value(&bytes).unwrap();
    assert_eq!(decoded.len(), 1000);
    assert!(decoded.iter().all(|map| map.len() == 1000));
    assert_eq!(&decoded, sequence);
}

#[test]
fn thousand_by_thousand_sequence_matrix() {
    let sequence = new_map_sequence(1000);
    let mut codecs = Codecs::with_registry(Arc::new(default_registry().unwrap()));
    assert_sequence_survives(&mut codecs.cbor, &sequence);
    assert_sequence_survives(&mut codecs.msgpack, &sequence);
    assert_sequence_survives(&mut codecs.tiny, &sequence);
    assert_sequence_survives(&mut codecs.json, &sequence);
}
