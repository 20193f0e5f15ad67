use std::sync::Arc;

use polycodec::codecs::{Codecs, ValueCodec};
use polycodec::registry::default_registry;
use polycodec::{Capability, Int64FloatMap, Record};
use proptest::collection::{hash_map, vec};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

fn round_trips<T, C>(codec: &mut C, value: &T) -> bool
where
    C: ValueCodec,
    T: polycodec::Pack + polycodec::Unpack + PartialEq,
{
    let bytes = codec.encode_value(value).unwrap();
    codec.decode_value::<T>(&bytes).unwrap() == *value
}

proptest! {
    #[test]
    fn arbitrary_maps_round_trip(map in hash_map(any::<i64>(), finite(), 0..64)) {
        let map: Int64FloatMap = map;
        let mut codecs = Codecs::with_registry(Arc::new(default_registry().unwrap()));
        prop_assert!(round_trips(&mut codecs.cbor, &map));
        prop_assert!(round_trips(&mut codecs.msgpack, &map));
        prop_assert!(round_trips(&mut codecs.tiny, &map));
        prop_assert!(round_trips(&mut codecs.json, &map));
    }

    #[test]
    fn arbitrary_records_round_trip(
        name in ".*",
        body in vec(any::<u8>(), 0..300),
        value in finite(),
    ) {
        let record = Record::new(name.clone(), body, value);
        let cap: Capability = Box::new(record.clone());
        let mut codecs = Codecs::with_registry(Arc::new(default_registry().unwrap()));
        prop_assert!(round_trips(&mut codecs.cbor, &cap));
        prop_assert!(round_trips(&mut codecs.msgpack, &cap));
        prop_assert!(round_trips(&mut codecs.tiny, &cap));
        prop_assert!(round_trips(&mut codecs.json, &record));

        let bytes = codecs.tiny.encode_value(&cap).unwrap();
        let decoded: Capability = codecs.tiny.decode_value(&bytes).unwrap();
        prop_assert_eq!(decoded.name(), name.as_str());
    }
}
