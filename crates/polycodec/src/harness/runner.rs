//! The full codec × value-kind matrix.

use std::sync::Arc;

use tracing::info;

use super::{round_trip, Failure, HarnessConfig, ValueKind, Verified};
use crate::codecs::{Codecs, ValueCodec};
use crate::registry::{self, TypeRegistry};
use crate::{
    new_int64_float_map, new_map_sequence, new_record, Capability, CodecId, Int64FloatMap,
    MapSequence, Record,
};

pub type Outcome = Result<Verified, Failure>;

/// Every outcome of one [`Harness::run`], in execution order.
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn verified(&self) -> impl Iterator<Item = &Verified> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

struct Samples {
    record: Record,
    map: Int64FloatMap,
    empty: Int64FloatMap,
    sequence: MapSequence,
}

pub struct Harness {
    config: HarnessConfig,
    codecs: Codecs,
}

impl Harness {
    /// Runs against the process-wide registry.
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_registry(config, registry::global())
    }

    pub fn with_registry(config: HarnessConfig, registry: Arc<TypeRegistry>) -> Self {
        Self {
            config,
            codecs: Codecs::with_registry(registry),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// For each configured codec: the record (through the capability where
    /// the codec carries type tags), a map, an empty map and a sequence.
    pub fn run(&mut self) -> Report {
        let samples = Samples {
            record: new_record(),
            map: new_int64_float_map(self.config.map_size),
            empty: Int64FloatMap::new(),
            sequence: new_map_sequence(self.config.sequence_size),
        };
        let mut report = Report::default();
        for codec in &self.config.codecs {
            let outcomes = &mut report.outcomes;
            match codec {
                CodecId::Cbor => run_codec(&mut self.codecs.cbor, &samples, outcomes),
                CodecId::MsgPack => run_codec(&mut self.codecs.msgpack, &samples, outcomes),
                CodecId::Tiny => run_codec(&mut self.codecs.tiny, &samples, outcomes),
                CodecId::Json => run_codec(&mut self.codecs.json, &samples, outcomes),
            }
        }
        info!(
            verified = report.verified().count(),
            failed = report.failures().count(),
            "harness finished"
        );
        report
    }
}

fn run_codec<C: ValueCodec>(codec: &mut C, samples: &Samples, outcomes: &mut Vec<Outcome>) {
    if codec.id().carries_type_tags() {
        let cap: Capability = Box::new(samples.record.clone());
        outcomes.push(round_trip(codec, ValueKind::Capability, &cap));
    } else {
        outcomes.push(round_trip(codec, ValueKind::Record, &samples.record));
    }
    outcomes.push(round_trip(codec, ValueKind::Int64FloatMap, &samples.map));
    outcomes.push(round_trip(codec, ValueKind::Int64FloatMap, &samples.empty));
    outcomes.push(round_trip(codec, ValueKind::MapSequence, &samples.sequence));
}
