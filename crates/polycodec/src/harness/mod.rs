//! Round-trip verification across codecs.
//!
//! [`round_trip`] pushes one value through one codec and checks that what
//! comes back equals what went in. Each call walks
//! `Init → Encoded → Decoded → Verified`, or stops at `Failed` with a
//! [`Failure`] naming the stage. Nothing is retried.
//!
//! [`Harness`] runs the full matrix described by a [`HarnessConfig`].

mod config;
mod runner;

use std::fmt;

use thiserror::Error;
use tracing::{debug_span, info, trace, warn};

use crate::codecs::{CodecError, ValueCodec};
use crate::{CodecId, Pack, Unpack};

pub use config::{ConfigError, HarnessConfig};
pub use runner::{Harness, Outcome, Report};

/// What kind of value a round trip exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The concrete record, decoded as itself.
    Record,
    /// The record behind a [`crate::Capability`], decoded through the registry.
    Capability,
    Int64FloatMap,
    MapSequence,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Record => "record",
            ValueKind::Capability => "capability",
            ValueKind::Int64FloatMap => "int64-float-map",
            ValueKind::MapSequence => "map-sequence",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a single round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Encoded,
    Decoded,
    Verified,
    Failed,
}

/// The step a failed round trip did not get past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Encode,
    Decode,
    Verify,
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailedStage::Encode => "encode",
            FailedStage::Decode => "decode",
            FailedStage::Verify => "verify",
        })
    }
}

#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("decoded value differs from the original")]
    Mismatch,
}

#[derive(Debug, Error)]
#[error("{codec} {kind} round trip failed at {stage}: {cause}")]
pub struct Failure {
    pub codec: CodecId,
    pub kind: ValueKind,
    pub stage: FailedStage,
    pub cause: FailureCause,
}

/// A round trip that came back equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verified {
    pub codec: CodecId,
    pub kind: ValueKind,
    pub encoded_len: usize,
}

/// Encodes `value`, decodes the bytes as `T` and compares.
pub fn round_trip<C, T>(codec: &mut C, kind: ValueKind, value: &T) -> Result<Verified, Failure>
where
    C: ValueCodec,
    T: Pack + Unpack + PartialEq,
{
    let id = codec.id();
    let span = debug_span!("round_trip", codec = %id, %kind);
    let _guard = span.enter();
    trace!(stage = ?Stage::Init);

    let fail = |stage: FailedStage, cause: FailureCause| {
        warn!(stage = ?Stage::Failed, failed_at = %stage, error = %cause, "round trip failed");
        Failure {
            codec: id,
            kind,
            stage,
            cause,
        }
    };

    let bytes = codec
        .encode_value(value)
        .map_err(|err| fail(FailedStage::Encode, err.into()))?;
    trace!(stage = ?Stage::Encoded, len = bytes.len());

    let decoded: T = codec
        .decode_value(&bytes)
        .map_err(|err| fail(FailedStage::Decode, err.into()))?;
    trace!(stage = ?Stage::Decoded);

    if decoded != *value {
        return Err(fail(FailedStage::Verify, FailureCause::Mismatch));
    }
    info!(stage = ?Stage::Verified, encoded_len = bytes.len(), "round trip verified");
    Ok(Verified {
        codec: id,
        kind,
        encoded_len: bytes.len(),
    })
}
