//! Registration errors.

use thiserror::Error;

use super::TypeTag;
use crate::CodecId;

/// A registration that would make the registry ambiguous. These are
/// programming errors and surface at registration time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{codec}: tag {tag} is bound to `{existing}`, cannot bind `{requested}`")]
    TagConflict {
        codec: CodecId,
        tag: TypeTag,
        existing: &'static str,
        requested: &'static str,
    },
    #[error("{codec}: `{type_name}` is registered under {existing}, cannot re-register under {requested}")]
    TypeConflict {
        codec: CodecId,
        type_name: &'static str,
        existing: TypeTag,
        requested: TypeTag,
    },
    #[error("{codec} cannot carry type tag {tag}")]
    TagNotAccepted { codec: CodecId, tag: TypeTag },
    #[error("process-wide type registry is already installed")]
    AlreadyInstalled,
}
