//! Import core: request translation, phase orchestration and checksums
//!
//! - [`DecodedImport`] decodes an [`ImportRequest`] and builds the three
//!   backend payloads
//! - [`Importer`] runs stage object → stage metadata → apply, failing fast
//! - [`checksum`] digests each artifact for the apply request

mod checksum;
mod error;
pub mod models;
mod orchestrator;
mod translator;

pub use checksum::{CHECKSUM_ALGORITHM, checksum};
pub use error::ImportError;
pub use models::{ImportRequest, ImportResponse, PreservationObject};
pub use orchestrator::Importer;
pub use translator::{DecodedImport, METADATA_ENCODING};
