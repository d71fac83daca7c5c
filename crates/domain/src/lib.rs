//! schemactl domain types.
//!
//! Pure schema-lifecycle rules with no I/O: index descriptors and their
//! canonical order, engine version profiles, DDL synthesis, build status and
//! size-tiered batching.

pub mod bucket;
pub mod cypher;
pub mod descriptor;
pub mod error;
pub mod status;
pub mod version;

pub use bucket::{Batch, Bucket, BucketPolicy, SizeTier};
pub use descriptor::{
    canonical_cmp, sort_canonical, EntityType, IndexDescriptor, IndexKind,
    ALTERNATE_INDEX_PROVIDER, DEFAULT_INDEX_PROVIDER,
};
pub use error::DomainError;
pub use status::{IndexState, IndexStatus};
pub use version::{ConstraintSyntax, VersionProfile};
