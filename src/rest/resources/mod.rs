//! Concrete Resolwe resource types.
//!
//! Each type is a plain serde struct implementing
//! [`ResourceKind`](crate::rest::ResourceKind). Resources are obtained through
//! the typed query accessors of [`Resolwe`](crate::Resolwe):
//!
//! ```rust,ignore
//! let sample = client.sample().get_slug("liver-1").await?;
//! let process = client.latest_process("alignment-star").await?;
//! let genes = client
//!     .feature()
//!     .filter("source", "ENSEMBL")
//!     .filter("feature_id", "ENSG00000139618")
//!     .into_vec()
//!     .await?;
//! ```
//!
//! # Available Resources
//!
//! | Type | Endpoint | Related objects |
//! |------|----------|-----------------|
//! | [`Data`] | `data` | sample |
//! | [`Collection`] | `collection` | data, samples, relations |
//! | [`Sample`] | `entity` | data, collections |
//! | [`Process`] | `process` | |
//! | [`Relation`] | `relation` | samples |
//! | [`User`] | `user` | |
//! | [`Group`] | `group` | |
//! | [`DescriptorSchema`] | `descriptorschema` | |
//! | [`Feature`] | `kb/feature` (search) | |
//! | [`Mapping`] | `kb/mapping` (search) | |

mod collection;
mod data;
mod descriptor_schema;
mod feature;
mod group;
mod process;
mod relation;
mod sample;
mod user;

pub use collection::{Collection, CollectionRelated};
pub use data::{Data, DataRelated};
pub use descriptor_schema::DescriptorSchema;
pub use feature::{Feature, Mapping};
pub use group::Group;
pub use process::Process;
pub use relation::{Relation, RelationPartition, RelationRelated};
pub use sample::{Sample, SampleRelated};
pub use user::User;
