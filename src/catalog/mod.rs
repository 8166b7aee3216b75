//! # Canonical catalog model
//!
//! Every provider normalizes its upstream records into these types. The
//! serialized form is the on-disk catalog format.

pub mod flavor;
pub mod model;

pub use flavor::{classify_flavor, ClassificationMiss, GameVersion};
pub use model::{Addon, Source, Version};
