#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod checksum;
mod config;
mod error;
mod format;
mod id;
mod issuer;
mod period;
mod scope;
#[cfg(feature = "serde")]
mod serde;
mod store;
mod validate;

pub use crate::checksum::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::format::*;
pub use crate::id::*;
pub use crate::issuer::*;
pub use crate::period::*;
pub use crate::scope::*;
pub use crate::store::*;
pub use crate::validate::*;
