#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod accounts;
mod error;
mod schema;
mod sequences;
mod service;
mod store;

pub use crate::accounts::*;
pub use crate::error::*;
pub use crate::schema::*;
pub use crate::sequences::*;
pub use crate::service::*;
pub use crate::store::*;
