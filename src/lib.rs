#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::too_long_first_doc_paragraph)]

pub mod error;
pub mod storage;

pub use error::{Error, Result};
pub use storage::{AutoCompact, LoaderKind, Mode, Options, Status, Store};
