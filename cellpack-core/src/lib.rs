#![forbid(unsafe_code)]

pub mod adapter;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod metadata;
pub mod numeric;
pub mod record;
pub mod source;

pub use config::CodecConfig;
pub use error::{CodecError, IntegrityCheck, Result};
pub use record::{build, build_all, rebuild, FileRecord, Packed};
