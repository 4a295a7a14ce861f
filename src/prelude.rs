//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate,
//! allowing for convenient glob imports:
//!
//! ```
//! use someip_sd_config::prelude::*;
//! ```

pub use crate::config::{ConfigurationOption, Record, Records, TrailingBytesPolicy};
pub use crate::error::{ConfigError, Error};
pub use crate::header::{DiscardableFlag, OptionHeader, OptionHeaderRepr, OptionType};
pub use crate::options::{
    Ipv4EndpointRepr, Ipv6EndpointRepr, LoadBalancingRepr, SdOption, TransportProtocol,
};
pub use crate::wire::{ByteSink, Reader, SliceSink};
