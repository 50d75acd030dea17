//! camelCase/snake_case key transcoding for HTTP client hooks.
//!
//! Application code works with camelCase object keys while the wire speaks
//! snake_case. Installing the converter on a client's hook chains rewrites:
//!
//! - outgoing query params, or the body when there are no params, to
//!   snake_case (pre-serialized string bodies are left alone)
//! - incoming response bodies to camelCase (empty bodies are left alone)
//!
//! Keys matching an exclusion rule, exact or regex, keep their spelling at
//! that level. Their children are still converted.
//!
//! ## Configuration Example
//!
//! ```yaml
//! request_exclude:
//!   - snakeCaseExclude
//! response_exclude:
//!   - { pattern: "exclude$", type: regex }
//! ```

pub mod client;
pub mod config;
pub mod converter;
pub mod hooks;
pub mod matcher;
pub mod transformer;

pub use client::{Client, InterceptorManager, Transport};
pub use config::{ConfigError, ConverterConfig, ExcludeConfig, PatternType};
pub use converter::{install, install_default, CaseConverter, ConverterOptions};
pub use hooks::{HookChain, HookError, HookHandle, HookHandles, RequestConfig, Response};
pub use matcher::{ExclusionSet, KeyMatcher, MatcherError};
pub use transformer::{convert, Direction, KeyTransformer};
