//! Unit tests for configuration loading and validation.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token and repository URL resolution tests
//! - `loading`: Environment and CLI loading tests
//! - `parameters`: Conversion into fetch parameters

mod helpers;
