//! One module per error kind, each exposing a constructor function.
//!
//! Codes are stable: tooling may match on them, so a retired code is never reused.

mod e0001_illegal_token;
mod e0002_unfinished_string;
mod e0003_unfinished_long_bracket;
mod e0004_invalid_long_bracket;
mod e0005_unexpected_token;
mod e0006_unclosed_construct;
mod e0007_missing_name;
mod e0008_unknown_attribute;
mod e0009_unexpected_symbol;
mod e0010_invalid_assignment_target;
mod e0011_malformed_number;
mod e0012_too_many_errors;
mod e0013_too_many_levels;

pub mod constructors {
    pub use super::e0001_illegal_token::*;
    pub use super::e0002_unfinished_string::*;
    pub use super::e0003_unfinished_long_bracket::*;
    pub use super::e0004_invalid_long_bracket::*;
    pub use super::e0005_unexpected_token::*;
    pub use super::e0006_unclosed_construct::*;
    pub use super::e0007_missing_name::*;
    pub use super::e0008_unknown_attribute::*;
    pub use super::e0009_unexpected_symbol::*;
    pub use super::e0010_invalid_assignment_target::*;
    pub use super::e0011_malformed_number::*;
    pub use super::e0012_too_many_errors::*;
    pub use super::e0013_too_many_levels::*;
}
