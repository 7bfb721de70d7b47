//! Test module for vine-rs
//!
//! Behavior tests for the schema builders, the built-in rules, the validator
//! facade and message resolution, plus property-based tests using proptest.

#[cfg(test)]
pub mod support;


#[cfg(test)]
pub mod schema_tests;


#[cfg(test)]
pub mod validator_tests;
