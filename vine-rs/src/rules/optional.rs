//! Conditional requirement rules for optional fields.
//!
//! All of them are implicit: they run while the field is undefined and report
//! `required` when their condition holds.

use super::sibling_defined;
use crate::messages;
use crate::rule::{RuleFactory, RuleMetadata, create_rule};
use std::sync::{Arc, LazyLock};
use vine_rs_compiler::FieldContext;

/// Decides whether an undefined optional field is required after all.
pub type RequiredWhenFn = Arc<dyn Fn(&FieldContext) -> bool + Send + Sync>;

fn report_missing(field: &mut FieldContext, required: bool) {
    if required && !field.is_defined() {
        field.report(messages::REQUIRED, "required", None);
    }
}

/// Required when any of the listed siblings is present.
pub static REQUIRED_IF_EXISTS: LazyLock<RuleFactory<Vec<String>>> = LazyLock::new(|| {
    create_rule(
        "requiredIfExists",
        |others: &Vec<String>, field| {
            let required = others.iter().any(|name| sibling_defined(field, name));
            report_missing(field, required);
            Ok(())
        },
        RuleMetadata::new().implicit(),
    )
});

/// Required when any of the listed siblings is missing.
pub static REQUIRED_IF_MISSING: LazyLock<RuleFactory<Vec<String>>> = LazyLock::new(|| {
    create_rule(
        "requiredIfMissing",
        |others: &Vec<String>, field| {
            let required = others.iter().any(|name| !sibling_defined(field, name));
            report_missing(field, required);
            Ok(())
        },
        RuleMetadata::new().implicit(),
    )
});

pub static REQUIRED_WHEN: LazyLock<RuleFactory<RequiredWhenFn>> = LazyLock::new(|| {
    create_rule(
        "requiredWhen",
        |condition: &RequiredWhenFn, field| {
            let required = !field.is_defined() && condition(field);
            report_missing(field, required);
            Ok(())
        },
        RuleMetadata::new().implicit(),
    )
});
