//! Raw messages reported by the engine itself.
//!
//! Providers may override any of them through the rule name they are
//! reported under.

/// Rule `required`: a non-optional field is missing.
pub const REQUIRED: &str = "The {{ field }} field must be defined";

/// Rule `object`: an object or record field holds something else.
pub const OBJECT: &str = "The {{ field }} field must be an object";

/// Rule `array`: an array or tuple field holds something else.
pub const ARRAY: &str = "The {{ field }} field must be an array";

/// Rule `union`: no union branch matched.
pub const UNION: &str = "Invalid value provided for {{ field }} field";

/// Rule `unionGroup`: no object group matched.
pub const UNION_GROUP: &str = "Invalid value provided for {{ field }} field";
