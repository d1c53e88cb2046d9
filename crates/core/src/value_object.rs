//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Everything the engine produces (lead-time parameters, decisions, groups) is a
/// value object: created fresh per evaluation, never mutated, compared by its
/// attribute values. Two decisions computed from the same input and rule table
/// compare equal.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct LeadTimeParams {
///     manufacturing_time_days: u32,
///     effective_delivery_time_days: u32,
///     safety_stock_days: u32,
/// }
///
/// impl ValueObject for LeadTimeParams {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
