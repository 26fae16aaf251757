pub mod content;
pub mod envelope;
pub mod project;
pub mod user;

/// Backend documents may carry `id`, `_id`, or both; either one names the record.
pub(crate) fn record_id(id: Option<String>, object_id: Option<String>, what: &str) -> Result<String, String> {
    id.filter(|id| !id.is_empty())
        .or(object_id.filter(|id| !id.is_empty()))
        .ok_or_else(|| format!("{} has neither `id` nor `_id`", what))
}
