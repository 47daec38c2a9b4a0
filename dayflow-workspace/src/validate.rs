//! Input normalization shared by commands

use crate::error::{Result, WorkspaceError};

/// Trim a title and check it is non-empty and at most `max` characters
pub fn title(field: &str, value: &str, max: u32) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::invalid_value(field, "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > max as usize {
        return Err(WorkspaceError::invalid_value(
            field,
            format!("must be at most {max} characters (got {len})"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text; blank becomes `None`
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trimmed, non-empty, de-duplicated tags in their original order
pub fn tags(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for tag in values.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !out.iter().any(|existing| existing == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// An absolute URL
pub fn link(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    url::Url::parse(trimmed)
        .map_err(|e| WorkspaceError::invalid_value(field, format!("invalid url: {e}")))?;
    Ok(trimmed.to_string())
}

/// Fail when creating one more entity would exceed `limit`
pub fn within_limit(resource: &'static str, current: u32, limit: u32) -> Result<()> {
    if current >= limit {
        Err(WorkspaceError::LimitReached { resource, limit })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed_and_bounded() {
        assert_eq!(title("title", "  To Do ", 191).unwrap(), "To Do");
        assert!(title("title", "   ", 191).is_err());
        assert!(title("title", &"x".repeat(192), 191).is_err());
        assert!(title("title", &"é".repeat(191), 191).is_ok());
    }

    #[test]
    fn test_tags_dedupe() {
        let input = vec![" a".to_string(), "b".into(), "a".into(), "".into()];
        assert_eq!(tags(&input), vec!["a", "b"]);
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" hi ")), Some("hi".to_string()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_within_limit() {
        assert!(within_limit("columns", 19, 20).is_ok());
        assert!(matches!(
            within_limit("columns", 20, 20),
            Err(WorkspaceError::LimitReached { limit: 20, .. })
        ));
    }
}
