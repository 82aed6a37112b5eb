//! Which elements the magnifier must never touch.

use crate::types::ElementInfo;

/// Form controls: rewrapping their text would break input handling.
pub const FORM_CONTROL_TAGS: &[&str] = &["input", "textarea", "select", "option", "button"];

/// Script, style and embedding tags whose text is not rendered prose.
pub const NON_TEXT_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "math", "canvas", "iframe", "object",
    "embed",
];

/// Check whether text owned by `element` is off limits.
///
/// Text inside a previous highlight wrapper is excluded as well, otherwise the
/// next hit test lands on the wrapper we just created and feeds back into itself.
pub fn is_excluded(element: &ElementInfo) -> bool {
    let tag = element.tag.as_str();
    FORM_CONTROL_TAGS.contains(&tag)
        || NON_TEXT_TAGS.contains(&tag)
        || element.content_editable
        || element.inside_embedded
        || element.inside_highlight
}

/// Same as [`is_excluded`] for a possibly missing owner; orphan text is excluded.
pub fn classify_exclusion(element: Option<&ElementInfo>) -> bool {
    element.is_none_or(is_excluded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_allowed() {
        for tag in ["p", "span", "li", "td", "h1", "a", "em"] {
            assert!(!is_excluded(&ElementInfo::new(tag)), "{tag}");
        }
    }

    #[test]
    fn test_excluded_tags() {
        for tag in ["input", "TEXTAREA", "script", "style", "noscript", "svg", "iframe"] {
            assert!(is_excluded(&ElementInfo::new(tag)), "{tag}");
        }
    }

    #[test]
    fn test_content_editable_excluded() {
        assert!(is_excluded(&ElementInfo::new("div").content_editable(true)));
    }

    #[test]
    fn test_inside_wrappers_excluded() {
        assert!(is_excluded(&ElementInfo::new("span").inside_highlight(true)));
        assert!(is_excluded(&ElementInfo::new("text").inside_embedded(true)));
    }

    #[test]
    fn test_orphan_text_excluded() {
        assert!(classify_exclusion(None));
        assert!(!classify_exclusion(Some(&ElementInfo::new("p"))));
    }
}
