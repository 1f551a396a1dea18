//! Allowlist policy for the sanitizer.

use std::collections::HashSet;

/// Tags the default policy keeps (basic rich-text formatting).
const DEFAULT_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol",
    "li", "a", "span", "div",
];

/// Attributes the default policy keeps, on any element.
const DEFAULT_ATTRIBUTES: &[&str] = &["href", "target", "style"];

/// CSS properties the default policy keeps inside a `style` attribute.
const DEFAULT_STYLE_PROPERTIES: &[&str] = &[
    "font-weight",
    "font-style",
    "text-decoration",
    "font-size",
    "font-family",
    "color",
];

/// Allowlists controlling what survives sanitization.
///
/// Tags and attributes are membership sets; style properties are an ordered
/// list because a surviving `style` value is re-emitted in this enumeration
/// order. The attribute allowlist applies to every element - there is no
/// per-tag restriction, so e.g. a `<p>` may keep an `href` it arrived with.
///
/// All names are stored lower-cased; lookups lower-case their argument.
///
/// ```
/// use suds::Policy;
///
/// let policy = Policy::new()
///     .with_tags(["p", "em", "strong"])
///     .allow_attribute("href");
///
/// assert!(policy.allows_tag("EM"));
/// assert!(!policy.allows_tag("table"));
/// ```
#[derive(Debug, Clone)]
pub struct Policy {
    allowed_tags: HashSet<String>,
    allowed_attributes: HashSet<String>,
    allowed_style_properties: Vec<String>,
}

impl Policy {
    /// Create an empty policy (everything is unwrapped or stripped).
    pub fn new() -> Self {
        Self {
            allowed_tags: HashSet::new(),
            allowed_attributes: HashSet::new(),
            allowed_style_properties: Vec::new(),
        }
    }

    /// Add a set of allowed tag names.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.allowed_tags.insert(tag.as_ref().to_ascii_lowercase());
        }
        self
    }

    /// Add a set of allowed attribute names.
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for attr in attributes {
            self.allowed_attributes
                .insert(attr.as_ref().to_ascii_lowercase());
        }
        self
    }

    /// Add a set of allowed `style` property names, in output order.
    pub fn with_style_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for prop in properties {
            let prop = prop.as_ref().to_ascii_lowercase();
            if !self.allowed_style_properties.contains(&prop) {
                self.allowed_style_properties.push(prop);
            }
        }
        self
    }

    /// Allow a single tag name.
    pub fn allow_tag(self, tag: &str) -> Self {
        self.with_tags([tag])
    }

    /// Allow a single attribute name.
    pub fn allow_attribute(self, attribute: &str) -> Self {
        self.with_attributes([attribute])
    }

    /// Allow a single `style` property name.
    pub fn allow_style_property(self, property: &str) -> Self {
        self.with_style_properties([property])
    }

    /// Check whether a tag may remain as an element.
    pub fn allows_tag(&self, tag: &str) -> bool {
        if self.allowed_tags.contains(tag) {
            return true;
        }
        self.allowed_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Check whether an attribute may remain on a surviving element.
    pub fn allows_attribute(&self, attribute: &str) -> bool {
        if self.allowed_attributes.contains(attribute) {
            return true;
        }
        self.allowed_attributes
            .contains(&attribute.to_ascii_lowercase())
    }

    /// Allowed `style` property names, in output order.
    pub fn style_properties(&self) -> &[String] {
        &self.allowed_style_properties
    }
}

impl Default for Policy {
    /// The rich-text editor policy: basic formatting tags, `href`/`target`/
    /// `style` attributes, and font/color style properties.
    fn default() -> Self {
        Self::new()
            .with_tags(DEFAULT_TAGS)
            .with_attributes(DEFAULT_ATTRIBUTES)
            .with_style_properties(DEFAULT_STYLE_PROPERTIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = Policy::default();
        assert!(policy.allows_tag("p"));
        assert!(policy.allows_tag("h6"));
        assert!(!policy.allows_tag("table"));
        assert!(policy.allows_attribute("href"));
        assert!(!policy.allows_attribute("onclick"));
        assert_eq!(policy.style_properties().first().map(String::as_str), Some("font-weight"));
    }

    #[test]
    fn test_case_insensitive() {
        let policy = Policy::new().allow_tag("DIV").allow_attribute("HREF");
        assert!(policy.allows_tag("div"));
        assert!(policy.allows_tag("DiV"));
        assert!(policy.allows_attribute("href"));
    }

    #[test]
    fn test_style_property_order_preserved() {
        let policy = Policy::new().with_style_properties(["color", "font-size", "color"]);
        assert_eq!(policy.style_properties(), ["color", "font-size"]);
    }

    #[test]
    fn test_empty_policy_allows_nothing() {
        let policy = Policy::new();
        assert!(!policy.allows_tag("p"));
        assert!(!policy.allows_attribute("style"));
        assert!(policy.style_properties().is_empty());
    }
}
