//! XPath locators
//!
//! Locators are plain query strings; the browser port evaluates them against
//! the live DOM on every call, so a `Locator` never caches elements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An XPath query understood by the browser port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    xpath: String,
}

impl Locator {
    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self {
            xpath: xpath.into(),
        }
    }

    /// Anchors whose whole visible text equals `text`
    pub fn anchor_with_text(text: &str) -> Self {
        Self::xpath(format!("//a[normalize-space(.) = {}]", xpath_literal(text)))
    }

    /// Anchors with `text` somewhere in their descendant text
    pub fn anchor_containing_text(text: &str) -> Self {
        Self::xpath(format!("//a[contains(., {})]", xpath_literal(text)))
    }

    /// Anchors whose `href` contains `fragment`
    pub fn anchor_with_href_containing(fragment: &str) -> Self {
        Self::xpath(format!("//a[contains(@href, {})]", xpath_literal(fragment)))
    }

    pub fn input_of_type(input_type: &str) -> Self {
        Self::xpath(format!("//input[@type={}]", xpath_literal(input_type)))
    }

    /// Inputs matched by `name` or `id`
    pub fn input_named(name: &str) -> Self {
        let name = xpath_literal(name);
        Self::xpath(format!("//input[@name={name} or @id={name}]"))
    }

    pub fn select_named(name: &str) -> Self {
        Self::xpath(format!("//select[@name={}]", xpath_literal(name)))
    }

    /// The `<option>` children of the select named `name`, in document order
    pub fn options_of_select(name: &str) -> Self {
        Self::xpath(format!("//select[@name={}]/option", xpath_literal(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.xpath
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xpath)
    }
}

/// Quote `value` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape sequences, so strings holding both quote kinds are
/// spliced together with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{part}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_literal_plain() {
        assert_eq!(xpath_literal("Next"), "\"Next\"");
    }

    #[test]
    fn test_xpath_literal_with_double_quote() {
        assert_eq!(xpath_literal("say \"hi\""), "'say \"hi\"'");
    }

    #[test]
    fn test_xpath_literal_with_both_quotes() {
        assert_eq!(
            xpath_literal("it's \"x\""),
            "concat(\"it's \", '\"', \"x\", '\"', \"\")"
        );
    }

    #[test]
    fn test_anchor_with_text() {
        assert_eq!(
            Locator::anchor_with_text("Your Orders").as_str(),
            "//a[normalize-space(.) = \"Your Orders\"]"
        );
    }

    #[test]
    fn test_input_named_matches_name_or_id() {
        assert_eq!(
            Locator::input_named("otpCode").as_str(),
            "//input[@name=\"otpCode\" or @id=\"otpCode\"]"
        );
    }

    #[test]
    fn test_options_of_select() {
        assert_eq!(
            Locator::options_of_select("orderFilter").to_string(),
            "//select[@name=\"orderFilter\"]/option"
        );
    }
}
