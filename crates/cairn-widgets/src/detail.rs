//! Typed payload describing a selected item.
//!
//! Hosts put `data-type`, `data-name`, `data-label` and `data-value` on
//! members; [`selected_item_detail`] reads them back with the value cast to
//! its declared type.

use cairn_core::document::Document;
use cairn_core::dom::NodeId;

/// A `data-value` cast according to `data-type`.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    /// `data-type="number"`. `None` when the value does not parse.
    Number(Option<f64>),
    /// `data-type="boolean"`. True only for the literal `"true"`.
    Boolean(bool),
    /// `data-type="string"`, the default. Empty when missing.
    String(String),
    /// Any other type, passed through untouched.
    Raw(Option<String>),
}

/// What a host needs to know about a selected member.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItemDetail {
    pub target: NodeId,
    pub kind: String,
    pub name: Option<String>,
    pub label: Option<String>,
    pub value: DetailValue,
}

/// Read the detail of `target` from its `data-*` attributes.
pub fn selected_item_detail<D: Document>(doc: &D, target: NodeId) -> SelectedItemDetail {
    let data = |name: &str| doc.attr(target, name).map(str::to_owned);
    let kind = data("data-type").unwrap_or_else(|| "string".to_owned());
    let raw = data("data-value");

    let value = match kind.as_str() {
        "number" => DetailValue::Number(raw.as_deref().and_then(parse_number)),
        "boolean" => DetailValue::Boolean(raw.as_deref() == Some("true")),
        "string" => DetailValue::String(raw.unwrap_or_default()),
        _ => DetailValue::Raw(raw),
    };

    SelectedItemDetail {
        target,
        kind,
        name: data("data-name"),
        label: data("data-label"),
        value,
    }
}

// Blank strings count as zero, like a numeric cast in a browser.
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value.parse::<f64>().ok().filter(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::dom::{Dom, Element};
    use pretty_assertions::assert_eq;

    fn detail(element: Element) -> SelectedItemDetail {
        let mut dom = Dom::new();
        let node = dom.insert(element);
        selected_item_detail(&dom, node)
    }

    #[test]
    fn defaults_to_empty_string() {
        let d = detail(Element::new().role("option"));
        assert_eq!(d.kind, "string");
        assert_eq!(d.value, DetailValue::String(String::new()));
        assert_eq!(d.name, None);
        assert_eq!(d.label, None);
    }

    #[test]
    fn reads_name_and_label() {
        let d = detail(
            Element::new()
                .attr("data-name", "size")
                .attr("data-label", "Large")
                .attr("data-value", "l"),
        );
        assert_eq!(d.name.as_deref(), Some("size"));
        assert_eq!(d.label.as_deref(), Some("Large"));
        assert_eq!(d.value, DetailValue::String("l".into()));
    }

    #[test]
    fn numbers() {
        let number = |v: &str| {
            detail(Element::new().attr("data-type", "number").attr("data-value", v)).value
        };
        assert_eq!(number("42"), DetailValue::Number(Some(42.0)));
        assert_eq!(number(" 1.5 "), DetailValue::Number(Some(1.5)));
        assert_eq!(number("abc"), DetailValue::Number(None));
        assert_eq!(number(""), DetailValue::Number(Some(0.0)));
        assert_eq!(
            detail(Element::new().attr("data-type", "number")).value,
            DetailValue::Number(None)
        );
    }

    #[test]
    fn booleans() {
        let boolean = |v: &str| {
            detail(Element::new().attr("data-type", "boolean").attr("data-value", v)).value
        };
        assert_eq!(boolean("true"), DetailValue::Boolean(true));
        assert_eq!(boolean("TRUE"), DetailValue::Boolean(false));
        assert_eq!(boolean("1"), DetailValue::Boolean(false));
    }

    #[test]
    fn unknown_types_pass_through() {
        let d = detail(Element::new().attr("data-type", "date").attr("data-value", "2024-01-01"));
        assert_eq!(d.kind, "date");
        assert_eq!(d.value, DetailValue::Raw(Some("2024-01-01".into())));
    }
}
