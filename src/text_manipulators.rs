use scraper::{ElementRef, Selector};

use crate::error::ScrapeError;

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>().trim().to_string()
}

pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::parse(format!("invalid selector {css:?}: {e}")))
}

/// First element at or below `root`, in document order, that carries `attr`.
pub fn find_first_with_attr<'a>(root: ElementRef<'a>, attr: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().attr(attr).is_some())
}

/// Right-hand side of a `var x = {...};` style assignment, without the
/// trailing statement terminator.
pub fn assigned_value(script: &str) -> Option<&str> {
    let (_, value) = script.split_once('=')?;
    Some(value.trim().trim_end_matches(';'))
}
