use crate::foundation::error::{AvatrError, AvatrResult};

/// The 13 part slots of an avatar, in visual stacking order (first drawn
/// furthest back).
pub const SLOT_NAMES: [&str; 13] = [
    "backhair", "bust", "neck", "ears", "head", "eyes", "eyebrows", "nose", "mouth", "freckles",
    "hair", "glasses", "hat",
];

/// Storage path of one authored fragment: `parts/<slot>/<slot>_<%04d>.svg`.
pub fn fragment_path(slot: &str, index: u32) -> String {
    format!("parts/{slot}/{slot}_{index:04}.svg")
}

/// One parsed fragment: the raw markup of its layer group(s) plus the
/// attribution string from its metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartFragment {
    /// Serialized top-level `<g>` element(s), spliced verbatim into the
    /// composite document.
    pub layer: String,
    /// `dc:title` of the `dc:creator` agent in the fragment metadata.
    pub creator: String,
}

/// Parse an authored SVG fragment into a layer + attribution pair.
///
/// The layer is extracted as the raw byte range of each top-level `g` child of
/// the root, preserving document order, so the authored markup survives
/// unchanged. A fragment with no layer group or no creator title is rejected.
pub fn parse_fragment(src: &str) -> AvatrResult<PartFragment> {
    let doc = roxmltree::Document::parse(src)
        .map_err(|e| AvatrError::fragment(format!("fragment is not valid XML: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(AvatrError::fragment("fragment root element is not <svg>"));
    }

    let mut layer = String::new();
    for child in root.children() {
        if child.is_element() && child.tag_name().name() == "g" {
            layer.push_str(&src[child.range()]);
        }
    }
    if layer.is_empty() {
        return Err(AvatrError::fragment("fragment has no layer group"));
    }

    let creator = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "metadata")
        .and_then(|m| {
            m.descendants()
                .find(|n| n.is_element() && n.tag_name().name() == "creator")
        })
        .and_then(|c| {
            c.descendants()
                .find(|n| n.is_element() && n.tag_name().name() == "title")
        })
        .and_then(|t| t.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AvatrError::fragment("fragment metadata has no creator title"))?;

    Ok(PartFragment {
        layer,
        creator: creator.to_string(),
    })
}

#[cfg(test)]
#[path = "../tests/unit/parts.rs"]
mod tests;
