use crate::parts::PartFragment;
use crate::schema::PaletteEntry;

/// Upstream repository the authored parts come from, recorded in the
/// composite's metadata.
pub const AVATAR_PARTS_SOURCE: &str = "https://github.com/profile-generators/avatar-parts";

const LICENSE_URL: &str = "http://creativecommons.org/licenses/by/4.0/";
const CC_NS: &str = "http://creativecommons.org/ns#";

/// Canvas and metadata skeleton of the composite document.
///
/// Logically a constant; a fresh value is taken per composition call so no
/// mutable document state is ever shared between jobs.
#[derive(Clone, Debug)]
pub struct SvgTemplate {
    pub width: String,
    pub height: String,
    pub view_box: String,
    pub source: String,
}

impl Default for SvgTemplate {
    fn default() -> Self {
        Self {
            width: "124.19042mm".to_string(),
            height: "124.19042mm".to_string(),
            view_box: "0 0 124.19042 124.19042".to_string(),
            source: AVATAR_PARTS_SOURCE.to_string(),
        }
    }
}

/// CSS for the palette: one `fill` rule per entry, in request order.
pub fn style_block(palette: &[PaletteEntry]) -> String {
    palette
        .iter()
        .map(|e| format!(".{} {{ fill: {}; }}", e.slot, e.color))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merge parsed fragments into one composite SVG document.
///
/// Layers are attached in the order given (slot order = stacking order). The
/// contributor metadata field is the comma-joined union of creators,
/// deduplicated by first appearance. Output is deterministic for identical
/// inputs.
pub fn compose_document(
    template: &SvgTemplate,
    fragments: &[PartFragment],
    palette: &[PaletteEntry],
) -> String {
    let mut contributors: Vec<&str> = Vec::new();
    for fragment in fragments {
        if !contributors.contains(&fragment.creator.as_str()) {
            contributors.push(&fragment.creator);
        }
    }

    let mut doc = String::with_capacity(4096);
    doc.push_str(&format!(
        "<svg height=\"{}\" id=\"svg151\" version=\"1.1\" viewBox=\"{}\" width=\"{}\" \
         xmlns=\"http://www.w3.org/2000/svg\" xmlns:cc=\"{CC_NS}\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\" \
         xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">",
        template.height, template.view_box, template.width
    ));
    doc.push_str(&format!("<style>{}</style>", style_block(palette)));
    for fragment in fragments {
        doc.push_str(&fragment.layer);
    }
    doc.push_str("<metadata><rdf:RDF><cc:Work>");
    doc.push_str(&format!(
        "<dc:contributor><cc:Agent><dc:title>{}</dc:title></cc:Agent></dc:contributor>",
        xml_escape(&contributors.join(", "))
    ));
    doc.push_str(&format!(
        "<dc:source>{}</dc:source>",
        xml_escape(&template.source)
    ));
    doc.push_str("</cc:Work>");
    doc.push_str(&format!("<cc:License rdf:about=\"{LICENSE_URL}\">"));
    for permit in ["Reproduction", "Distribution", "DerivativeWorks"] {
        doc.push_str(&format!(
            "<cc:permits rdf:resource=\"{CC_NS}{permit}\"/>"
        ));
    }
    for requirement in ["Notice", "Attribution"] {
        doc.push_str(&format!(
            "<cc:requires rdf:resource=\"{CC_NS}{requirement}\"/>"
        ));
    }
    doc.push_str("</cc:License></rdf:RDF></metadata></svg>");
    doc
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/compose.rs"]
mod tests;
