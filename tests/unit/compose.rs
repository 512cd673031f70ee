use super::*;
use crate::parts::PartFragment;
use crate::schema::PaletteEntry;

fn entry(slot: &str, color: &str) -> PaletteEntry {
    PaletteEntry {
        slot: slot.to_string(),
        color: color.to_string(),
    }
}

fn frag(creator: &str, markup: &str) -> PartFragment {
    PartFragment {
        layer: markup.to_string(),
        creator: creator.to_string(),
    }
}

#[test]
fn style_block_emits_one_rule_per_entry_in_order() {
    let palette = [entry("flesh", "#ff0000"), entry("hair", "#00ff00")];
    assert_eq!(
        style_block(&palette),
        ".flesh { fill: #ff0000; } .hair { fill: #00ff00; }"
    );
    assert_eq!(style_block(&[]), "");
}

#[test]
fn layers_are_attached_in_slot_order() {
    let fragments = [frag("a", "<g id=\"first\"/>"), frag("a", "<g id=\"second\"/>")];
    let doc = compose_document(&SvgTemplate::default(), &fragments, &[]);
    let first = doc.find("<g id=\"first\"/>").unwrap();
    let second = doc.find("<g id=\"second\"/>").unwrap();
    assert!(first < second);
}

#[test]
fn contributors_are_deduplicated_by_first_appearance() {
    let fragments = [
        frag("bob", "<g/>"),
        frag("alice", "<g/>"),
        frag("bob", "<g/>"),
        frag("carol", "<g/>"),
    ];
    let doc = compose_document(&SvgTemplate::default(), &fragments, &[]);
    assert!(doc.contains("<dc:title>bob, alice, carol</dc:title>"));
}

#[test]
fn contributor_text_is_escaped() {
    let fragments = [frag("a & b <c>", "<g/>")];
    let doc = compose_document(&SvgTemplate::default(), &fragments, &[]);
    assert!(doc.contains("<dc:title>a &amp; b &lt;c&gt;</dc:title>"));
}

#[test]
fn document_carries_canvas_and_license_skeleton() {
    let doc = compose_document(&SvgTemplate::default(), &[frag("a", "<g/>")], &[]);
    assert!(doc.starts_with("<svg "));
    assert!(doc.ends_with("</svg>"));
    assert!(doc.contains("viewBox=\"0 0 124.19042 124.19042\""));
    assert!(doc.contains("width=\"124.19042mm\""));
    assert!(doc.contains("xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(doc.contains("<dc:source>https://github.com/profile-generators/avatar-parts</dc:source>"));
    assert!(doc.contains("http://creativecommons.org/licenses/by/4.0/"));
    assert!(doc.contains("Reproduction"));
    assert!(doc.contains("Attribution"));
}

#[test]
fn composition_is_deterministic() {
    let fragments = [frag("alice", "<g class=\"flesh\"><rect/></g>"), frag("bob", "<g/>")];
    let palette = [entry("flesh", "#abcdef"), entry("p1", "#012345")];
    let a = compose_document(&SvgTemplate::default(), &fragments, &palette);
    let b = compose_document(&SvgTemplate::default(), &fragments, &palette);
    assert_eq!(a, b);
}

#[test]
fn style_block_lands_inside_style_element() {
    let palette = [entry("flesh", "#ff0000")];
    let doc = compose_document(&SvgTemplate::default(), &[frag("a", "<g/>")], &palette);
    assert!(doc.contains("<style>.flesh { fill: #ff0000; }</style>"));
}

#[test]
fn composite_parses_as_xml() {
    let fragments = [frag("alice", "<g class=\"flesh\"><rect width=\"4\" height=\"4\"/></g>")];
    let palette = [entry("flesh", "#ff0000")];
    let doc = compose_document(&SvgTemplate::default(), &fragments, &palette);
    roxmltree::Document::parse(&doc).unwrap();
}
