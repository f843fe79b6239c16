use crate::dom::*;

#[test]
fn parses_nested_elements_and_text() {
    let nodes = parse_fragment("<h2>Title</h2>\n<p>Hello <strong>world</strong></p>").unwrap();
    assert_eq!(nodes.len(), 3);
    let p = nodes[2].as_element().unwrap();
    assert_eq!(p.tag, "p");
    assert_eq!(p.text_content(), "Hello world");
    assert!(p.children[1].is_element("strong"));
}

#[test]
fn void_and_valueless_attributes_are_accepted() {
    let nodes = parse_fragment(
        r#"<section class="footnotes" data-footnotes><p><img src="a.png" alt="x"><br></p></section>"#,
    )
    .unwrap();
    let section = nodes[0].as_element().unwrap();
    assert_eq!(section.attr("data-footnotes"), Some(""));
    let p = section.children[0].as_element().unwrap();
    assert_eq!(p.children.len(), 2);
    assert!(p.children[0].is_element("img"));
    assert!(p.children[1].is_element("br"));
}

#[test]
fn unclosed_and_stray_tags_are_tolerated() {
    let nodes = parse_fragment("<div><p>one</span></div><em>two").unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].to_html(), "<div><p>one</p></div>");
    assert_eq!(nodes[1].to_html(), "<em>two</em>");
}

#[test]
fn entities_round_trip_through_serialization() {
    let nodes = parse_fragment("<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp;&nbsp;3</p>").unwrap();
    let p = nodes[0].as_element().unwrap();
    assert_eq!(p.attr("title"), Some("a \"b\""));
    assert_eq!(p.text_content(), "1 < 2 &\u{a0}3");
    assert_eq!(p.to_html(), "<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp;\u{a0}3</p>");
}

#[test]
fn html5_and_numeric_entities_decode_alongside_xml_ones() {
    let nodes = parse_fragment("<div>1 &lt; 2 &rarr; 3 &#8212; &#x41;</div>").unwrap();
    let div = nodes[0].as_element().unwrap();
    assert_eq!(div.text_content(), "1 < 2 \u{2192} 3 \u{2014} A");
    assert_eq!(div.to_html(), "<div>1 &lt; 2 \u{2192} 3 \u{2014} A</div>");
}

#[test]
fn unknown_entities_stay_literal_without_spoiling_known_ones() {
    let nodes = parse_fragment("<p>&bogus; &amp; AT&T; a & b</p>").unwrap();
    let p = nodes[0].as_element().unwrap();
    assert_eq!(p.text_content(), "&bogus; & AT&T; a & b");
    assert_eq!(p.to_html(), "<p>&amp;bogus; &amp; AT&amp;T; a &amp; b</p>");
}

#[test]
fn attribute_values_decode_html5_entities() {
    let nodes = parse_fragment(r#"<a title="x &rarr; y">z</a>"#).unwrap();
    assert_eq!(nodes[0].as_element().unwrap().attr("title"), Some("x \u{2192} y"));
}

#[test]
fn script_and_style_bodies_are_kept_verbatim() {
    let nodes =
        parse_fragment("<script>if (a<b) {}</script><style>p > b { color: red }</style><p>after</p>")
            .unwrap();
    assert_eq!(nodes.len(), 3);
    let script = nodes[0].as_element().unwrap();
    assert_eq!(script.children, vec![Node::Text("if (a<b) {}".to_string())]);
    assert_eq!(script.to_html(), "<script>if (a<b) {}</script>");
    assert_eq!(nodes[1].to_html(), "<style>p > b { color: red }</style>");
    assert_eq!(nodes[2].to_html(), "<p>after</p>");
}

#[test]
fn textarea_body_is_text_with_entities() {
    let nodes = parse_fragment("<div><TEXTAREA rows=\"2\"><b>&amp;</b></TextArea></div>").unwrap();
    let div = nodes[0].as_element().unwrap();
    let textarea = div.children[0].as_element().unwrap();
    assert_eq!(textarea.tag, "textarea");
    assert_eq!(textarea.attr("rows"), Some("2"));
    assert_eq!(textarea.text_content(), "<b>&</b>");
    assert_eq!(div.to_html(), "<div><textarea rows=\"2\">&lt;b&gt;&amp;&lt;/b&gt;</textarea></div>");
}

#[test]
fn raw_text_tags_inside_comments_are_ignored() {
    let nodes = parse_fragment("<!-- <script> --><p>a<b>c</b></p>").unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].to_html(), "<p>a<b>c</b></p>");
}

#[test]
fn duplicate_attributes_keep_the_first_value() {
    let nodes = parse_fragment(r#"<span class="a" class="b" id="x">t</span>"#).unwrap();
    let span = nodes[0].as_element().unwrap();
    assert_eq!(span.attr("class"), Some("a"));
    assert_eq!(span.attr("id"), Some("x"));
    assert_eq!(span.attrs.len(), 2);
}

#[test]
fn decode_entities_handles_edge_cases() {
    assert_eq!(decode_entities("&"), "&");
    assert_eq!(decode_entities("&;"), "&;");
    assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
}

#[test]
fn class_helpers_keep_attribute_tidy() {
    let mut el = Element::new("section").with_class("cp-content-section");
    el.toggle_class("cp-section-active", true);
    el.toggle_class("cp-section-active", true);
    assert_eq!(el.attr("class"), Some("cp-content-section cp-section-active"));
    el.toggle_class("cp-section-active", false);
    el.remove_class("cp-content-section");
    assert_eq!(el.attr("class"), None);
}

#[test]
fn paths_resolve_to_descendants() {
    let root = Element::new("div")
        .with_child(Element::new("p").with_child(Element::new("em").with_text("x")));
    assert_eq!(element_at(&root, &[0, 0]).map(|e| e.tag.as_str()), Some("em"));
    assert!(element_at(&root, &[0, 0, 0]).is_none());
}
