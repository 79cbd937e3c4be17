//! Integration tests that format complete trees end-to-end.
//!
//! Trees are written in the JSON interchange form a parser hands over, so
//! every test also exercises decoding.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use twig_fmt::{FormatError, FormatOptions, Node, Severity};

fn tree(children: Value) -> Node {
    let root = json!({
        "type": "Root",
        "template": { "type": "Template", "children": children },
    });
    serde_json::from_value(root).unwrap_or_else(|e| panic!("fixture does not decode: {e}"))
}

fn fmt(children: Value) -> String {
    twig_fmt::format(&tree(children), &FormatOptions::default()).unwrap()
}

fn text(value: &str) -> Value {
    json!({ "type": "Content", "value": value })
}

fn el(name: &str, attributes: Value, children: Value) -> Value {
    json!({ "type": "Element", "name": name, "attributes": attributes, "children": children })
}

fn void(name: &str, attributes: Value) -> Value {
    json!({ "type": "Element", "name": name, "attributes": attributes, "void": true })
}

fn block(tag: &str, variable: &str, children: Value) -> Value {
    json!({ "type": "StatementDirective", "tag": tag, "variable": variable, "children": children })
}

fn comment(value: &str, newline_before: bool, newline_after: bool) -> Value {
    json!({
        "type": "Comment",
        "value": value,
        "newlineBefore": newline_before,
        "newlineAfter": newline_after,
    })
}

fn attrs(pairs: &[(&str, Option<&str>)]) -> Value {
    Value::Array(
        pairs
            .iter()
            .map(|(name, value)| match value {
                Some(v) => json!({ "name": name, "value": v }),
                None => json!({ "name": name }),
            })
            .collect(),
    )
}

// Directives

#[test]
fn block_delimiters_are_normalized() {
    let out = fmt(json!([block("block", " my_block ", json!([]))]));
    assert_eq!(out, "{% block my_block %}{% endblock %}");
}

#[test]
fn whitespace_only_block_collapses() {
    let out = fmt(json!([block("block", "my_block", json!([text("       ")]))]));
    assert_eq!(out, "{% block my_block %}{% endblock %}");
}

#[test]
fn parent_call_is_normalized() {
    let out = fmt(json!([{ "type": "StatementDirective", "function": "parent" }]));
    assert_eq!(out, "{% parent() %}");
}

#[test]
fn tag_name_alias_is_accepted() {
    let out = fmt(json!([{ "type": "StatementDirective", "tagName": "if", "variable": "x" }]));
    assert_eq!(out, "{% if x %}{% endif %}");
}

#[test]
fn nested_if_and_block() {
    let out = fmt(json!([block(
        "block",
        "content",
        json!([block("if", "active", json!([el("p", json!([]), json!([text("Active")]))]))])
    )]));
    assert_eq!(
        out,
        "{% block content %}\n  {% if active %}\n    <p>Active</p>\n  {% endif %}\n{% endblock %}"
    );
}

#[test]
fn sequential_if_statements() {
    let out = fmt(json!([
        block("if", "a", json!([el("p", json!([]), json!([text("A")]))])),
        block("if", "b", json!([el("p", json!([]), json!([text("B")]))])),
    ]));
    assert_eq!(
        out,
        "{% if a %}\n  <p>A</p>\n{% endif %}\n{% if b %}\n  <p>B</p>\n{% endif %}"
    );
}

#[test]
fn if_inside_element_with_deep_nesting() {
    let strong = el("strong", json!([]), json!([text("Deep")]));
    let span = el("span", json!([]), json!([strong]));
    let out = fmt(json!([el("div", json!([]), json!([block("if", "show", json!([span]))]))]));
    assert_eq!(
        out,
        "<div>\n  {% if show %}\n    <span>\n      <strong>Deep</strong>\n    </span>\n  {% endif %}\n</div>"
    );
}

// Elements and attributes

#[test]
fn void_element_gains_self_closing_slash() {
    let out = fmt(json!([void(
        "input",
        attrs(&[
            ("type", Some("checkbox")),
            ("checked", None),
            ("disabled", None),
            ("name", Some("cheese")),
        ])
    )]));
    assert_eq!(out, "<input type=\"checkbox\" checked disabled name=\"cheese\" />");
}

#[test]
fn adjacent_divs_are_separated_by_a_blank_line() {
    let out = fmt(json!([el("div", json!([]), json!([])), text("\n"), el("div", json!([]), json!([]))]));
    assert_eq!(out, "<div></div>\n\n<div></div>");
}

#[test]
fn seven_short_attributes_break() {
    let pairs: Vec<(String, Option<&str>)> = (1..=7).map(|i| (format!("a{i}"), Some("x"))).collect();
    let pairs: Vec<(&str, Option<&str>)> = pairs.iter().map(|(n, v)| (n.as_str(), *v)).collect();
    let out = fmt(json!([el("div", attrs(&pairs), json!([]))]));
    assert_eq!(
        out,
        "<div\n  a1=\"x\"\n  a2=\"x\"\n  a3=\"x\"\n  a4=\"x\"\n  a5=\"x\"\n  a6=\"x\"\n  a7=\"x\"\n></div>"
    );
}

#[test]
fn html_document() {
    let html = el(
        "html",
        attrs(&[("lang", Some("en"))]),
        json!([
            text("\n  "),
            el("head", json!([]), json!([el("title", json!([]), json!([text("Page")]))])),
            text("\n  "),
            el("body", json!([]), json!([el("p", json!([]), json!([text("Hi")]))])),
            text("\n"),
        ]),
    );
    let out = fmt(json!([{ "type": "Doctype", "value": "DOCTYPE html" }, text("\n"), html]));
    assert_eq!(
        out,
        "<!doctype html>\n<html lang=\"en\">\n  <head>\n    <title>Page</title>\n  </head>\n  <body>\n    <p>Hi</p>\n  </body>\n</html>"
    );
}

#[test]
fn boolean_attributes() {
    let short = el(
        "button",
        attrs(&[("type", Some("submit")), ("disabled", Some(""))]),
        json!([text("This is valid.")]),
    );
    let long = el(
        "button",
        attrs(&[("type", Some("submit")), ("disabled", Some("true"))]),
        json!([text("This is valid. This will be disabled.")]),
    );
    let div = el("div", attrs(&[("lang", Some(""))]), json!([]));
    let out = fmt(json!([short, text("\n"), long, text("\n"), div]));
    assert_eq!(
        out,
        "<button type=\"submit\" disabled=\"\">This is valid.</button>\n\
         <button type=\"submit\" disabled=\"true\">\n  This is valid. This will be disabled.\n</button>\n\
         <div lang=\"\"></div>"
    );
}

#[test]
fn three_class_tokens_move_content_down() {
    let out = fmt(json!([el(
        "div",
        attrs(&[("class", Some("heading-row d-flex flex-column"))]),
        json!([text("Foo")])
    )]));
    assert_eq!(out, "<div\n  class=\"heading-row d-flex flex-column\"\n>\n  Foo\n</div>");
}

#[test]
fn bem_tree_with_dangling_close() {
    let a = json!({
        "type": "Element",
        "name": "a",
        "danglingClose": true,
        "attributes": attrs(&[
            ("class", Some("home-link home-link_blue_yes news__tab news__tab_selected_yes mix-tabber__tab mix-tabber__tab_selected_yes")),
            ("tabindex", Some("0")),
            ("aria-selected", Some("true")),
            ("aria-controls", Some("news_panel_news")),
            ("data-key", Some("news")),
            ("id", Some("news_tab_news")),
            ("data-stat-link", Some("news.tab.link.news")),
            ("data-stat-select", Some("news.tab.select.news")),
            ("target", Some("_blank")),
            ("role", Some("tab")),
            ("href", Some("https://yandex.ru/news?msid=1581089780.29024.161826.172442&mlid=1581088893.glob_225")),
            ("rel", Some("noopener")),
        ]),
        "children": [text("...")],
    });
    let h1 = el(
        "h1",
        attrs(&[("class", Some("news__tab-wrapper news__head-item"))]),
        json!([text("\n      "), a, text("\n    ")]),
    );
    let tabs = el("div", attrs(&[("class", Some("news__tabs"))]), json!([text("\n    "), h1, text("\n  ")]));
    let header = el(
        "div",
        attrs(&[("class", Some("news__header widget__content"))]),
        json!([text("\n  "), tabs, text("\n")]),
    );

    let expected = r#"<div class="news__header widget__content">
  <div class="news__tabs">
    <h1 class="news__tab-wrapper news__head-item">
      <a
        class="home-link home-link_blue_yes news__tab news__tab_selected_yes mix-tabber__tab mix-tabber__tab_selected_yes"
        tabindex="0"
        aria-selected="true"
        aria-controls="news_panel_news"
        data-key="news"
        id="news_tab_news"
        data-stat-link="news.tab.link.news"
        data-stat-select="news.tab.select.news"
        target="_blank"
        role="tab"
        href="https://yandex.ru/news?msid=1581089780.29024.161826.172442&mlid=1581088893.glob_225"
        rel="noopener"
        >...</a
      >
    </h1>
  </div>
</div>"#;
    assert_eq!(fmt(json!([header])), expected);
}

#[test]
fn class_lists_with_leading_dashes_and_colons() {
    let first = el(
        "my-tag",
        attrs(&[("class", Some("__prefix1__foo __prefix1__bar __prefix2__foo prefix2 prefix2--something --prefix2--something-else"))]),
        json!([]),
    );
    let mut second = el(
        "my-tag",
        attrs(&[("class", Some("md:foo-bg md:foo-color xl:foo"))]),
        json!([]),
    );
    second["blankLineBefore"] = json!(true);

    let out = fmt(json!([first, text("\n\n"), second]));
    assert_eq!(
        out,
        "<my-tag\n  class=\"__prefix1__foo __prefix1__bar __prefix2__foo prefix2 prefix2--something --prefix2--something-else\"\n></my-tag>\n\n\
         <my-tag\n  class=\"md:foo-bg md:foo-color xl:foo\"\n></my-tag>"
    );
}

#[test]
fn class_break_with_other_attributes() {
    let out = fmt(json!([el(
        "div",
        attrs(&[
            ("aria-hidden", Some("true")),
            ("class", Some("border rounded-1 flex-shrink-0 bg-gray px-1 loooooooooooooooooooooooong")),
        ]),
        json!([text("\n")])
    )]));
    assert_eq!(
        out,
        "<div\n  aria-hidden=\"true\"\n  class=\"border rounded-1 flex-shrink-0 bg-gray px-1 loooooooooooooooooooooooong\"\n></div>"
    );
}

#[test]
fn smart_quotes() {
    let out = fmt(json!([el(
        "div",
        attrs(&[
            ("smart-quotes", Some("123 \" 456")),
            ("smart-quotes", Some("123 ' 456")),
            ("smart-quotes", Some("123 '\" 456")),
        ]),
        json!([])
    )]));
    assert_eq!(
        out,
        "<div\n  smart-quotes='123 \" 456'\n  smart-quotes=\"123 ' 456\"\n  smart-quotes=\"123 '&quot; 456\"\n></div>"
    );
}

#[test]
fn single_quoted_value_on_void_element() {
    let out = fmt(json!([void(
        "img",
        attrs(&[("src", Some("test.png")), ("alt", Some("John \"ShotGun\" Nelson"))])
    )]));
    assert_eq!(out, "<img src=\"test.png\" alt='John \"ShotGun\" Nelson' />");
}

#[test]
fn duplicate_attributes_are_preserved() {
    let out = fmt(json!([el(
        "a",
        attrs(&[("href", Some("1")), ("href", Some("2"))]),
        json!([text("123")])
    )]));
    assert_eq!(out, "<a href=\"1\" href=\"2\">123</a>");
}

#[test]
fn case_is_preserved() {
    let out = fmt(json!([
        el("div", attrs(&[("CaseSensitive", Some("CaseSensitive"))]), json!([])),
        text("\n"),
        el("template", json!([]), json!([text("\n  "), el("Table", json!([]), json!([])), text("\n")])),
    ]));
    assert_eq!(
        out,
        "<div CaseSensitive=\"CaseSensitive\"></div>\n<template>\n  <Table></Table>\n</template>"
    );
}

#[test]
fn standalone_close_markers() {
    let dangling = |name: &str, blank: bool| {
        json!({ "type": "Element", "name": name, "danglingClose": true, "blankLineBefore": blank })
    };
    let plain = |name: &str, blank: bool| json!({ "type": "Element", "name": name, "blankLineBefore": blank });
    let link = json!({
        "type": "Element",
        "name": "a",
        "danglingClose": true,
        "attributes": attrs(&[("href", Some("#123123123123123131231312321312312312312312312312312313123123123123123"))]),
        "children": [text("123123123123")],
    });
    let last = json!({
        "type": "Element",
        "name": "div",
        "blankLineBefore": true,
        "children": [
            text("\n  "),
            link,
            { "type": "Content", "value": "\n\n  123123\n", "blankLineBefore": true },
        ],
    });
    let out = fmt(json!([
        dangling("div", false),
        plain("span", false),
        dangling("div", false),
        plain("span", false),
        dangling("div", false),
        plain("span", true),
        last,
    ]));
    let expected = r##"<div></div>
<span></span>
<div></div>
<span></span>
<div></div>

<span></span>

<div>
  <a
    href="#123123123123123131231312321312312312312312312312312313123123123123123"
    >123123123123</a
  >

  123123
</div>"##;
    assert_eq!(out, expected);
}

#[test]
fn dangling_close_and_plain_close_share_the_inline_limit() {
    let p = |len: usize, dangling: bool| {
        json!({ "type": "Element", "name": "p", "danglingClose": dangling, "children": [text(&"x".repeat(len))] })
    };
    let at_limit = "x".repeat(30);
    let over = "x".repeat(31);
    for dangling in [false, true] {
        assert_eq!(fmt(json!([p(30, dangling)])), format!("<p>{at_limit}</p>"));
        assert_eq!(fmt(json!([p(31, dangling)])), format!("<p>\n  {over}\n</p>"));
    }
}

#[test]
fn element_holding_only_unknown_nodes_prints_empty() {
    let json = json!({
        "type": "Root",
        "template": {
            "type": "Template",
            "children": [el("div", json!([]), json!([text("\n  "), { "type": "Mystery" }, text("\n")]))],
        },
    })
    .to_string();
    let formatted = twig_fmt::format_json(&json, &FormatOptions::default()).unwrap();
    assert_eq!(formatted.output, "<div></div>");
    assert_eq!(formatted.diagnostics.len(), 1);
}

// Comments

#[test]
fn comments_keep_their_line_position() {
    let p = |text_value: Option<&str>| {
        let children = text_value.map_or(json!([]), |t| json!([text(t)]));
        el("p", json!([]), children)
    };
    assert_eq!(
        fmt(json!([comment("Comment", true, false), p(Some("Hello"))])),
        "{# Comment #}<p>Hello</p>"
    );
    assert_eq!(fmt(json!([p(None), comment("Comment", false, true)])), "<p></p>{# Comment #}");
    assert_eq!(fmt(json!([p(None), comment("Comment", true, true)])), "<p></p>\n{# Comment #}");
}

#[test]
fn comment_inside_block_is_indented() {
    let out = fmt(json!([block(
        "block",
        "content",
        json!([comment("TODO: refactor", true, false), el("div", json!([]), json!([text("Hi")]))])
    )]));
    assert_eq!(out, "{% block content %}\n  {# TODO: refactor #}<div>Hi</div>\n{% endblock %}");
}

#[test]
fn comment_text_is_kept_verbatim() {
    let out = fmt(json!([comment("@deprecated tag:v6.8.0 - Use `mt-button` instead.", true, true)]));
    assert_eq!(out, "{# @deprecated tag:v6.8.0 - Use `mt-button` instead. #}");
    assert_eq!(fmt(json!([comment("", true, true)])), "{#  #}");
}

// Whole-pass behavior

#[test]
fn empty_template_formats_to_nothing() {
    assert_eq!(fmt(json!([])), "");
    assert_eq!(fmt(json!([text("\n\n   ")])), "");
}

#[test]
fn unknown_node_kinds_are_reported_and_skipped() {
    let json = json!({
        "type": "Root",
        "template": {
            "type": "Template",
            "children": [
                { "type": "Comment", "value": "a", "newlineBefore": true, "newlineAfter": true },
                {
                    "type": "Embed",
                    "loc": { "type": "Span", "start": 0 },
                    "body": [{ "type": "Content", "value": "ignored" }],
                },
                { "type": "Comment", "value": "b", "newlineBefore": true, "newlineAfter": true },
            ],
        },
    })
    .to_string();

    let formatted = twig_fmt::format_json(&json, &FormatOptions::default()).unwrap();
    assert_eq!(formatted.output, "{# a #}\n{# b #}");
    assert_eq!(formatted.diagnostics.len(), 1);
    assert_eq!(formatted.diagnostics[0].severity, Severity::Warning);
    assert_eq!(formatted.diagnostics[0].code.as_deref(), Some("F001"));
}

#[test]
fn malformed_nodes_abort_formatting() {
    let void_with_children = json!([{
        "type": "Element",
        "name": "br",
        "void": true,
        "children": [text("x")],
    }]);
    let err = twig_fmt::format(&tree(void_with_children), &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::Malformed { .. }));

    let missing_name = r#"{"type": "Root", "template": {"type": "Template", "children": [{"type": "Element"}]}}"#;
    let err = twig_fmt::format_json(missing_name, &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::Json(_)));
}

fn nested_spans(levels: usize) -> String {
    let mut node = text("x");
    for _ in 0..levels {
        node = el("span", json!([]), json!([node]));
    }
    json!({ "type": "Root", "template": { "type": "Template", "children": [node] } }).to_string()
}

#[test]
fn deep_json_trees_format_up_to_the_depth_limit() {
    let options = FormatOptions::default().print_width(1000);
    let formatted = twig_fmt::format_json(&nested_spans(100), &options).unwrap();

    let mut expected = Vec::new();
    for level in 0..99 {
        expected.push(format!("{}<span>", "  ".repeat(level)));
    }
    expected.push(format!("{}<span>x</span>", "  ".repeat(99)));
    for level in (0..99).rev() {
        expected.push(format!("{}</span>", "  ".repeat(level)));
    }
    assert_eq!(formatted.output, expected.join("\n"));

    // Root and Template add two levels above the spans.
    assert!(twig_fmt::format_json(&nested_spans(254), &options).is_ok());
    assert!(matches!(
        twig_fmt::format_json(&nested_spans(255), &options),
        Err(FormatError::TooDeep { depth: 257, limit: 256 })
    ));
}

#[test]
fn json_trees_past_the_depth_limit_are_refused() {
    let err = twig_fmt::format_json(&nested_spans(300), &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::TooDeep { depth: 302, limit: 256 }), "got: {err}");
}

#[test]
fn custom_block_tags_and_width() {
    let card = |t: &str| el("sw-card", json!([]), json!([text(t)]));
    let options = FormatOptions::default().block_tag("sw-card").tab_width(4);
    let root = tree(json!([el("sw-page", json!([]), json!([card("A"), card("B")]))]));
    let out = twig_fmt::format(&root, &options).unwrap();
    assert_eq!(
        out,
        "<sw-page>\n    <sw-card>A</sw-card>\n\n    <sw-card>B</sw-card>\n</sw-page>"
    );
}

#[test]
fn narrow_width_breaks_the_open_tag() {
    let options = FormatOptions::default().print_width(30);
    let root = tree(json!([el(
        "span",
        attrs(&[("title", Some("a long enough title"))]),
        json!([text("Hi")])
    )]));
    let out = twig_fmt::format(&root, &options).unwrap();
    assert_eq!(out, "<span\n  title=\"a long enough title\"\n>\n  Hi\n</span>");
}
