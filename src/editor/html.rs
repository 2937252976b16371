// src/editor/html.rs

use super::document::{Align, Block, Document, Span};

/// Serializes a document to HTML. The session sanitizes this output before
/// handing it out, so the serializer stays within the allow-list by
/// construction and the sanitizer pass is a no-op in the normal case.
pub(crate) fn render_html(doc: &Document) -> String {
    let mut out = String::new();

    for block in &doc.blocks {
        match block {
            Block::Paragraph { align, spans } => {
                render_container(&mut out, "p", *align, spans);
            }
            Block::Heading {
                level,
                align,
                spans,
            } => {
                render_container(&mut out, level.tag(), *align, spans);
            }
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                out.push('<');
                out.push_str(tag);
                out.push('>');
                for item in items {
                    render_container(&mut out, "li", item.align, &item.spans);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Block::Blockquote { align, spans } => {
                out.push_str("<blockquote>");
                render_container(&mut out, "p", *align, spans);
                out.push_str("</blockquote>");
            }
            Block::Rule => out.push_str("<hr>"),
            Block::Image { src, alt } => {
                out.push_str("<img src=\"");
                push_escaped(&mut out, src);
                out.push_str("\" alt=\"");
                push_escaped(&mut out, alt);
                out.push_str("\">");
            }
        }
    }

    out
}

fn render_container(out: &mut String, tag: &str, align: Align, spans: &[Span]) {
    out.push('<');
    out.push_str(tag);
    if align != Align::Left {
        out.push_str(" style=\"text-align: ");
        out.push_str(align.css());
        out.push('"');
    }
    out.push('>');
    for span in spans {
        render_span(out, span);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_span(out: &mut String, span: &Span) {
    let mut close: Vec<&str> = Vec::new();

    if let Some(href) = &span.link {
        out.push_str("<a href=\"");
        push_escaped(out, href);
        out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
        close.push("</a>");
    }
    if span.marks.bold {
        out.push_str("<strong>");
        close.push("</strong>");
    }
    if span.marks.italic {
        out.push_str("<em>");
        close.push("</em>");
    }
    if span.marks.underline {
        out.push_str("<u>");
        close.push("</u>");
    }
    if span.marks.strike {
        out.push_str("<s>");
        close.push("</s>");
    }

    push_escaped(out, &span.text);

    for tag in close.into_iter().rev() {
        out.push_str(tag);
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::{HeadingLevel, ListItem, Marks};

    #[test]
    fn renders_marks_nested() {
        let doc = Document {
            blocks: vec![Block::Paragraph {
                align: Align::Left,
                spans: vec![Span {
                    text: "hi".to_string(),
                    marks: Marks {
                        bold: true,
                        italic: true,
                        ..Marks::default()
                    },
                    link: None,
                }],
            }],
        };
        assert_eq!(render_html(&doc), "<p><strong><em>hi</em></strong></p>");
    }

    #[test]
    fn renders_alignment_style_only_when_not_left() {
        let doc = Document {
            blocks: vec![
                Block::Paragraph {
                    align: Align::Center,
                    spans: vec![Span::plain("mid")],
                },
                Block::Heading {
                    level: HeadingLevel::H2,
                    align: Align::Left,
                    spans: vec![Span::plain("t")],
                },
            ],
        };
        assert_eq!(
            render_html(&doc),
            "<p style=\"text-align: center\">mid</p><h2>t</h2>"
        );
    }

    #[test]
    fn renders_lists_and_rules() {
        let doc = Document {
            blocks: vec![
                Block::List {
                    ordered: true,
                    items: vec![
                        ListItem {
                            align: Align::Left,
                            spans: vec![Span::plain("one")],
                        },
                        ListItem {
                            align: Align::Left,
                            spans: vec![Span::plain("two")],
                        },
                    ],
                },
                Block::Rule,
            ],
        };
        assert_eq!(render_html(&doc), "<ol><li>one</li><li>two</li></ol><hr>");
    }

    #[test]
    fn escapes_text_and_attributes() {
        let doc = Document {
            blocks: vec![Block::Paragraph {
                align: Align::Left,
                spans: vec![Span::plain("<script>\"&'")],
            }],
        };
        assert_eq!(
            render_html(&doc),
            "<p>&lt;script&gt;&quot;&amp;&#39;</p>"
        );
    }

    #[test]
    fn renders_links_with_rel_and_target() {
        let doc = Document {
            blocks: vec![Block::Paragraph {
                align: Align::Left,
                spans: vec![Span {
                    text: "site".to_string(),
                    marks: Marks::default(),
                    link: Some("https://x.org".to_string()),
                }],
            }],
        };
        assert_eq!(
            render_html(&doc),
            "<p><a href=\"https://x.org\" target=\"_blank\" rel=\"noopener noreferrer\">site</a></p>"
        );
    }
}
