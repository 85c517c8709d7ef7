//! Reduce an HTML document to readable plain text.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Subtrees that never contribute visible text
const SKIPPED: &[&str] = &["head", "script", "style", "noscript", "template", "svg"];

const BLOCKS: &[&str] = &[
    "p",
    "div",
    "section",
    "article",
    "header",
    "footer",
    "nav",
    "main",
    "aside",
    "ul",
    "ol",
    "dl",
    "dt",
    "dd",
    "table",
    "tr",
    "pre",
    "blockquote",
    "figure",
    "form",
];

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACES: Regex = Regex::new(r"[ \t\x{A0}]+").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Convert HTML to text, keeping paragraph, heading and list structure as line breaks
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    walk(document.root_element(), false, &mut text);

    let lines: Vec<String> = text
        .lines()
        .map(|line| SPACES.replace_all(line, " ").trim().to_string())
        .collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn walk(element: ElementRef<'_>, preformatted: bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if preformatted {
                    out.push_str(text);
                } else {
                    out.push_str(&WHITESPACE.replace_all(text, " "));
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    visit(child, preformatted, out);
                }
            }
            _ => {}
        }
    }
}

fn heading_level(name: &str) -> Option<usize> {
    match name.strip_prefix('h')?.parse::<usize>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

fn visit(element: ElementRef<'_>, preformatted: bool, out: &mut String) {
    let name = element.value().name();
    if SKIPPED.contains(&name) {
        return;
    }

    if name == "br" {
        out.push('\n');
    } else if let Some(level) = heading_level(name) {
        out.push_str("\n\n");
        out.push_str(&"#".repeat(level));
        out.push(' ');
        walk(element, preformatted, out);
        out.push_str("\n\n");
    } else if name == "li" {
        out.push_str("\n- ");
        walk(element, preformatted, out);
    } else if BLOCKS.contains(&name) {
        out.push_str("\n\n");
        walk(element, preformatted || name == "pre", out);
        out.push_str("\n\n");
    } else {
        walk(element, preformatted, out);
    }
}
