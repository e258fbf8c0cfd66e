//! Text and HTML rendering of quote views.

use std::fmt::Write;

use quotes_core::{Card, SelectorOption, ViewSnapshot};

/// Plain-text cards separated by blank lines.
pub fn text_cards(cards: &[Card]) -> String {
    let mut out = String::new();
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", card.text);
        let _ = writeln!(out, "  Categories: {}", card.categories);
        let _ = writeln!(out, "  Subcategories: {}", card.subcategories);
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn select(out: &mut String, name: &str, label: &str, options: &[SelectorOption], onchange: &str) {
    let _ = writeln!(out, r#"<label class="field">{label}"#);
    let _ = writeln!(out, r#"<select name="{name}" onchange="{onchange}">"#);
    for opt in options {
        let selected = if opt.selected { " selected" } else { "" };
        let _ = writeln!(
            out,
            r#"<option value="{}"{selected}>{}</option>"#,
            escape_html(&opt.value),
            escape_html(&opt.label)
        );
    }
    out.push_str("</select>\n</label>\n");
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 1rem; }
form.toolbar { background: #1cd968; border-radius: 5px; padding: 1rem; display: flex; gap: 1rem; }
.field { flex: 1; display: flex; flex-direction: column; }
select { background: #31ad62; opacity: 0.8; padding: 0.5rem; }
.card { margin: 16px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,0.3); border-radius: 4px; }
.meta { color: #666; }";

/// Full page: toolbar with both selectors, then one card per visible quote.
///
/// Changing the category submits the form with the subcategory cleared; the
/// hidden `prev_category` lets the server apply the same reset for clients
/// without scripting.
pub fn html_page(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Quotes</title>\n");
    let _ = writeln!(out, "<style>\n{STYLE}\n</style>\n</head>\n<body>");

    out.push_str("<form class=\"toolbar\" method=\"get\" action=\"/\">\n");
    let _ = writeln!(
        out,
        r#"<input type="hidden" name="prev_category" value="{}">"#,
        escape_html(snapshot.selection.category().unwrap_or_default())
    );
    select(
        &mut out,
        "category",
        "Category",
        &snapshot.categories,
        "this.form.subcategory.value='';this.form.submit()",
    );
    select(
        &mut out,
        "subcategory",
        "Subcategory",
        &snapshot.subcategories,
        "this.form.submit()",
    );
    out.push_str("<noscript><button type=\"submit\">Filter</button></noscript>\n</form>\n");

    for card in &snapshot.cards {
        let _ = writeln!(out, r#"<div class="card" data-id="{}">"#, card.id);
        let _ = writeln!(out, r#"<p class="text">{}</p>"#, escape_html(&card.text));
        let _ = writeln!(
            out,
            r#"<p class="meta">Categories: {}</p>"#,
            escape_html(&card.categories)
        );
        let _ = writeln!(
            out,
            r#"<p class="meta">Subcategories: {}</p>"#,
            escape_html(&card.subcategories)
        );
        out.push_str("</div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
