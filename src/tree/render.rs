//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Convert markdown source to an HTML fragment.
///
/// GitHub-flavored extensions are enabled: tables, strikethrough and task
/// lists. The output is a body fragment, not a full page.
pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let mut out = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
