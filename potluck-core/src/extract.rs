//! Readability article extraction.
//!
//! Content selection is delegated to `dom_smoothie`, a port of Mozilla's
//! Readability. Its output is then re-serialized as simplified HTML:
//! structural tags survive, attributes other than `href`, `src` and `alt` do
//! not.

use std::sync::LazyLock;

use dom_smoothie::{Article, Readability};
use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};

use crate::types::{ContentType, ExtractedContent};

/// Elements dropped from the output even if Readability kept them.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "canvas", "form", "button",
    "input", "select", "textarea", "object", "embed", "link", "meta",
];

/// Elements kept (without most attributes) in the simplified output.
const KEEP_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "li", "dl", "dt", "dd", "table",
    "thead", "tbody", "tr", "th", "td", "blockquote", "pre", "code", "strong", "em", "b", "i",
    "a", "img", "br", "figure", "figcaption",
];

/// Elements followed by a line break in the output.
const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "li", "dl", "dt", "dd", "table", "tr",
    "blockquote", "pre", "figure", "figcaption", "div", "section", "article", "main", "header",
];

const VOID_TAGS: &[&str] = &["img", "br"];

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static BLANK_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+").expect("Invalid blank line regex"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("Invalid title selector"));

/// Extract the main readable content from a page.
///
/// `url` is the page address, used to resolve relative links. Never fails:
/// when nothing resembling an article body is found the returned content is
/// empty and the caller decides what that means.
pub fn extract_article(html: &str, url: Option<&str>) -> ExtractedContent {
    let content = readable_article(html, url)
        .map(|article| simplify_html(&article.content))
        .unwrap_or_default();

    ExtractedContent {
        content,
        content_type: ContentType::Article,
        page_title: document_title(html),
    }
}

fn readable_article(html: &str, url: Option<&str>) -> Option<Article> {
    let mut readability = match Readability::new(html, url, None) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, "readability: could not load document");
            return None;
        }
    };

    match readability.parse() {
        Ok(article) => Some(article),
        Err(e) => {
            tracing::debug!(error = %e, "readability: no article content");
            None
        }
    }
}

/// Text of the page's `<title>`, whitespace collapsed.
fn document_title(html: &str) -> Option<String> {
    Html::parse_document(html)
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

fn is_hidden(element: &Element) -> bool {
    SKIP_TAGS.contains(&element.name())
        || element.attr("hidden").is_some()
        || element.attr("aria-hidden") == Some("true")
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_attr(element: &Element, name: &str, out: &mut String) {
    if let Some(value) = element.attr(name) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        for c in value.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                _ => out.push(c),
            }
        }
        out.push('"');
    }
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let collapsed = WHITESPACE_REGEX.replace_all(text, " ");
                escape_text(&collapsed, out);
            }
            Node::Element(el) if !is_hidden(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let tag = el.name();
                let keep = KEEP_TAGS.contains(&tag);

                if keep {
                    out.push('<');
                    out.push_str(tag);
                    match tag {
                        "a" => push_attr(el, "href", out),
                        "img" => {
                            push_attr(el, "src", out);
                            push_attr(el, "alt", out);
                        }
                        _ => {}
                    }
                    out.push('>');
                }

                if !VOID_TAGS.contains(&tag) {
                    render_element(child_ref, out);
                    if keep {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }

                if BLOCK_TAGS.contains(&tag) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Re-serialize Readability's article HTML in simplified form.
fn simplify_html(article_html: &str) -> String {
    let fragment = Html::parse_fragment(article_html);
    let root = fragment.root_element();

    if !root.text().any(|t| !t.trim().is_empty()) {
        return String::new();
    }

    let mut out = String::new();
    render_element(root, &mut out);

    let trimmed_lines = out
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINES_REGEX
        .replace_all(&trimmed_lines, "\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A recipe method long enough that Readability accepts it on the first
    /// pass.
    const METHOD: &str = r#"
        <p>Heat the olive oil in a heavy pot over medium heat, then add the onion, garlic, and a pinch of salt.</p>
        <p>Cook gently, stirring often, until the onion is soft and golden, about fifteen minutes in total.</p>
        <p>Add the roasted tomatoes, the stock, and a bay leaf, then simmer uncovered for twenty minutes.</p>
        <p>Remove the bay leaf, blend until completely smooth, and season with salt, pepper, and a little sugar.</p>
        <p>Serve hot with crusty bread, a swirl of cream, and torn basil leaves scattered over the top.</p>
        <p>Leftovers keep for four days in the fridge, or three months in the freezer, in airtight containers.</p>
    "#;

    #[test]
    fn keeps_recipe_and_strips_chrome() {
        let html = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>Tomato Soup | Weeknight Kitchen</title>
                <script>window.dataLayer = [];</script>
                <style>body {{ color: red; }}</style>
            </head>
            <body>
                <nav class="site-nav"><a href="/">Home</a><a href="/recipes">Recipes</a></nav>
                <div class="ad-banner">Buy our cookware now, limited offer, act fast!</div>
                <article class="post">
                    <h1>Tomato Soup</h1>
                    <h2>Ingredients</h2>
                    <ul>
                        <li>2 lb tomatoes, halved</li>
                        <li>1 onion, diced</li>
                    </ul>
                    <div class="social-share">Share on Facebook Share on Twitter</div>
                    <h2>Method</h2>
                    {METHOD}
                    <script>trackRecipeView();</script>
                </article>
                <aside class="sidebar"><p>Popular posts you might like, curated for you, every week.</p></aside>
                <footer>Copyright Weeknight Kitchen</footer>
            </body>
            </html>
            "#
        );
        let extracted = extract_article(&html, Some("https://example.com/tomato-soup"));

        assert_eq!(extracted.content_type, ContentType::Article);
        assert_eq!(
            extracted.page_title.as_deref(),
            Some("Tomato Soup | Weeknight Kitchen")
        );

        let content = &extracted.content;
        assert!(content.contains("<li>2 lb tomatoes, halved</li>"));
        assert!(content.contains("Heat the olive oil"));
        assert!(content.contains("Leftovers keep for four days"));
        assert!(!content.contains("dataLayer"));
        assert!(!content.contains("trackRecipeView"));
        assert!(!content.contains("Share on Facebook"));
        assert!(!content.contains("Buy our cookware"));
        assert!(!content.contains("Popular posts"));
        assert!(!content.contains("Copyright"));
    }

    #[test]
    fn attributes_are_dropped_except_links_and_images() {
        let html = format!(
            r#"
            <html><body><article>
                {METHOD}
                <p class="lead" style="color: red"><a href="/tips" class="x">More tips</a> on roasting, including how dark to char the onions. <img src="/soup.jpg" alt="Soup"></p>
            </article></body></html>
            "#
        );
        let content = extract_article(&html, Some("https://example.com/soup")).content;

        assert!(content.contains("<p>Heat the olive oil"));
        assert!(content.contains("<a href=\""));
        assert!(content.contains("More tips</a>"));
        assert!(content.contains(r#"alt="Soup">"#));
        assert!(!content.contains("class="));
        assert!(!content.contains("style="));
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let html = format!(
            r#"
            <html><body><article>
                {METHOD}
                <div hidden>Secret tracking pixel text</div>
                <div aria-hidden="true">Decorative icon label</div>
            </article></body></html>
            "#
        );
        let content = extract_article(&html, None).content;

        assert!(content.contains("Heat the olive oil"));
        assert!(!content.contains("Secret"));
        assert!(!content.contains("Decorative"));
    }

    #[test]
    fn wrapper_class_that_looks_like_chrome_does_not_hide_the_article() {
        let html = format!(
            r#"
            <html><body>
                <div class="site-container has-sidebar">
                    <article><h1>Tomato Soup</h1>{METHOD}</article>
                </div>
            </body></html>
            "#
        );
        let content = extract_article(&html, None).content;

        assert!(content.contains("Heat the olive oil"));
        assert!(content.contains("Leftovers keep for four days"));
    }

    #[test]
    fn recipe_in_main_beats_teaser_article() {
        let html = format!(
            r#"
            <html><body>
                <main>
                    <div class="recipe-content"><h1>Tomato Soup</h1>{METHOD}</div>
                </main>
                <section class="more-recipes">
                    <article><p><a href="/chili">Five-bean chili</a> is the weeknight dinner everyone asks for, every time.</p></article>
                </section>
            </body></html>
            "#
        );
        let content = extract_article(&html, None).content;

        assert!(content.contains("Heat the olive oil"));
        assert!(!content.contains("Five-bean chili"));
    }

    #[test]
    fn page_without_article_body_yields_empty_content() {
        let html = r#"
            <html><head><title>Loading</title></head>
            <body>
                <script>renderApp();</script>
                <div id="root"></div>
            </body></html>
        "#;
        let extracted = extract_article(html, None);

        assert!(extracted.is_empty());
        assert_eq!(extracted.content, "");
        assert_eq!(extracted.page_title.as_deref(), Some("Loading"));
    }

    #[test]
    fn empty_input_yields_empty_content() {
        let extracted = extract_article("", None);
        assert!(extracted.is_empty());
        assert!(extracted.page_title.is_none());
    }

    #[test]
    fn simplify_escapes_text_and_attribute_values() {
        let simplified = simplify_html(
            r#"<div class="page"><p>Salt &amp; pepper <a href="/a?b=1&amp;c=2">here</a></p></div>"#,
        );
        assert_eq!(
            simplified,
            r#"<p>Salt &amp; pepper <a href="/a?b=1&amp;c=2">here</a></p>"#
        );
    }
}
