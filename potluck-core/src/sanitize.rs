//! Cleanup of raw model output before it is parsed as JSON.
//!
//! Models are told to return bare JSON but frequently wrap it in a markdown
//! code fence or add a sentence before or after it. The steps here run in a
//! fixed order: fences first, then everything outside the outermost braces.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Opening ```json fences (with their trailing newline) and closing ``` fences
/// (with their leading newline).
static CODE_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n?|\n?```").expect("Invalid code fence regex"));

/// Remove markdown code-fence markers anywhere in the text.
pub fn strip_code_fences(text: &str) -> Cow<'_, str> {
    CODE_FENCE_REGEX.replace_all(text, "")
}

/// Trim whitespace, then drop everything before the first `{` and after the
/// last `}`. Returns an empty string when there is no object to recover.
pub fn trim_to_json_object(text: &str) -> &str {
    let text = text.trim();
    let Some(start) = text.find('{') else {
        return "";
    };
    let rest = &text[start..];
    match rest.rfind('}') {
        Some(end) => &rest[..=end],
        None => "",
    }
}

/// Full sanitization: strip fences, then trim to the JSON object.
pub fn sanitize_model_response(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    trim_to_json_object(&unfenced).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"title":"Soup","servings":4}"#;

    #[test]
    fn fenced_response_with_preamble() {
        let raw = format!("Sure! ```json\n{}\n```", CLEAN);
        assert_eq!(sanitize_model_response(&raw), CLEAN);
    }

    #[test]
    fn fence_without_language_tag() {
        let raw = format!("```\n{}\n```", CLEAN);
        assert_eq!(sanitize_model_response(&raw), CLEAN);
    }

    #[test]
    fn prose_before_and_after() {
        let raw = format!(
            "Here is the recipe you asked for:\n\n{}\n\nLet me know if you need anything else!",
            CLEAN
        );
        assert_eq!(sanitize_model_response(&raw), CLEAN);
    }

    #[test]
    fn already_clean_is_unchanged() {
        assert_eq!(sanitize_model_response(CLEAN), CLEAN);
    }

    #[test]
    fn nested_braces_are_preserved() {
        let raw = r#"Result: {"notes":{"tips":["stir {often}"]}} done"#;
        assert_eq!(
            sanitize_model_response(raw),
            r#"{"notes":{"tips":["stir {often}"]}}"#
        );
    }

    #[test]
    fn no_object_yields_empty_string() {
        assert_eq!(sanitize_model_response("I could not find a recipe."), "");
        assert_eq!(sanitize_model_response("{ unterminated"), "");
    }

    #[test]
    fn strip_code_fences_leaves_other_text() {
        assert_eq!(strip_code_fences("a ```json\nb\n``` c"), "a b c");
    }
}
