//! Recipe import prompt: turns readable page content into recipe JSON.

use crate::types::ContentType;

/// Prompt name for logs.
pub const RECIPE_IMPORT_PROMPT_NAME: &str = "recipe_import";

/// Render the recipe import prompt around the extracted page content.
pub fn render_recipe_import_prompt(content: &str, content_type: ContentType) -> String {
    format!(
        r#"You are a recipe parsing assistant. Your task is to extract recipe information and return it in a specific JSON format.

IMPORTANT: You must return ONLY valid JSON. Do not include any explanations, metadata, or additional text.
The JSON must exactly match this TypeScript type:

type Recipe = {{
	title: string;
	description: string | null;
	prep_time: number | null;  // in minutes
	cook_time: number | null;  // in minutes
	servings: number | null;
	ingredients: {{
		amount: number | null;
		unit: string | null;
		name: string;
		notes: string | null;
	}}[];
	instructions: {{
		step_number: number;
		description: string;
	}}[];
	suggested_tags: string[];
	notes: {{
		tips: string[];
		substitutions: string[];
		storage: string[];
		technique: string[];
	}};
}}

Rules:
1. ALL string values must be properly escaped
2. ALL numbers must be valid numbers (not strings)
3. Use null for missing values, not undefined or empty strings
4. Arrays must be properly terminated
5. All property names must be exactly as shown
6. Do not add any additional properties
7. Do not include any comments or explanations in the JSON

Content to parse:
{content}

Content type: {content_type}

Return ONLY the JSON object matching the specified type."#,
        content = content,
        content_type = content_type.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt =
            render_recipe_import_prompt("<h1>Tomato Soup</h1>", ContentType::Article);

        assert!(prompt.contains("Content to parse:\n<h1>Tomato Soup</h1>\n"));
        assert!(prompt.contains("Content type: article"));
        assert!(prompt.contains("type Recipe = {"));
        assert!(prompt.contains("step_number: number;"));
        assert!(prompt.contains("3. Use null for missing values"));
        assert!(prompt.ends_with("Return ONLY the JSON object matching the specified type."));
    }

    #[test]
    fn test_content_braces_are_not_interpreted() {
        let prompt = render_recipe_import_prompt("{content} {{x}}", ContentType::Article);
        assert!(prompt.contains("Content to parse:\n{content} {{x}}\n"));
    }

    #[test]
    fn test_empty_content_still_renders() {
        let prompt = render_recipe_import_prompt("", ContentType::Article);
        assert!(prompt.contains("Content to parse:\n\n\nContent type: article"));
    }
}
