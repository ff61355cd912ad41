use std::sync::LazyLock;

use regex::Regex;

use crate::language::LanguageNames;

static ANSWER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(translation|translated text|result)\s*:\s*").expect("valid prefix regex")
});

static WRAPPING_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["'](.*)["']$"#).expect("valid quote regex"));

pub(crate) const OPENAI_SYSTEM_PROMPT: &str =
    "You are a professional translator. Return only JSON array of translations.";

/// User prompt asking for `{"translations": [...]}` in input order.
pub(crate) fn batch_prompt(names: &LanguageNames, texts: &[String], source_lang: &str, target_lang: &str) -> String {
    let texts_json = serde_json::to_string_pretty(texts).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Translate the following texts from {} to {}.\n\
         \n\
         **Instructions:**\n\
         - Return a JSON object with a single key \"translations\" containing an array of translated texts\n\
         - Maintain the exact order of the input texts\n\
         - Preserve the original meaning and tone\n\
         - Keep proper names, technical terms, and formatting unchanged\n\
         - Ensure natural, human-like translations\n\
         - For empty input texts, return empty strings\n\
         \n\
         **Input texts (as JSON array):**\n\
         {}\n\
         \n\
         **Return format:**\n\
         {{\"translations\": [\"translated_text_1\", \"translated_text_2\", ...]}}\n\
         \n\
         **Translations:**\n",
        names.name(source_lang),
        names.name(target_lang),
        texts_json
    )
}

/// Single-string prompt for a local completion model.
pub(crate) fn single_prompt(names: &LanguageNames, text: &str, source_lang: &str, target_lang: &str) -> String {
    format!(
        "Translate the following text from {} to {}. \n\
         Provide only the translation without any additional explanations or notes.\n\
         \n\
         Source text: {}\n\
         \n\
         Translation:",
        names.name(source_lang),
        names.name(target_lang),
        text
    )
}

/// Strip a leading "Translation:" label and one pair of wrapping quotes.
pub fn clean_model_output(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = ANSWER_PREFIX.replace(trimmed, "");
    let unquoted = match WRAPPING_QUOTES.captures(without_prefix.trim()) {
        Some(caps) => caps[1].to_string(),
        None => without_prefix.trim().to_string(),
    };
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_labels_and_quotes() {
        assert_eq!(clean_model_output("  Translation: Bonjour "), "Bonjour");
        assert_eq!(clean_model_output("\"Hola\""), "Hola");
        assert_eq!(clean_model_output("result:  'Ciao'"), "Ciao");
        assert_eq!(clean_model_output("Plain text"), "Plain text");
    }

    #[test]
    fn prompts_use_language_names() {
        let names = LanguageNames::default();
        let prompt = single_prompt(&names, "Hello", "en", "fr");
        assert!(prompt.contains("from English to French"));
        assert!(prompt.ends_with("Translation:"));

        let batch = batch_prompt(&names, &["Hi".to_string(), "Bye".to_string()], "en", "ar");
        assert!(batch.contains("from English to Arabic"));
        assert!(batch.contains("\"Bye\""));
    }
}
