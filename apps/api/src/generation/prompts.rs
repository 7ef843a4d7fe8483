// Prompt Builder: turns a registry entry plus the applicant's answers into one
// instruction string for the model server. Pure: same inputs, same prompt.

use crate::generation::registry::{SectionRegistry, SectionSpec};
use crate::generation::GenerationError;
use crate::llm_client::prompts::{FORMAT_INSTRUCTION, STYLE_INSTRUCTION, WRITER_ROLE};
use crate::models::UserData;

/// Section prompt template.
/// Replace: {role}, {instructions}, {words}, {style}, {format}, {user_info}, {title}
pub const SECTION_PROMPT_TEMPLATE: &str = "{role}

Requirements:
{instructions}

Word Limit: EXACTLY {words} words. Count your words carefully.
{style}
{format}

IMPORTANT: Your response must be EXACTLY {words} words. Count the words carefully.

User Information:
{user_info}
Write the {title} section with EXACTLY {words} words:";

/// Builds the prompt for `key`, failing when the registry has no such section.
pub fn build_prompt(
    registry: &SectionRegistry,
    key: &str,
    user: &UserData,
) -> Result<String, GenerationError> {
    let spec = registry
        .get(key)
        .ok_or_else(|| GenerationError::SectionNotFound(key.to_string()))?;
    Ok(render_prompt(spec, user))
}

fn render_prompt(spec: &SectionSpec, user: &UserData) -> String {
    let words = spec.word_target.to_string();
    let role = WRITER_ROLE
        .replace("{title}", spec.title)
        .replace("{words}", &words);

    SECTION_PROMPT_TEMPLATE
        .replace("{role}", &role)
        .replace("{instructions}", spec.instructions)
        .replace("{style}", STYLE_INSTRUCTION)
        .replace("{format}", FORMAT_INSTRUCTION)
        .replace("{title}", spec.title)
        .replace("{words}", &words)
        // last, so applicant text is never treated as a placeholder
        .replace("{user_info}", &user_info_lines(spec, user))
}

/// One `- Field Name: value` line per relevant, non-empty field.
fn user_info_lines(spec: &SectionSpec, user: &UserData) -> String {
    spec.fields
        .iter()
        .filter_map(|field| {
            let value = user.get(field);
            (!value.is_empty()).then(|| format!("- {}: {}\n", humanize_field(field), value))
        })
        .collect()
}

/// `bachelors_cgpa` -> `Bachelors Cgpa`.
pub fn humanize_field(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt_for(key: &str, user: &UserData) -> String {
        build_prompt(&SectionRegistry::new(true), key, user).unwrap()
    }

    fn user() -> UserData {
        [
            ("name", "Asha Verma"),
            ("university_name", "University of Toronto"),
            ("course", "MSc Data Science"),
            ("country", "Canada"),
            ("father_income", "INR 12,00,000"),
            ("bachelors_cgpa", "8.4"),
            ("test_type", ""),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_humanize_field() {
        assert_eq!(humanize_field("bachelors_cgpa"), "Bachelors Cgpa");
        assert_eq!(humanize_field("name"), "Name");
        assert_eq!(humanize_field("tenth_BOARD"), "Tenth Board");
        assert_eq!(humanize_field("__odd__key"), "Odd Key");
    }

    #[test]
    fn test_prompt_states_word_target_in_header_and_trailer() {
        let prompt = prompt_for("introduction", &user());

        assert!(prompt.starts_with("You are an expert Statement of Purpose (SOP) writer."));
        assert!(prompt.contains("Write a Respected Sir/Ma'am section"));
        assert!(prompt.contains("Word Limit: EXACTLY 54 words."));
        assert!(prompt.contains("first-person"));
        assert!(prompt.contains("No headings, titles, or prefixes"));
        assert!(prompt.ends_with("Write the Respected Sir/Ma'am section with EXACTLY 54 words:"));
    }

    #[test]
    fn test_prompt_lists_only_relevant_fields() {
        let prompt = prompt_for("introduction", &user());

        assert!(prompt.contains("- Name: Asha Verma\n"));
        assert!(prompt.contains("- University Name: University of Toronto\n"));
        assert!(prompt.contains("- Course: MSc Data Science\n"));
        assert!(prompt.contains("- Country: Canada\n"));
        assert!(!prompt.contains("Father Income"));
        assert!(!prompt.contains("Bachelors Cgpa"));
    }

    #[test]
    fn test_prompt_skips_empty_fields() {
        let prompt = prompt_for("language_proficiency", &user());
        assert!(!prompt.contains("- Test Type:"));
        assert!(prompt.contains("User Information:\n\nWrite the Language Proficiency section"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let first = prompt_for("financial_background", &user());
        let second = prompt_for("financial_background", &user());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let registry = SectionRegistry::new(true);
        let err = build_prompt(&registry, "hobbies", &user()).unwrap_err();
        assert!(matches!(err, GenerationError::SectionNotFound(ref k) if k == "hobbies"));
    }

    #[test]
    fn test_disabled_section_is_not_found() {
        let registry = SectionRegistry::new(false);
        assert!(build_prompt(&registry, "program_relevance", &user()).is_err());
    }

    #[test]
    fn test_applicant_braces_are_not_placeholders() {
        let user: UserData = [("name", "{title} {words}")].into_iter().collect();
        let prompt = prompt_for("introduction", &user);
        assert!(prompt.contains("- Name: {title} {words}\n"));
    }

    #[test]
    fn test_empty_user_data_never_fails() {
        let registry = SectionRegistry::new(true);
        for key in registry.keys() {
            let prompt = build_prompt(&registry, key, &UserData::default()).unwrap();
            assert!(prompt.contains("User Information:"));
        }
    }
}
