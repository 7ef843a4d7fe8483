// Shared prompt fragments for every section prompt.
// Section-specific instructions live in generation::registry.

/// Role line that opens every section prompt. Replace `{title}` and `{words}`.
pub const WRITER_ROLE: &str = "You are an expert Statement of Purpose (SOP) writer. \
    Write a {title} section for a Statement of Purpose with EXACTLY {words} words. \
    Not one word more or less.";

/// Tone constraint shared by all sections.
pub const STYLE_INSTRUCTION: &str =
    "Style: Formal, clear, and professional. Use first-person perspective.";

/// Output-shape constraint shared by all sections.
pub const FORMAT_INSTRUCTION: &str =
    "Format: No headings, titles, or prefixes. Just write the content of the section.";
