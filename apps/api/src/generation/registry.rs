//! Section Registry: the fixed, ordered table of SOP sections.

/// Static description of one SOP section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub word_target: u32,
    pub instructions: &'static str,
    /// UserData fields restated to the model for this section.
    pub fields: &'static [&'static str],
}

pub const PROGRAM_RELEVANCE: &str = "program_relevance";

/// Every section in document order. `program_relevance` is optional per registry.
pub static SECTIONS: [SectionSpec; 9] = [
    SectionSpec {
        key: "introduction",
        title: "Respected Sir/Ma'am",
        word_target: 54,
        instructions: "Write a formal and respectful introduction paragraph for a Statement of Purpose. \
            Address it to the admissions committee or visa officer. Mention the purpose of the letter \
            (to apply for admission to the mentioned course at the mentioned university). \
            Use sophisticated language but keep it EXACTLY 54 words. No more, no less.",
        fields: &["name", "university_name", "course", "country"],
    },
    SectionSpec {
        key: "academic_background",
        title: "Academic Background",
        word_target: 71,
        instructions: "Write about the educational background, starting from 10th grade to the highest \
            level of education completed. Include details about board/university, percentages/CGPA, \
            and years of completion. Keep it EXACTLY 71 words. No more, no less.",
        fields: &[
            "name",
            "state",
            "tenth_board",
            "tenth_marks",
            "tenth_year",
            "twelfth_board",
            "twelfth_marks",
            "twelfth_year",
            "bachelors_degree",
            "bachelors_college",
            "bachelors_cgpa",
        ],
    },
    SectionSpec {
        key: "language_proficiency",
        title: "Language Proficiency",
        word_target: 180,
        instructions: "Describe English language proficiency based on IELTS/PTE scores. Mention the \
            overall score and individual section scores. Explain how these scores demonstrate the \
            ability to succeed in an academic environment where English is the medium of instruction. \
            Keep it EXACTLY 180 words. No more, no less.",
        fields: &["test_type", "listening", "reading", "writing", "speaking", "overall"],
    },
    SectionSpec {
        key: PROGRAM_RELEVANCE,
        title: "Program Relevance",
        word_target: 850,
        instructions: "Write three paragraphs explaining why the course is relevant to the student's \
            academic background and work experience. The first paragraph should connect past education \
            to this program, the second should discuss the skills to be gained, and the third should \
            discuss career prospects with statistics. Keep it EXACTLY 850 words. No more, no less.",
        fields: &["course", "bachelors_degree", "work_experience"],
    },
    SectionSpec {
        key: "financial_background",
        title: "Financial Background",
        word_target: 148,
        instructions: "Explain how the education and expenses will be funded. Mention the sponsors \
            (usually parents), their occupations, annual income, savings, and financial capacity to \
            support the education. If applicable, mention scholarships or other funding sources. \
            Keep it EXACTLY 148 words. No more, no less.",
        fields: &[
            "father_income",
            "mother_income",
            "father_funds",
            "mother_funds",
            "fixed_deposits",
        ],
    },
    SectionSpec {
        key: "why_country",
        title: "Why I Choose this Country for my Studies",
        word_target: 122,
        instructions: "Explain reasons for choosing the specific country for education. Discuss the \
            quality of education, global recognition of degrees, cultural diversity, safe environment, \
            and opportunities for international students. Make it specific to the country mentioned. \
            Keep it EXACTLY 122 words. No more, no less.",
        fields: &["country", "university_name", "course"],
    },
    SectionSpec {
        key: "career_opportunities",
        title: "Career Opportunities in My Country After Completing the Program",
        word_target: 354,
        instructions: "Discuss career prospects in the home country after completing the program. \
            Mention specific industries, job roles, and growing demand for professionals in the field \
            of study. Emphasize intention to return to home country and contribute to its development. \
            Keep it EXACTLY 354 words. No more, no less.",
        fields: &["course", "country"],
    },
    SectionSpec {
        key: "family_ties",
        title: "My Family Ties and Return to Home Country",
        word_target: 275,
        instructions: "Describe family ties and reasons for returning to home country after studies. \
            Mention family members, family business (if any), cultural attachments, and \
            responsibilities that ensure return to the home country. Keep it EXACTLY 275 words. \
            No more, no less.",
        fields: &["state", "family_members"],
    },
    SectionSpec {
        key: "conclusion",
        title: "Conclusion",
        word_target: 70,
        instructions: "Provide a concise conclusion summarizing the key points of the SOP. Express \
            gratitude for considering the application, and mention enthusiasm for joining the program. \
            End with formal closing. Keep it EXACTLY 70 words. No more, no less.",
        fields: &["name", "university_name", "course", "country"],
    },
];

/// Ordered view over [`SECTIONS`], fixed at startup.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<&'static SectionSpec>,
}

impl SectionRegistry {
    pub fn new(include_program_relevance: bool) -> Self {
        let sections = SECTIONS
            .iter()
            .filter(|s| include_program_relevance || s.key != PROGRAM_RELEVANCE)
            .collect();
        Self { sections }
    }

    pub fn get(&self, key: &str) -> Option<&'static SectionSpec> {
        self.sections.iter().copied().find(|s| s.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static SectionSpec> + '_ {
        self.sections.iter().copied()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.iter().map(|s| s.key).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}
