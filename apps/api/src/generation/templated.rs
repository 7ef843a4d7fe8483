//! Templated strategy: builds every section locally from fixed paragraphs,
//! field substitution and a few conditional clauses. No model call.
//!
//! Missing fields substitute as empty strings or drop the clause that needs
//! them; a known section key never fails.

use crate::generation::GenerationError;
use crate::models::document::PARAGRAPH_SEPARATOR;
use crate::models::UserData;

/// Overall IELTS band at or above which the "strong command" closing is used.
pub const IELTS_HIGH_PROFICIENCY: f64 = 7.0;
/// Overall score for any other test (PTE) at or above which the "strong command" closing is used.
pub const PTE_HIGH_PROFICIENCY: f64 = 65.0;

const STRONG_COMMAND_CLOSING: &str = "These scores reflect my strong command of the English language, \
    which will enable me to excel in academic discussions, research work, and professional communication \
    during my studies abroad. My proficiency will allow me to fully engage with the curriculum, contribute \
    meaningfully to class discussions, and produce high-quality academic work.";

const EFFECTIVE_COMMUNICATION_CLOSING: &str = "These scores demonstrate my ability to communicate \
    effectively in English, which is sufficient for academic coursework, assignments, and interactions in \
    an international learning environment. I am confident that my language skills will allow me to \
    understand lectures, participate in discussions, and complete written assignments successfully \
    throughout my program.";

/// Renders the body for `key`.
pub fn render_section(key: &str, user: &UserData) -> Result<String, GenerationError> {
    let body = match key {
        "introduction" => introduction(user),
        "academic_background" => academic_background(user),
        "language_proficiency" => language_proficiency(user),
        "program_relevance" => program_relevance(user),
        "financial_background" => financial_background(user),
        "why_country" => country_choice(user),
        "career_opportunities" => career_opportunities(user),
        "family_ties" => family_ties(),
        "conclusion" => conclusion(user),
        other => return Err(GenerationError::SectionNotFound(other.to_string())),
    };
    Ok(body)
}

fn paragraphs(parts: &[String]) -> String {
    parts.join(PARAGRAPH_SEPARATOR)
}

fn introduction(user: &UserData) -> String {
    format!(
        "I, {name}, am a resident of {state}, India. I am writing this Statement of Purpose to outline \
         my academic and professional goals for the {course} program at {university}, {country} for the \
         {intake} intake.",
        name = user.get("name"),
        state = user.get("state"),
        course = user.get("course"),
        university = user.get("university_name"),
        country = user.get("country"),
        intake = user.get("intake"),
    )
}

fn academic_background(user: &UserData) -> String {
    let mut para = format!(
        "My academic journey began with my 10th-grade education from {tenth_board} in {tenth_year}, \
         where I achieved {tenth_marks}%, reflecting my commitment to academic excellence. I continued my \
         education with 12th grade from {twelfth_board} in {twelfth_year}, securing {twelfth_marks}%, \
         which provided me with a strong foundation for higher studies.",
        tenth_board = user.get("tenth_board"),
        tenth_year = user.get("tenth_year"),
        tenth_marks = user.get("tenth_marks"),
        twelfth_board = user.get("twelfth_board"),
        twelfth_year = user.get("twelfth_year"),
        twelfth_marks = user.get("twelfth_marks"),
    );

    if user.has("bachelors_degree") && user.has("bachelors_college") {
        let cgpa = if user.has("bachelors_cgpa") {
            format!(" with a CGPA of {}", user.get("bachelors_cgpa"))
        } else {
            String::new()
        };
        para.push_str(&format!(
            " I further pursued a {degree} from {college}{cgpa}, which equipped me with the necessary \
             knowledge and skills in my field. This academic background has prepared me well for the \
             advanced studies I now wish to pursue.",
            degree = user.get("bachelors_degree"),
            college = user.get("bachelors_college"),
        ));
    }

    para
}

/// True when the overall score reaches the test's high-proficiency threshold.
/// A missing or unparsable score is never high.
pub fn is_high_proficiency(test_type: &str, overall: &str) -> bool {
    let threshold = if is_ielts(test_type) {
        IELTS_HIGH_PROFICIENCY
    } else {
        PTE_HIGH_PROFICIENCY
    };
    overall
        .trim()
        .parse::<f64>()
        .map(|score| score >= threshold)
        .unwrap_or(false)
}

fn is_ielts(test_type: &str) -> bool {
    test_type.trim().eq_ignore_ascii_case("IELTS")
}

fn language_proficiency(user: &UserData) -> String {
    let test_type = user.get_or("test_type", "IELTS");
    let overall = user.get("overall");
    let listening = user.get("listening");
    let speaking = user.get("speaking");
    let writing = user.get("writing");
    let reading = user.get("reading");

    let scores = if is_ielts(&test_type) {
        format!(
            "To demonstrate my English language proficiency, I took the IELTS examination and achieved an \
             overall score of {overall}, with individual scores of {listening} in Listening, {speaking} in \
             Speaking, {writing} in Writing, and {reading} in Reading."
        )
    } else {
        format!(
            "To demonstrate my English language proficiency, I took the {test_type} examination and \
             achieved an overall score of {overall}, with individual scores of {speaking} in Speaking, \
             {reading} in Reading, {writing} in Writing, and {listening} in Listening."
        )
    };

    let closing = if is_high_proficiency(&test_type, &overall) {
        STRONG_COMMAND_CLOSING
    } else {
        EFFECTIVE_COMMUNICATION_CLOSING
    };

    format!("{scores} {closing}")
}

fn program_relevance(user: &UserData) -> String {
    let course = user.get("course");
    let background = user.get_or("bachelors_degree", "my previous studies");

    let mut relevance = format!(
        "My academic background in {background} has naturally led me to pursue {course}. Throughout my \
         education, I developed a strong interest in this field through coursework and projects that \
         challenged me to apply theoretical knowledge to practical problems."
    );
    if user.has("work_experience") {
        relevance.push_str(&format!(
            " Additionally, my professional experience in {} has provided me with valuable insights into \
             the industry. Through this experience, I gained essential skills and realized the need for \
             specialized knowledge that this program offers to advance in my career.",
            user.get("work_experience")
        ));
    }

    let skills = format!(
        "The {course} program will equip me with several crucial skill sets essential for success in this \
         field. I expect to develop advanced critical thinking and analytical abilities that will help me \
         assess complex problems logically and systematically. The program will enhance my problem-solving \
         capabilities, preparing me to develop innovative solutions to challenges in my field. Furthermore, \
         I will gain practical competencies that ensure I can apply theoretical knowledge in real-world \
         scenarios. The development of communication and leadership skills will also enable me to \
         collaborate effectively in professional settings, present ideas persuasively, and lead teams \
         toward achieving organizational goals."
    );

    let prospects = "Upon completing this program, my career prospects and earning potential will \
        significantly improve. The industry related to this field is experiencing substantial growth, with a \
        projected 15% increase in job opportunities over the next five years. According to recent industry \
        reports, professionals with specialized education in this field earn 25-30% higher salaries compared \
        to those with only undergraduate degrees. The employment landscape shows a growing demand for skilled \
        professionals who can navigate the evolving technological landscape and complex market challenges. \
        The average starting salary for graduates from this program ranges from $60,000 to $75,000 annually, \
        with potential for significant growth as experience increases. Completing this program will position \
        me competitively in the job market and provide me with the credentials necessary for advancement in \
        this dynamic and rewarding field."
        .to_string();

    paragraphs(&[relevance, skills, prospects])
}

fn financial_background(user: &UserData) -> String {
    let mut para = format!(
        "I have made comprehensive financial arrangements to support my education abroad. My funding will \
         primarily come from my parents, with my father earning {father_income} annually and my mother \
         earning {mother_income} annually. They have accumulated liquid funds of {father_funds} in my \
         father's account and {mother_funds} in my mother's account specifically to support my education.",
        father_income = user.get("father_income"),
        mother_income = user.get("mother_income"),
        father_funds = user.get("father_funds"),
        mother_funds = user.get("mother_funds"),
    );

    if user.has("fixed_deposits") {
        para.push_str(&format!(
            " Additionally, we have fixed deposits worth {}, which further strengthen our financial position.",
            user.get("fixed_deposits")
        ));
    }

    para.push_str(
        " These resources will comfortably cover my tuition fees, living expenses, and other costs \
         associated with my education abroad. My family's stable financial background, including various \
         movable and immovable assets, ensures that I have a strong financial backup throughout my program. \
         This financial security will allow me to focus entirely on my studies without any financial concerns.",
    );

    para
}

fn country_choice(user: &UserData) -> String {
    let country = user.get("country");

    let support = format!(
        "{country} is renowned for its commitment to multiculturalism and inclusivity, creating an ideal \
         environment for international students like me. The educational institutions in {country} offer \
         excellent support to international students through dedicated international student offices that \
         assist with visa processes, orientation, and integration into campus life. Academic support centers \
         provide essential tutoring and counseling to help students transition smoothly into the {country}'s \
         educational system. Additionally, language support programs are designed to enhance students' \
         proficiency and confidence in English, ensuring effective communication throughout their academic \
         journey."
    );

    let comparison = format!(
        "When comparing {country} with other popular study destinations, several factors make it \
         particularly attractive. Financially, {country} offers more competitive tuition fees and a lower \
         cost of living compared to countries like the United States or the United Kingdom, making quality \
         education more accessible. {country} is home to several world-class universities consistently \
         ranked among the top 100 globally, offering cutting-edge research opportunities and faculty \
         comprising leading experts in various fields. The country's reputation for safety is exemplary, \
         with crime rates significantly lower than many other developed nations. The standard of living is \
         exceptional, with excellent healthcare, transportation, and public services. Furthermore, \
         {country}'s rich cultural heritage and diverse population provide unique opportunities for personal \
         growth through exposure to various traditions and perspectives. These compelling factors have \
         collectively influenced my decision to choose {country} as the ideal destination for my academic \
         and professional aspirations."
    );

    paragraphs(&[support, comparison])
}

fn career_opportunities(user: &UserData) -> String {
    let course = user.get("course");

    let long_term = format!(
        "The {course} program will significantly enhance my long-term career prospects in India, which has \
         a rapidly growing industry in this field. According to recent industry reports, this sector is \
         projected to grow at a compound annual growth rate (CAGR) of 12-15% over the next decade in India. \
         This growth is driven by increasing digitalization, government initiatives, and foreign investments. \
         Professionals with specialized education in this field are expected to see their earning potential \
         increase by 25-30% within five years of experience. The program will equip me with the advanced \
         skills needed to pursue senior-level positions, leadership roles, or entrepreneurial ventures. \
         India's market is expected to create over 200,000 new jobs in this sector by 2025, with salaries \
         for experienced professionals ranging from ₹15-25 lakhs annually. The knowledge and credentials \
         gained from this program will significantly enhance my career stability and opportunities for \
         advancement in India's competitive job market."
    );

    let immediate = format!(
        "Upon returning to India after completing the {course} program, I will have numerous immediate \
         career opportunities. I can pursue roles such as Project Manager, Solutions Architect, Business \
         Analyst, or Technical Consultant, depending on my specialization within the program. Major \
         multinational corporations operating in India, including TCS, Infosys, Wipro, and HCL Technologies, \
         actively recruit professionals with international qualifications in this field. Additionally, \
         Indian companies like Reliance Industries, Bharti Airtel, and Tech Mahindra offer excellent \
         opportunities. The average starting salary for graduates with international qualifications in this \
         field ranges from ₹8-12 lakhs per annum in major Indian cities, which is approximately 30% higher \
         than those with only domestic qualifications. According to a 2023 industry survey, 85% of graduates \
         with international degrees in this field secure employment within three months of returning to \
         India. The skills and global perspective gained from studying abroad make candidates particularly \
         attractive to employers looking to expand their international operations or implement global best \
         practices."
    );

    paragraphs(&[long_term, immediate])
}

fn family_ties() -> String {
    let family = "My strong family ties in India serve as a primary motivation for my return after \
        completing my education abroad. I come from a close-knit family where I have significant \
        responsibilities toward my parents and other family members. My family has supported me throughout \
        my educational journey, and I feel a deep sense of responsibility to return and be present for them. \
        Additionally, my family has established assets and investments that require my attention and \
        management in the future, further necessitating my return to India.";

    let culture = "Beyond family responsibilities, I have profound emotional and cultural ties to India \
        that strengthen my resolve to return. Having been raised in India, I share a deep connection with its \
        cultural values, traditions, and social fabric. The sense of belonging I feel in my community and the \
        established social networks I have developed over the years form an integral part of my identity. \
        These cultural bonds are irreplaceable and reinforce my intention to return home after completing my \
        studies abroad. The familiarity with the local customs, languages, and way of life makes India the \
        place where I can truly thrive both personally and professionally.";

    let career = "From a professional standpoint, India offers me exceptional career opportunities that \
        align perfectly with my educational goals. The knowledge and skills I will gain through my \
        international education will be particularly valuable in the Indian market, where there is a growing \
        demand for professionals with global exposure and specialized expertise. The rapidly developing \
        economy and expanding industry sectors in India provide fertile ground for applying my international \
        education to contribute meaningfully to local organizations and the broader economy. I am \
        enthusiastic about the prospect of bringing back cutting-edge knowledge and best practices to \
        contribute to India's growth story. My international education will enable me to act as a bridge \
        between global innovations and local implementation, creating value for employers and the economy in \
        my home country.";

    paragraphs(&[family.to_string(), culture.to_string(), career.to_string()])
}

fn conclusion(user: &UserData) -> String {
    let course = user.get("course");
    let country = user.get("country");
    format!(
        "My sole purpose for studying in {country} is to gain quality education in {course}. I am firmly \
         committed to returning to India after completing my studies due to my strong family ties, promising \
         career prospects in India, and responsibilities toward managing family assets. This program will \
         significantly enhance my professional profile and help me achieve both my career and personal goals. \
         I am grateful for the opportunity to pursue my education in {country} and look forward to \
         contributing positively to my industry upon my return to India."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::registry::SectionRegistry;

    fn academic_user(degree: &str, college: &str) -> UserData {
        [
            ("tenth_board", "CBSE"),
            ("tenth_marks", "91"),
            ("tenth_year", "2016"),
            ("twelfth_board", "CBSE"),
            ("twelfth_marks", "87"),
            ("twelfth_year", "2018"),
            ("bachelors_degree", degree),
            ("bachelors_college", college),
            ("bachelors_cgpa", "8.2"),
        ]
        .into_iter()
        .collect()
    }

    fn language_user(test_type: &str, overall: &str) -> UserData {
        [
            ("test_type", test_type),
            ("overall", overall),
            ("listening", "7.5"),
            ("speaking", "6.5"),
            ("writing", "6.5"),
            ("reading", "7.0"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_degree_clause_present_with_degree_and_college() {
        let body = render_section("academic_background", &academic_user("B.Tech", "IIT Delhi")).unwrap();
        assert!(body.contains("I further pursued a B.Tech from IIT Delhi with a CGPA of 8.2,"));
        assert!(body.contains("from CBSE in 2016, where I achieved 91%"));
    }

    #[test]
    fn test_degree_clause_absent_without_college() {
        let body = render_section("academic_background", &academic_user("B.Tech", "")).unwrap();
        assert!(!body.contains("I further pursued"));
    }

    #[test]
    fn test_degree_clause_absent_without_degree() {
        let body = render_section("academic_background", &academic_user("", "IIT Delhi")).unwrap();
        assert!(!body.contains("I further pursued"));
    }

    #[test]
    fn test_degree_clause_without_cgpa_has_no_dangling_phrase() {
        let user: UserData = [("bachelors_degree", "B.Tech"), ("bachelors_college", "IIT Delhi")]
            .into_iter()
            .collect();
        let body = render_section("academic_background", &user).unwrap();
        assert!(body.contains("I further pursued a B.Tech from IIT Delhi, which equipped me"));
        assert!(!body.contains("CGPA"));
    }

    #[test]
    fn test_ielts_exact_threshold_is_strong_command() {
        let body = render_section("language_proficiency", &language_user("IELTS", "7.0")).unwrap();
        assert!(body.contains("strong command of the English language"));
        assert!(body.contains("overall score of 7.0"));
    }

    #[test]
    fn test_ielts_one_band_below_threshold_uses_alternate_closing() {
        let body = render_section("language_proficiency", &language_user("IELTS", "6.0")).unwrap();
        assert!(!body.contains("strong command"));
        assert!(body.contains("ability to communicate effectively in English"));
    }

    #[test]
    fn test_pte_threshold_is_65() {
        assert!(is_high_proficiency("PTE", "65"));
        assert!(!is_high_proficiency("PTE", "64"));
        // 7.0 is far below the PTE scale
        assert!(!is_high_proficiency("PTE", "7.0"));
    }

    #[test]
    fn test_pte_orders_scores_speaking_first() {
        let body = render_section("language_proficiency", &language_user("PTE", "70")).unwrap();
        assert!(body.contains(
            "I took the PTE examination and achieved an overall score of 70, with individual scores of 6.5 in Speaking"
        ));
        assert!(body.contains("strong command"));
    }

    #[test]
    fn test_unparsable_or_missing_score_is_not_high() {
        assert!(!is_high_proficiency("IELTS", "seven"));
        assert!(!is_high_proficiency("IELTS", ""));
    }

    #[test]
    fn test_missing_test_type_defaults_to_ielts() {
        let body = render_section("language_proficiency", &UserData::default()).unwrap();
        assert!(body.contains("I took the IELTS examination"));
        assert!(body.contains("ability to communicate effectively"));
    }

    #[test]
    fn test_fixed_deposit_clause_is_conditional() {
        let with: UserData = [("fixed_deposits", "INR 5,00,000")].into_iter().collect();
        let body = render_section("financial_background", &with).unwrap();
        assert!(body.contains("fixed deposits worth INR 5,00,000"));

        let without = render_section("financial_background", &UserData::default()).unwrap();
        assert!(!without.contains("fixed deposits worth"));
    }

    #[test]
    fn test_program_relevance_work_experience_and_fallback_degree() {
        let user: UserData = [("course", "MSc Data Science"), ("work_experience", "data analytics")]
            .into_iter()
            .collect();
        let body = render_section("program_relevance", &user).unwrap();
        assert!(body.starts_with("My academic background in my previous studies"));
        assert!(body.contains("my professional experience in data analytics"));
        assert_eq!(body.split(PARAGRAPH_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_multi_paragraph_sections() {
        let user = UserData::default();
        assert_eq!(render_section("why_country", &user).unwrap().split(PARAGRAPH_SEPARATOR).count(), 2);
        assert_eq!(
            render_section("career_opportunities", &user).unwrap().split(PARAGRAPH_SEPARATOR).count(),
            2
        );
        assert_eq!(render_section("family_ties", &user).unwrap().split(PARAGRAPH_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_introduction_uses_state_from_address() {
        let user: UserData = [
            ("name", "Asha Verma"),
            ("address", "House 4, Ludhiana, Punjab, 141001"),
            ("course", "MBA"),
            ("university_name", "University of Melbourne"),
            ("country", "Australia"),
            ("intake", "February 2027"),
        ]
        .into_iter()
        .collect();
        let body = render_section("introduction", &user).unwrap();
        assert!(body.starts_with("I, Asha Verma, am a resident of Punjab, India."));
        assert!(body.contains("the MBA program at University of Melbourne, Australia for the February 2027 intake."));
    }

    #[test]
    fn test_every_registry_section_renders_with_empty_data() {
        let registry = SectionRegistry::new(true);
        for spec in registry.iter() {
            let body = render_section(spec.key, &UserData::default()).unwrap();
            assert!(!body.is_empty(), "{} rendered empty", spec.key);
        }
    }

    #[test]
    fn test_unknown_key_is_section_not_found() {
        let err = render_section("hobbies", &UserData::default()).unwrap_err();
        assert!(matches!(err, GenerationError::SectionNotFound(_)));
    }
}
