//! Question classification — maps an application-form question or field label
//! to a handling strategy.
//!
//! Pure and deterministic: label cleaning, then an ordered rule pass where the
//! first match wins. Data-extraction labels are matched exactly (anchored by
//! construction) so a pathological multi-megabyte "question" can never blow up
//! the matcher; narrative classes use bounded substring lists.

/// Handling strategy for a question. Not persisted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionClass {
    /// Short factual field (email, phone, LinkedIn, ...) — answered by literal
    /// lookup in the CV, near-zero temperature.
    DataExtraction,
    /// Full cover/motivation letter with its own structure and length scale.
    CoverLetter,
    /// "Why do you want to work here" — general answer plus company-specific
    /// grounding requirements.
    WhyCompany,
    /// Everything else.
    General,
}

/// Exact field labels (lowercase) that identify a data-extraction question.
/// Ordered roughly by how often application forms ask for them.
const DATA_FIELD_LABELS: &[&str] = &[
    "name",
    "full name",
    "first name",
    "last name",
    "email",
    "email address",
    "e-mail",
    "e-mail address",
    "phone",
    "phone number",
    "mobile",
    "mobile number",
    "telephone",
    "linkedin",
    "linkedin profile",
    "linkedin url",
    "github",
    "github profile",
    "github url",
    "portfolio",
    "portfolio url",
    "website",
    "personal website",
    "address",
    "street address",
    "city",
    "location",
    "country",
    "postal code",
    "zip code",
    "salary",
    "salary expectation",
    "salary expectations",
    "expected salary",
    "desired salary",
    "current salary",
    "notice period",
    "availability",
    "available start date",
    "start date",
    "earliest start date",
    "date of birth",
    "nationality",
    "visa status",
    "work authorization",
    "pronouns",
    "current company",
    "current employer",
    "current title",
    "current job title",
    "years of experience",
];

/// Substrings (lowercase) that identify a cover-letter request.
const COVER_LETTER_PHRASES: &[&str] = &[
    "cover letter",
    "covering letter",
    "motivation letter",
    "motivational letter",
    "letter of motivation",
    "letter of interest",
    "application letter",
];

/// Substrings (lowercase) that identify a why-this-company question.
const WHY_COMPANY_PHRASES: &[&str] = &[
    "why do you want",
    "why are you applying",
    "why are you interested",
    "why would you like to work",
    "what draws you",
    "what attracts you",
    "what interests you about",
    "why this company",
    "why this role",
    "why us",
    "why join",
];

/// Leading filler phrases stripped from field labels, longest first so the
/// longer variant wins before its suffix does.
const LABEL_FILLER_PREFIXES: &[&str] = &["please enter your ", "please enter ", "enter your ", "your "];

/// Normalizes a form-field label: strips trailing required-markers (`*`, `:`,
/// `?`) and whitespace, then one leading filler phrase, then trims.
///
/// `"Please enter your Email*:"` → `"Email"`.
pub fn clean_label(raw: &str) -> String {
    let mut label = raw.trim();
    while let Some(stripped) = label
        .strip_suffix('*')
        .or_else(|| label.strip_suffix(':'))
        .or_else(|| label.strip_suffix('?'))
    {
        label = stripped.trim_end();
    }

    let lower = label.to_lowercase();
    for prefix in LABEL_FILLER_PREFIXES {
        if lower.starts_with(prefix) {
            label = &label[prefix.len()..];
            break;
        }
    }

    label.trim().to_string()
}

/// Classifies a raw question string. First match wins:
/// data-extraction → cover-letter → why-company → general.
///
/// Data extraction must stay first: those answers short-circuit before any of
/// the narrative prompt machinery is built.
pub fn classify(raw_question: &str) -> QuestionClass {
    let label = clean_label(raw_question).to_lowercase();
    if DATA_FIELD_LABELS.contains(&label.as_str()) {
        return QuestionClass::DataExtraction;
    }

    let question = raw_question.to_lowercase();
    if COVER_LETTER_PHRASES.iter().any(|p| question.contains(p)) {
        return QuestionClass::CoverLetter;
    }
    if WHY_COMPANY_PHRASES.iter().any(|p| question.contains(p)) {
        return QuestionClass::WhyCompany;
    }

    QuestionClass::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_label_strips_required_markers() {
        assert_eq!(clean_label("Email*:"), "Email");
        assert_eq!(clean_label("Phone number? "), "Phone number");
        assert_eq!(clean_label("Name *: "), "Name");
    }

    #[test]
    fn test_clean_label_strips_filler_prefix() {
        assert_eq!(clean_label("Please enter your email"), "email");
        assert_eq!(clean_label("Enter your phone number"), "phone number");
        assert_eq!(clean_label("Your LinkedIn"), "LinkedIn");
    }

    #[test]
    fn test_clean_label_strips_prefix_and_suffix_together() {
        assert_eq!(clean_label("Please enter your Email*:"), "Email");
    }

    #[test]
    fn test_clean_label_leaves_plain_text_alone() {
        assert_eq!(clean_label("Tell us about yourself"), "Tell us about yourself");
    }

    #[test]
    fn test_clean_label_strips_only_one_filler_prefix() {
        // "your" inside the remaining text must survive.
        assert_eq!(clean_label("your your name"), "your name");
    }

    #[test]
    fn test_email_label_is_data_extraction() {
        assert_eq!(classify("Email*:"), QuestionClass::DataExtraction);
    }

    #[test]
    fn test_linkedin_is_data_extraction() {
        assert_eq!(classify("LinkedIn"), QuestionClass::DataExtraction);
        assert_eq!(classify("LinkedIn profile:"), QuestionClass::DataExtraction);
    }

    #[test]
    fn test_filler_prefixed_field_is_data_extraction() {
        assert_eq!(
            classify("Please enter your phone number:"),
            QuestionClass::DataExtraction
        );
    }

    #[test]
    fn test_salary_variants_are_data_extraction() {
        assert_eq!(classify("Expected salary"), QuestionClass::DataExtraction);
        assert_eq!(classify("Salary expectations*"), QuestionClass::DataExtraction);
        assert_eq!(classify("Notice period"), QuestionClass::DataExtraction);
    }

    #[test]
    fn test_cover_letter_is_classified() {
        assert_eq!(
            classify("Write a cover letter for this role"),
            QuestionClass::CoverLetter
        );
        assert_eq!(classify("Cover letter"), QuestionClass::CoverLetter);
        assert_eq!(
            classify("Please attach your motivation letter"),
            QuestionClass::CoverLetter
        );
    }

    #[test]
    fn test_why_company_is_classified() {
        assert_eq!(
            classify("Why do you want to work here?"),
            QuestionClass::WhyCompany
        );
        assert_eq!(
            classify("What draws you to our mission?"),
            QuestionClass::WhyCompany
        );
        assert_eq!(
            classify("Why are you applying for this position?"),
            QuestionClass::WhyCompany
        );
    }

    #[test]
    fn test_general_is_the_default() {
        assert_eq!(
            classify("Tell me about a challenging project"),
            QuestionClass::General
        );
        assert_eq!(
            classify("Describe your experience with Rust"),
            QuestionClass::General
        );
    }

    #[test]
    fn test_cover_letter_wins_over_why_company() {
        // Contains phrases from both lists; cover-letter is checked first.
        assert_eq!(
            classify("Cover letter: why do you want to join us?"),
            QuestionClass::CoverLetter
        );
    }

    #[test]
    fn test_field_label_is_not_a_substring_match() {
        // "email" appears inside a narrative question — must NOT be extraction.
        assert_eq!(
            classify("How would you improve our email product?"),
            QuestionClass::General
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify("EMAIL"), QuestionClass::DataExtraction);
        assert_eq!(classify("COVER LETTER"), QuestionClass::CoverLetter);
    }

    #[test]
    fn test_adversarial_long_input_is_handled() {
        // A multi-megabyte question must classify without blowup.
        let long = "a".repeat(2_000_000);
        assert_eq!(classify(&long), QuestionClass::General);
        let long_markers = format!("{}{}", "x".repeat(1_000_000), "*".repeat(1_000));
        assert_eq!(classify(&long_markers), QuestionClass::General);
    }
}
