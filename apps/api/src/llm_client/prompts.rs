// Provider prompt templates.
// Placeholders: {resume} and {job}. Use `render` so that placeholder-like text
// inside the inputs is never substituted.

/// Free-text screening prompt for the feedback provider.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = "\
You are a resume screening assistant.
Given this resume:
----
{resume}
----
And this job description:
----
{job}
----
Provide:
- A match score from 0 to 100
- A list of missing skills
- Suggestions to improve the resume";

/// Structured-analysis prompt. The model must validate the inputs first and
/// answer with either an `error` object or the full feedback schema.
pub const STRUCTURED_PROMPT_TEMPLATE: &str = r#"You are a professional resume analyzer capable of assessing candidates across all industries and job types.

Your task is to analyze the following resume against the provided job description.

Before generating the analysis:
- Check if the resume contains relevant professional or educational content.
- Check if the job description describes an actual job and is not random characters.

If either the resume or job description is missing or invalid, return a JSON object with one of the following messages:
  {"error": "Resume is too short or not provided"}
  {"error": "Job description is inexistent or invalid"}

Only if both inputs are valid, return a JSON object with the following structure:
- "score": number (0-100): overall fit score
- "missingSkills": array of strings: key skills required by the job but not found in the resume
- "suggestions": array of strings: actionable improvements, each with a concrete example or rewrite
- "analysis": string: summary of strengths and areas for improvement
- "keywordMatch": object: percentage match by domain-relevant categories (e.g., customer service, technical, leadership, compliance, marketing, creative)
- "missingKeywords": array of strings: specific industry or role-related terms missing from the resume
- "rewrites": array of objects with "original" and "improved"
- "sectionScores": object: scores (0-100) for each section: summary, experience, education, and skills

Resume:
----
{resume}
----

Job Description:
----
{job}
----"#;

/// Fills `{resume}` and `{job}` in a template, embedding both inputs verbatim.
pub fn render(template: &str, resume: &str, job: &str) -> String {
    template
        .split("{resume}")
        .map(|part| part.replace("{job}", job))
        .collect::<Vec<_>>()
        .join(resume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_embeds_inputs_verbatim() {
        let prompt = render(FEEDBACK_PROMPT_TEMPLATE, "Rust engineer", "Backend role");
        assert!(prompt.contains("----\nRust engineer\n----"));
        assert!(prompt.contains("----\nBackend role\n----"));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{job}"));
    }

    #[test]
    fn test_render_does_not_substitute_inside_inputs() {
        let prompt = render("R={resume} J={job}", "has {job} literally", "has {resume} too");
        assert_eq!(prompt, "R=has {job} literally J=has {resume} too");
    }

    #[test]
    fn test_structured_prompt_lists_error_messages_and_schema() {
        let prompt = render(STRUCTURED_PROMPT_TEMPLATE, "cv", "jd");
        assert!(prompt.contains("Resume is too short or not provided"));
        assert!(prompt.contains("\"sectionScores\""));
    }
}
