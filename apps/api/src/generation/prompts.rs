// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Language detection. Replace `{text}` before sending.
pub const LANGUAGE_DETECT_PROMPT_TEMPLATE: &str = r#"Detect the language of the following text and return ONLY the ISO 639-1 language code (e.g., "en" for English, "fr" for French, "de" for German, "es" for Spanish, "it" for Italian, "pt" for Portuguese, etc.).

Text: {text}

Return ONLY the 2-letter language code, nothing else."#;

/// Tailored CV.
/// Replace: {language_name}, {language_code}, {grounding_instruction}, {facts}, {job}
pub const CV_PROMPT_TEMPLATE: &str = r#"You are a professional CV writer. Create a tailored CV for the following job application.

CRITICAL REQUIREMENT - LANGUAGE:
Generate the ENTIRE CV in {language_name} ({language_code}). All sections, headers, descriptions, and content MUST be in {language_name}.

{grounding_instruction}

CRITICAL - EXPERIENCE TAILORING RULES:
For each work experience entry:
- Keep the COMPANY NAME exactly as provided (DO NOT CHANGE OR TRANSLATE)
- Keep the JOB TITLE exactly as provided (DO NOT CHANGE OR TRANSLATE)
- Keep the DATES exactly as provided (DO NOT CHANGE OR REFORMAT)
- REWORD only the description and achievements to align with the job requirements
- Highlight the aspects of the experience most relevant to the target job
- Emphasize skills and accomplishments that match the job posting

USER FACTS (VERIFIED - USE ONLY THIS DATA):
{facts}

JOB REQUIREMENTS:
{job}

Create a professional CV in {language_name} that:
1. Includes the sections Contact Info, Professional Summary, Skills, Experience, Education, Certifications, omitting any section with no data
2. For each experience entry keeps company name, job title, and dates UNCHANGED, rewording only the descriptions
3. Highlights the most relevant skills and experiences for this specific job
4. Uses plain text with one section header per line, suitable for document rendering

Remember: ONLY use the provided verified facts. Do not add any information not explicitly stated above."#;

/// Cover letter.
/// Replace: {language_name}, {language_code}, {grounding_instruction}, {facts}, {job}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are a professional cover letter writer. Create a compelling cover letter for the following job application.

CRITICAL REQUIREMENT - LANGUAGE:
Generate the ENTIRE cover letter in {language_name} ({language_code}). Greeting, body paragraphs, closing, everything MUST be in {language_name}.

{grounding_instruction}
If specific information is missing, write in general terms about relevant areas instead of inventing details.

USER FACTS (VERIFIED - USE ONLY THIS DATA):
{facts}

JOB DETAILS:
{job}

Write a professional cover letter in {language_name} that:
1. Shows genuine interest in the specific role and company
2. Highlights relevant skills and experience from the verified user facts
3. Demonstrates understanding of the job requirements
4. Maintains a professional tone and is concise (3-4 paragraphs)
5. Uses proper business letter structure

Remember: ONLY reference the provided verified facts. Do not invent any experiences or qualifications."#;

/// Appended to the CV prompt when a previous draft altered experience facts.
/// Replace: {altered}
pub const CV_CORRECTION_TEMPLATE: &str = r#"

CORRECTION REQUIRED: a previous draft changed or dropped these verified values. Each one MUST appear in the CV exactly as written here:
{altered}"#;
