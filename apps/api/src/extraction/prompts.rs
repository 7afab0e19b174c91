// Extraction prompt templates.
// {json_only} is replaced with llm_client::prompts::JSON_ONLY_INSTRUCTION.

/// CV text → profile JSON. Replace: {cv_text}, {json_only}
pub const CV_EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are a CV parsing expert. Extract structured information from the following CV text.

STRICT RULES:
1. ONLY extract information that is explicitly stated in the CV
2. DO NOT invent, assume, or add any information
3. If a field is not found, omit it or use an empty array
4. Preserve exact dates, names, and details as written

CRITICAL - JOB TITLE EXTRACTION:
- The "position" field MUST contain the exact job title as written in the CV
- Do not paraphrase, translate or upgrade the title
- If multiple titles are listed for one role, use the primary title
- "Senior Software Engineer at Google" → position: "Senior Software Engineer"
- "Marketing Manager | Digital Strategy" → position: "Marketing Manager"

CV TEXT:
{cv_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "personalInfo": {
    "fullName": "string",
    "email": "string",
    "phone": "string | null",
    "location": "string | null",
    "linkedinUrl": "string | null",
    "githubUrl": "string | null",
    "portfolioUrl": "string | null"
  },
  "summary": "string | null",
  "skills": ["string"],
  "experience": [
    {
      "company": "string",
      "position": "string (EXACT job title)",
      "startDate": "string (as written, e.g. 'Jan 2020' or '2020')",
      "endDate": "string | null ('Present' if current)",
      "description": "string",
      "achievements": ["string"]
    }
  ],
  "education": [
    {
      "institution": "string",
      "degree": "string",
      "field": "string | null",
      "startDate": "string",
      "endDate": "string | null",
      "gpa": "string | null"
    }
  ],
  "certifications": [
    {"name": "string", "issuer": "string", "date": "string", "expiryDate": "string | null"}
  ]
}

{json_only}"#;

/// Pasted or captured posting → job JSON. Replace: {content}, {source_url}, {json_only}
pub const JOB_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract job posting information from this content.

Source URL: {source_url}

CONTENT:
{content}

Extract only information that is clearly stated. Format the description and requirements in a clean, readable way.

OUTPUT SCHEMA (return exactly this structure):
{
  "title": "string (job title)",
  "company": "string (company name)",
  "location": "string | null (city, country, or 'Remote')",
  "description": "string (full job description)",
  "requirements": "string | null (requirements and qualifications)",
  "benefits": "string | null",
  "salaryRange": "string | null",
  "jobType": "full-time | part-time | contract | freelance | internship | null",
  "applicationUrl": "string | null",
  "sourceUrl": "string | null"
}

{json_only}"#;

/// Job text → skill list. Replace: {description}, {requirements}, {json_only}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Extract the key technical skills, tools, and qualifications mentioned in this job posting.

Job Description: {description}
Requirements: {requirements}

Focus on programming languages, frameworks and libraries, tools and platforms, certifications, specific technologies and methodologies (Agile, etc.).

Return format: ["skill1", "skill2", "skill3"]

{json_only}"#;
