/// Role description for resume structuring; `json_system` adds the JSON rule.
pub const RESUME_PARSE_ROLE: &str =
    "You are a resume parser for a hiring scoring engine. \
    Extract structured information from a resume. \
    If unsure, make best-effort guesses.";

/// Resume structuring prompt. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the resume below into a JSON object with this EXACT schema:
{
  "identity": {
    "name": ["Full Name"],
    "emails": ["email@example.com"]
  },
  "roles": [
    {"title": "Job Title", "company": "Company Name", "start": "YYYY-MM", "end": "YYYY-MM or present"}
  ],
  "skills": [
    {
      "name": "react",
      "level_hint": "beginner|intermediate|advanced",
      "last_used": "YYYY-MM or null",
      "years_hint": 2.5,
      "evidence_snippets": ["short snippet from the resume where this skill is mentioned"]
    }
  ],
  "education": [
    {"degree": "BS in Computer Science", "institution": "University Name", "year": "YYYY"}
  ]
}

Rules:
- One entry per distinct skill, named as it is commonly written (e.g. "react", "postgres", "ci/cd").
- At most 3 evidence snippets per skill, copied verbatim from the resume.

RESUME:
"""{resume_text}""""#;
