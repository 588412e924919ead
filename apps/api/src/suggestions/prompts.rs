/// Role description for JD suggestion; `json_system` adds the JSON rule.
pub const JD_SUGGEST_ROLE: &str = "You are a hiring assistant. You receive one or more resumes. \
    Propose 4-5 suitable software roles (e.g. Frontend Engineer, Backend Engineer, \
    Data Scientist, Product Manager) and a short job description for each role.";

/// Suggestion prompt. Replace `{resumes}` before sending.
pub const JD_SUGGEST_PROMPT_TEMPLATE: &str = r#"Return a JSON array with this EXACT shape:
[
  {"role": "Frontend Engineer", "jd": "Job description text..."},
  {"role": "Backend Engineer", "jd": "Job description text..."}
]

RESUMES:
"""{resumes}""""#;
