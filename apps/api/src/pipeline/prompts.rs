// All LLM prompt text for the three agent stages.
// Cross-cutting fragments come from llm_client::prompts.

/// Shared layout of every stage prompt.
/// Replace: {role}, {goal}, {grounding_instruction}, {instructions}, {input}, {expected_output}
pub const AGENT_PROMPT_TEMPLATE: &str = r#"ROLE: {role}
GOAL: {goal}

{grounding_instruction}

INSTRUCTIONS:
{instructions}

INPUT:
{input}

Return a JSON object with this EXACT schema (no extra fields):
{expected_output}"#;

// ── Resume Analyzer ─────────────────────────────────────────────────────────

pub const RESUME_BACKSTORY: &str = "You are an expert HR analyst specializing in resume parsing. \
    Your job is to summarize the resume and extract keywords of important skills and experiences.";

pub const RESUME_INSTRUCTIONS: &str = "\
- Read the resume provided as the knowledge source.
- Write a concise paragraph summarizing the candidate's background.
- Extract keywords: skills, tools, technologies, domains, and notable experience (e.g. \"5 years experience\").
- The number of keywords is flexible; include every important one and nothing else.
- Every keyword must appear in the resume verbatim or as a trivial variant (plural, tense).
- Do NOT fabricate information that is not present in the resume.";

/// Replace: {resume_name}
pub const RESUME_INPUT_TEMPLATE: &str =
    "The resume \"{resume_name}\" is attached below as the knowledge source.";

pub const RESUME_EXPECTED_OUTPUT: &str = r#"{
  "summary": "A concise paragraph summarizing the resume",
  "keywords": ["Python", "Machine Learning", "5 years experience"]
}"#;

// ── Job Description Analyzer ────────────────────────────────────────────────

pub const JOB_BACKSTORY: &str = "You are a skilled job market analyst. \
    Your task is to parse the provided job description text, identify key keywords \
    (required skills, tools), list responsibilities, and outline requirements \
    (experience level, qualifications).";

pub const JOB_INSTRUCTIONS: &str = "\
- KEYWORDS: skills, tools, languages, frameworks, and domain terms named in the description.
- RESPONSIBILITIES: what the hire will do, one short item per duty.
- REQUIREMENTS: must-haves and qualifications, including years of experience and degrees.
- Use an empty list when the description says nothing for a category.
- Do NOT invent requirements the description does not state.";

/// Replace: {job_description}
pub const JOB_INPUT_TEMPLATE: &str = "JOB DESCRIPTION:\n{job_description}";

pub const JOB_EXPECTED_OUTPUT: &str = r#"{
  "keywords": ["Rust", "Kubernetes"],
  "responsibilities": ["Build and operate backend services"],
  "requirements": ["3+ years of backend development"]
}"#;

// ── ATS Score Generator ─────────────────────────────────────────────────────

pub const SCORING_BACKSTORY: &str = "You are an ATS optimization expert. \
    You compare resume keywords with job description keywords and requirements. \
    You must produce a score out of 100 and a breakdown of strengths, weaknesses, and summary.";

pub const SCORING_INSTRUCTIONS: &str = "\
- Compute an ATS score (0-100) from the overlap of the resume analysis with the job \
keywords, responsibilities, and requirements.
- The score must reflect that overlap: more covered requirements means a higher score.
- Do not expect exact keyword matches; related terms count as partial overlap.
- Base every statement on the two analyses below. Do NOT hallucinate.
- strengths and weaknesses are JSON arrays of short strings.
- Keep the summary concise and grounded.";

/// Replace: {resume_json}, {job_json}
pub const SCORING_INPUT_TEMPLATE: &str =
    "RESUME ANALYSIS:\n{resume_json}\n\nJOB DESCRIPTION ANALYSIS:\n{job_json}";

pub const SCORING_EXPECTED_OUTPUT: &str = r#"{
  "ats_score": 75,
  "analysis": {
    "strengths": ["Strong Rust background matching the core requirement"],
    "weaknesses": ["No Kubernetes experience mentioned"],
    "summary": "Good overall fit with one notable infrastructure gap."
  }
}"#;
