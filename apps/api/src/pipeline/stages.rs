//! Stage definitions — one declarative (prompt, expected output) pair per agent.

use std::fmt;

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::pipeline::prompts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Resume,
    Job,
    Scoring,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Resume => "resume",
            StageKind::Job => "job",
            StageKind::Scoring => "scoring",
        };
        f.write_str(name)
    }
}

/// A single agent: persona, instructions, and the JSON shape it must return.
#[derive(Debug, Clone, Copy)]
pub struct StageSpec {
    pub kind: StageKind,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub instructions: &'static str,
    pub expected_output: &'static str,
}

pub const RESUME_STAGE: StageSpec = StageSpec {
    kind: StageKind::Resume,
    role: "Resume Analyzer",
    goal: "Parse a resume into structured JSON data for downstream analysis.",
    backstory: RESUME_BACKSTORY,
    instructions: RESUME_INSTRUCTIONS,
    expected_output: RESUME_EXPECTED_OUTPUT,
};

pub const JOB_STAGE: StageSpec = StageSpec {
    kind: StageKind::Job,
    role: "Job Description Analyzer",
    goal: "Analyze a job description to extract keywords, responsibilities, and requirements.",
    backstory: JOB_BACKSTORY,
    instructions: JOB_INSTRUCTIONS,
    expected_output: JOB_EXPECTED_OUTPUT,
};

pub const SCORING_STAGE: StageSpec = StageSpec {
    kind: StageKind::Scoring,
    role: "ATS Score Generator",
    goal: "Compare the resume analysis with the job description analysis to compute an ATS score and structured feedback.",
    backstory: SCORING_BACKSTORY,
    instructions: SCORING_INSTRUCTIONS,
    expected_output: SCORING_EXPECTED_OUTPUT,
};

impl StageSpec {
    /// System prompt: the agent's backstory plus the JSON-only contract.
    pub fn system_prompt(&self) -> String {
        format!("{} {}", self.backstory, JSON_ONLY_SYSTEM)
    }

    /// Renders the user prompt around a stage-specific input section.
    pub fn render(&self, input: &str) -> String {
        AGENT_PROMPT_TEMPLATE
            .replace("{role}", self.role)
            .replace("{goal}", self.goal)
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{instructions}", self.instructions)
            .replace("{expected_output}", self.expected_output)
            // input last so user text containing placeholders is left untouched
            .replace("{input}", input)
    }
}
