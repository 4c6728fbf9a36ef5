// Review pipeline: three agent stages and the runner that wires them together.
// All LLM calls go through the AgentRuntime trait — no direct provider calls here.

pub mod prompts;
pub mod runner;
pub mod stages;
