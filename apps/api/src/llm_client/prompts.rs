// Cross-cutting prompt fragments shared by every agent stage.
// Stage-specific text lives in pipeline::prompts.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every stage prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only information present in the provided input. \
    Do NOT infer, interpolate, or invent details. \
    If the input does not support a claim, omit it entirely.";
