// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces only.

/// Sampling temperature used for every generation call.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Appended to system prompts that expect a JSON payload back.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Appended to generation prompts that write documents on the user's behalf.
pub const NO_PLACEHOLDER_INSTRUCTION: &str = "Do not include placeholder text like '[Your Name]' - \
    use the provided information directly.";
