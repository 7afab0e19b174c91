// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Appended to every extraction prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY the JSON, nothing else. \
Do NOT include any text outside the JSON. \
Do NOT include explanations or apologies.";

/// Anti-hallucination guardrail shared by CV and cover-letter generation.
pub const GROUNDING_INSTRUCTION: &str = "\
STRICT RULES - ANTI-HALLUCINATION GUARDRAILS:
1. ONLY use information provided in the verified user facts below
2. DO NOT invent, assume, or add any information not explicitly provided
3. DO NOT create fake companies, dates, experiences, achievements or qualifications
4. If information is missing, omit it entirely rather than filling it in";

/// Placeholder written into prompts for absent facts. Never copied into stored data.
pub const NOT_PROVIDED: &str = "Not provided";
