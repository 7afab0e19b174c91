// Document generation: fact verification, language detection and tailored CV /
// cover-letter text. All LLM calls go through llm_client::GenerationGateway.

pub mod facts;
pub mod generator;
pub mod handlers;
pub mod language;
pub mod prompts;
