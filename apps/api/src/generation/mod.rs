// Document generation: tailored resume and cover letter.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
