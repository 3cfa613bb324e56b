// Resume vs JD analysis: prompt, single model call, reply normalization.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
