pub mod extract;
pub mod llm;
