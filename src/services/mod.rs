pub mod chart;
pub mod llm;
pub mod prompt;
pub mod results;
pub mod session;
