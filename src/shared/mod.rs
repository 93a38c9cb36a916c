pub mod llm;
pub mod prompts;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
