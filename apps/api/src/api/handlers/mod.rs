pub mod archive;
pub mod generate;
pub mod prompts;
