//! PDCA Assistant API Library
//!
//! This library provides the prompt template registry and dispatch engine
//! behind the goal-management assistant, the model adapter boundary, and the
//! at-most-once archive trigger guard.

pub mod api;
pub mod archive;
pub mod config;
pub mod llm;
pub mod prompts;
