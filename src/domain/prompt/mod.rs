//! Prompt construction for the support assistant

mod builder;

pub use builder::{
    build_prompt, format_documentation, format_history, MAX_DOCUMENTATION_CHARS, NO_DOCUMENTATION,
    REFUSAL_PHRASE, TRUNCATION_MARKER,
};
