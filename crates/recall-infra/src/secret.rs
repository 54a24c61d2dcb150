//! Environment credential lookup.
//!
//! The only credential Recall needs is the LLM API key, read from the
//! `ANTHROPIC_API_KEY` environment variable. The value is wrapped in
//! [`SecretString`] immediately so it never appears in logs or Debug
//! output.

use secrecy::SecretString;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Read the Anthropic API key from the environment.
///
/// Returns `None` when the variable is unset. A variable that exists but
/// holds invalid Unicode is treated as not found rather than erroring,
/// since credentials must be valid strings.
pub fn anthropic_api_key() -> Option<SecretString> {
    match std::env::var(API_KEY_VAR) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => None,
    }
}
