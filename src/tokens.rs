//! Token counting for acu.
//!
//! Uses tiktoken-rs for BPE tokenization. The estimate shown after an
//! optimization is for the target prompt, so cl100k_base (GPT-4 family)
//! serves as a reasonable approximation for every target.

use anyhow::{anyhow, Result};

/// Count tokens for a text string with the cl100k_base tokenizer.
pub fn count_tokens(text: &str) -> Result<usize> {
    let bpe = tiktoken_rs::cl100k_base().map_err(|e| anyhow!("Failed to load tokenizer: {e}"))?;
    Ok(bpe.encode_ordinary(text).len())
}

/// Format a number with thousands separators. Example: "1,234"
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
