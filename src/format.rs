use colored::Colorize;

/// Heading the optimizer is instructed to put above the rewritten prompt.
pub const OPTIMIZED_PROMPT_HEADING: &str = "# Optimized Prompt";

/// Heading that follows the rewritten prompt in the optimizer's reply.
pub const ANALYSIS_HEADING: &str = "# Strategic Analysis";

/// Minimal markdown renderer for terminal output.
/// Not a full parser. Handles headings, **bold**, `inline code`,
/// and ```code blocks```, which is what optimizer output uses.
pub fn render_markdown_lite(text: &str) -> String {
    let mut output = String::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            if in_code_block {
                in_code_block = false;
                output.push('\n');
            } else {
                in_code_block = true;
                let lang = line.trim_start().trim_start_matches('`');
                if !lang.is_empty() {
                    output.push_str(&format!("  {}\n", lang.dimmed()));
                }
            }
            continue;
        }

        if in_code_block {
            output.push_str(&format!("  {}\n", line));
            continue;
        }

        if let Some(heading) = line.strip_prefix("# ") {
            output.push_str(&format!("{}\n", heading.bold().cyan()));
        } else if let Some(heading) = line.strip_prefix("## ") {
            output.push_str(&format!("{}\n", heading.bold()));
        } else {
            output.push_str(&render_inline(line));
            output.push('\n');
        }
    }

    if output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Pulls the body under `# Optimized Prompt` out of the optimizer's reply.
///
/// Stops at `# Strategic Analysis`, or the end of the reply when that heading
/// is missing. Headings inside the rewritten prompt are part of the body.
/// Falls back to the whole text if the model ignored the requested format.
pub fn extract_optimized_prompt(text: &str) -> &str {
    let Some(start) = text.find(OPTIMIZED_PROMPT_HEADING) else {
        return text.trim();
    };
    let body = &text[start + OPTIMIZED_PROMPT_HEADING.len()..];
    let end = body
        .find(&format!("\n{ANALYSIS_HEADING}"))
        .unwrap_or(body.len());
    body[..end].trim()
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if i + 1 < len && chars[i] == '*' && chars[i + 1] == '*' {
            if let Some(end) = find_closing(&chars, i + 2, "**") {
                let bold_text: String = chars[i + 2..end].iter().collect();
                result.push_str(&bold_text.bold().to_string());
                i = end + 2;
                continue;
            }
        }

        if chars[i] == '`' {
            if let Some(end) = chars[i + 1..].iter().position(|c| *c == '`') {
                let code_text: String = chars[i + 1..i + 1 + end].iter().collect();
                result.push_str(&code_text.yellow().to_string());
                i = i + end + 2;
                continue;
            }
        }

        result.push(chars[i]);
        i += 1;
    }

    result
}

fn find_closing(chars: &[char], start: usize, pattern: &str) -> Option<usize> {
    let pat: Vec<char> = pattern.chars().collect();
    if chars.len() < pat.len() {
        return None;
    }
    (start..chars.len() - pat.len() + 1).find(|&i| chars[i..i + pat.len()] == pat[..])
}
