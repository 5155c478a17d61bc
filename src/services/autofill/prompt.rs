//! Fill Prompt Assembly
//!
//! Builds the generation request for interview auto-fill. Only trusted
//! pillar content (complete, non-blank) participates as context, capped
//! by a fixed character budget so prompt size stays bounded regardless
//! of how much pillar text a strategy has accumulated.

use crate::models::pillar::Pillar;
use crate::models::strategy::Strategy;
use crate::services::interview::completion::CompletionSplit;
use crate::services::llm::types::GenerationRequest;

/// Max characters of content included per pillar
pub const PILLAR_CONTEXT_BUDGET: usize = 3_000;

/// Marker appended when a pillar's content was cut at the budget
pub const TRUNCATION_MARKER: &str = "\n[content truncated]";

const SYSTEM_PROMPT: &str = "You are a senior brand strategist. You complete \
marketing interview variables from the context you are given. You answer \
with a single JSON object and nothing else.";

/// Concatenate trusted pillar content, each pillar truncated at the
/// per-pillar budget.
///
/// Pillars that are not complete, or whose content is blank, contribute
/// nothing. Truncation is char-boundary safe.
pub fn pillar_context(pillars: &[Pillar]) -> String {
    let mut context = String::new();
    for pillar in pillars {
        if !pillar.is_trusted_context() {
            continue;
        }
        let content = pillar.content.as_deref().unwrap_or_default().trim();
        if !context.is_empty() {
            context.push_str("\n\n");
        }
        context.push_str(&format!("## {}\n", pillar.title));
        if content.chars().count() > PILLAR_CONTEXT_BUDGET {
            context.extend(content.chars().take(PILLAR_CONTEXT_BUDGET));
            context.push_str(TRUNCATION_MARKER);
        } else {
            context.push_str(content);
        }
    }
    context
}

/// Build the full auto-fill generation request for a strategy.
///
/// Filled variables go in as known answers; empty ones are listed with
/// their label, description and example so the model knows what shape
/// each answer takes.
pub fn build_fill_request(
    strategy: &Strategy,
    split: &CompletionSplit<'_>,
    pillars: &[Pillar],
) -> GenerationRequest {
    let mut prompt = String::new();

    prompt.push_str(&format!("Brand: {}\n", strategy.brand_name));
    if let Some(sector) = &strategy.sector {
        prompt.push_str(&format!("Sector: {}\n", sector));
    }

    let context = pillar_context(pillars);
    if !context.is_empty() {
        prompt.push_str("\n# Strategy context\n");
        prompt.push_str(&context);
        prompt.push('\n');
    }

    if !split.filled.is_empty() {
        prompt.push_str("\n# Already answered (do not change these)\n");
        for variable in &split.filled {
            let value = strategy.interview_data.get(&variable.id).unwrap_or_default();
            prompt.push_str(&format!("- {} ({}): {}\n", variable.id, variable.label, value));
        }
    }

    prompt.push_str("\n# Variables to fill\n");
    for variable in &split.empty {
        prompt.push_str(&format!(
            "- {}: {} — {} (example: {})\n",
            variable.id, variable.label, variable.description, variable.example
        ));
    }

    prompt.push_str(
        "\nRespond with exactly one JSON object whose keys are the variable \
         ids listed under \"Variables to fill\" and whose values are concise \
         answer strings. Skip a variable if the context gives you nothing to \
         work with. No markdown, no commentary.",
    );

    GenerationRequest::new(prompt).with_system(SYSTEM_PROMPT)
}
