//! Prompt templates for the game and the research pipeline

use crate::context::PublicUtterance;
use crate::game::{ParticipantId, Tally};
use crate::tool::{ToolCall, ToolResult, ToolSpec};

/// Criterion used by the judge when the caller does not supply one.
pub const DEFAULT_SUCCESS_CRITERION: &str =
    "The players have successfully decided who is the Odd One Out.";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for every game player
    pub fn player_system(name: &ParticipantId) -> String {
        format!(
            r#"You are {name}, one of the players of the game Odd One Out.

You will be given one word. Describe it with related words or sentences, but never say the word itself.
You do not know the other players' words, and nobody is told who the Odd One Out is.
If, after listening to the descriptions before yours, you suspect you are the Odd One Out, blend in and try to steer the Majority into voting out one of their own.

Rules:
---
Most players receive the same word (the "Majority").
One or two players receive a different but related word (the "Odd Ones Out").
Players take turns describing their word without saying it directly.
After everyone has described their word once, all players vote on who they think is the Odd One Out.
The Majority wins if they correctly identify all Odd Ones Out.
The Odd Ones Out win if they avoid detection or trick the Majority into voting out one of their own.
---
Example:

Majority word: "Apple"
Odd One Out word: "Pear"
Players describe their fruit without saying "apple" or "pear", using characteristics, uses, or associations instead."#
        )
    }

    /// User prompt asking a player for this round's description
    pub fn turn_prompt(
        name: &ParticipantId,
        word: &str,
        round: u32,
        transcript: &[PublicUtterance],
    ) -> String {
        let mut prompt = format!(
            "Round {round}. You are {name}. Your secret word is \"{word}\". Never write it.\n\n"
        );
        prompt.push_str(&Self::transcript_section(transcript));
        prompt.push_str(
            "\nGive your description now: one to three sentences, no preamble, and do not repeat earlier descriptions.",
        );
        prompt
    }

    /// User prompt asking a player for its ballot
    pub fn vote_prompt(
        name: &ParticipantId,
        round: u32,
        transcript: &[PublicUtterance],
        others: &[&ParticipantId],
    ) -> String {
        let candidates = others
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut prompt = format!(
            "Round {round} voting. You are {name}.\n\n{}",
            Self::transcript_section(transcript)
        );
        prompt.push_str(&format!(
            r#"
Who do you think holds a different word from yours? Choose one or two of: {candidates}.
You cannot vote for yourself. Explain briefly, then finish with a single line:

VOTE: <name>[, <name>]"#
        ));
        prompt
    }

    fn transcript_section(transcript: &[PublicUtterance]) -> String {
        if transcript.is_empty() {
            return "Nobody has spoken yet.\n".to_string();
        }
        let mut section = String::from("Descriptions so far:\n");
        for u in transcript {
            section.push_str(&format!("- [round {}] {}: {}\n", u.round, u.speaker, u.content));
        }
        section
    }

    /// System prompt for the referee that judges the success criterion
    pub fn judge_system() -> &'static str {
        r#"You are the referee of the Odd One Out game.
You never play and never vote. Your only job is to decide whether the game has met its success criterion or must move on to another round.
Answer with SUCCESS or FAILURE on the first line, followed by one short sentence of justification."#
    }

    /// User prompt for the referee
    pub fn judge_prompt(
        criterion: &str,
        round: u32,
        transcript: &[PublicUtterance],
        tally: &Tally,
        odd_ones_out: &[&ParticipantId],
    ) -> String {
        let mut prompt = format!("Success criterion: {criterion}\n\nAfter round {round}.\n\n");
        prompt.push_str(&Self::transcript_section(transcript));

        prompt.push_str(&format!(
            "\nBallots: {} counted, {} abstained.\n",
            tally.ballots, tally.abstentions
        ));
        for (id, count) in tally.ranking() {
            prompt.push_str(&format!("- {}: {} vote(s)\n", id, count));
        }

        let odd = odd_ones_out
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            "\nReferee-only information: the Odd Ones Out are {odd}.\n\nIs the success criterion met? Answer SUCCESS or FAILURE."
        ));
        prompt
    }

    /// System prompt for the researcher role
    pub fn researcher_system() -> &'static str {
        r#"You are a financial cryptocurrency research assistant.
When given a subject, research it thoroughly with the tools available: search the web, read the most relevant pages, and check current market data.
Write a detailed research report covering fundamentals, recent news, market data, and notable risks.
Always include the source URL of every fact you rely on."#
    }

    pub fn research_prompt(subject: &str) -> String {
        format!(
            "Research the following and produce a detailed report with sources:\n\n{}",
            subject
        )
    }

    /// System prompt for the analyst role
    pub fn analyst_system() -> &'static str {
        r#"You are a renowned financial cryptocurrency analyst.
Given a research report and the user's question, decide whether and when to buy, sell, or hold, and give your reasons.
You may search for additional information with the tools available before deciding.
State the risk level and the potential return, and cite your sources.

End your answer with these two lines:
Decision: <buy|sell|hold>
Risk level: <low|medium|high>"#
    }

    pub fn analysis_prompt(subject: &str, research: &str) -> String {
        format!(
            r#"Question: {subject}

Research report from the researcher:
---
{research}
---

Make your decision."#
        )
    }

    /// Appendix to a system prompt describing the ```tool convention
    pub fn tool_instructions(spec: &ToolSpec) -> String {
        let tool_descriptions = spec
            .all()
            .iter()
            .map(|t| {
                let params = t
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { " (required)" } else { "" };
                        format!("    - {} ({}): {}{}", p.name, p.param_type, p.description, required)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("- **{}**: {}\n  Parameters:\n{}", t.name, t.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"

## Available Tools

{tool_descriptions}

## How to Use Tools

When you need a tool, output one JSON block per call in this format:

```tool
{{
  "tool": "tool_name",
  "args": {{
    "arg1": "value1"
  }},
  "reasoning": "Brief explanation of why you're using this tool"
}}
```

Several blocks in one message run together. You will receive the results in the next message.
When you have what you need, answer without any tool blocks."#
        )
    }

    /// Feed tool results back to the model
    pub fn tool_results(results: &[(ToolCall, ToolResult)]) -> String {
        let mut prompt = String::from("Tool results:\n");
        for (call, result) in results {
            prompt.push_str(&format!(
                "\n--- {} ---\n{}\n",
                call.tool_name,
                result.as_feedback()
            ));
        }
        prompt.push_str("\nContinue. Call more tools if needed, otherwise give your final answer.");
        prompt
    }
}
