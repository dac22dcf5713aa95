//! Console output formatter for game results and decision reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use roundtable_domain::{
    ContextLog, DecisionReport, GameOutcome, GameResult, LogEntry, Round, SessionId, Turn, Vote,
};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn off ANSI colors for everything printed afterwards
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Format the complete game: every round, then the outcome
    pub fn format(result: &GameResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Roundtable Game"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Session:".cyan().bold(),
            result.session_id
        ));

        for round in &result.rounds {
            output.push_str(&Self::section_header(&format!("Round {}", round.number)));
            output.push_str(&Self::format_round(round));
        }

        output.push_str(&Self::section_header("Result"));
        output.push_str(&Self::outcome_block(result));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Outcome and revealed words only
    pub fn format_summary(result: &GameResult) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", "=== Roundtable Result ===".cyan().bold()));
        output.push_str(&Self::outcome_block(result));
        output
    }

    /// Research, decision and citations of a pipeline run
    pub fn format_report(report: &DecisionReport, full: bool) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Research & Decision"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Subject:".cyan().bold(), report.subject));

        if full {
            output.push_str(&Self::section_header("Research"));
            output.push_str(&format!("\n{}\n", report.research));
        }

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!("\n{}\n\n", report.decision_text));

        let risk = report.risk.as_str();
        let risk = match report.risk {
            roundtable_domain::RiskLabel::Low => risk.green(),
            roundtable_domain::RiskLabel::Medium => risk.yellow(),
            roundtable_domain::RiskLabel::High => risk.red(),
            roundtable_domain::RiskLabel::Unknown => risk.dimmed(),
        };
        output.push_str(&format!(
            "{} {}    {} {}\n",
            "Decision:".bold(),
            report.decision.as_str().bold(),
            "Risk:".bold(),
            risk.bold()
        ));

        if !report.citations.is_empty() {
            output.push_str(&format!("\n{}\n", "Sources:".cyan().bold()));
            for (i, citation) in report.citations.iter().enumerate() {
                output.push_str(&format!("  [{}] {}\n", i + 1, citation));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Stored session ids, one per line
    pub fn format_session_list(ids: &[SessionId]) -> String {
        if ids.is_empty() {
            return format!("{}\n", "No stored sessions.".dimmed());
        }
        let mut output = format!("{}\n", "Stored sessions:".cyan().bold());
        for id in ids {
            output.push_str(&format!("  {}\n", id));
        }
        output
    }

    /// A stored log in sequence order
    pub fn format_log(log: &ContextLog) -> String {
        let mut output = format!(
            "{} {} ({} entries)\n",
            "Session:".cyan().bold(),
            log.session_id(),
            log.len()
        );

        let mut current_round = 0;
        for entry in log.entries() {
            if entry.round() != current_round {
                current_round = entry.round();
                output.push_str(&Self::section_header(&format!("Round {}", current_round)));
            }
            let line = match entry {
                LogEntry::Turn(turn) => Self::turn_line(turn),
                LogEntry::Vote(vote) => Self::vote_line(vote),
            };
            output.push_str(&format!("{:>4}  {}\n", entry.seq(), line));
        }
        output
    }

    fn format_round(round: &Round) -> String {
        let mut output = String::from("\n");
        for turn in &round.turns {
            output.push_str(&Self::turn_line(turn));
            output.push('\n');
        }

        if !round.votes.is_empty() {
            output.push_str(&format!("\n{}\n", "Votes:".bold()));
            for vote in &round.votes {
                output.push_str(&format!("  {}\n", Self::vote_line(vote)));
            }

            let tally = round.tally();
            let counts: Vec<String> = tally
                .ranking()
                .iter()
                .map(|(id, n)| format!("{} {}", id, n))
                .collect();
            output.push_str(&format!(
                "{} {} ({} ballots, {} abstained)\n",
                "Tally:".bold(),
                if counts.is_empty() {
                    "-".to_string()
                } else {
                    counts.join(", ")
                },
                tally.ballots,
                tally.abstentions
            ));
        }
        output
    }

    fn turn_line(turn: &Turn) -> String {
        let speaker = format!("{}:", turn.speaker).yellow().bold();
        match turn.text() {
            Some(text) => format!("{} {}", speaker, text.trim()),
            None => format!("{} {}", speaker, "(no response)".dimmed()),
        }
    }

    fn vote_line(vote: &Vote) -> String {
        if vote.abstained {
            return format!("{} {}", vote.voter, "abstained".dimmed());
        }
        let targets: Vec<&str> = vote.targets.iter().map(|t| t.as_str()).collect();
        let mut line = format!("{} -> {}", vote.voter, targets.join(" & ").bold());
        if !vote.reasoning.trim().is_empty() {
            line.push_str(&format!(" {}", format!("({})", vote.reasoning.trim()).dimmed()));
        }
        line
    }

    fn outcome_block(result: &GameResult) -> String {
        let label = result.outcome.label();
        let label = match result.outcome {
            GameOutcome::MajorityWins | GameOutcome::CriterionMet => label.green(),
            GameOutcome::Inconclusive => label.yellow(),
            GameOutcome::Aborted { .. } => label.red(),
        };
        let mut output = format!(
            "{} {} after {} round(s)\n",
            "Outcome:".cyan().bold(),
            label.bold(),
            result.rounds_played()
        );

        if let Some(assignment) = &result.assignment {
            output.push_str(&format!(
                "\n{} majority \"{}\", odd one out \"{}\"\n",
                "Words:".cyan().bold(),
                assignment.majority_word(),
                assignment.minority_word()
            ));
            for (id, word) in assignment.iter() {
                let marker = if assignment.is_minority(id) {
                    " <- odd one out".red().to_string()
                } else {
                    String::new()
                };
                output.push_str(&format!("  {:<12} {}{}\n", id.as_str(), word, marker));
            }
        }

        if !result.violations.is_empty() {
            output.push_str(&format!("\n{}\n", "Protocol violations:".yellow().bold()));
            for violation in &result.violations {
                output.push_str(&format!("  * {}\n", violation));
            }
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &GameResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &GameResult) -> String {
        Self::format_json(result)
    }

    fn format_summary(&self, result: &GameResult) -> String {
        Self::format_summary(result)
    }

    fn format_report(&self, report: &DecisionReport, full: bool) -> String {
        Self::format_report(report, full)
    }
}
