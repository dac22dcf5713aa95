//! Extracting ballots and verdicts from free-form model responses.
//!
//! Pure text matching, no I/O.
//!
//! | Function | Use Case | Accepted forms |
//! |----------|----------|----------------|
//! | [`parse_vote_targets`] | Player ballots | JSON, `VOTE:` line, names on the last line |
//! | [`parse_judge_verdict`] | Success criterion | SUCCESS / FAILURE |

use super::participant::{ParticipantId, Roster};
use super::text::find_whole_word;

/// Extract the participants named in a vote response.
///
/// Tried in order, first non-empty result wins:
///
/// 1. **JSON**: `{"vote": ["Agent 2"]}` (also `"votes"`/`"targets"`, string or array)
/// 2. **Vote line**: `VOTE: Agent 2, Agent 3`
/// 3. **Last line**: roster names mentioned in the last non-empty line
///
/// Names are matched case-insensitively against the roster; the voter and
/// unknown names are dropped.
///
/// # Examples
///
/// ```
/// use roundtable_domain::game::{Participant, ParticipantId, Roster, parse_vote_targets};
/// use roundtable_domain::Model;
///
/// let roster = Roster::new(
///     ["Agent 1", "Agent 2", "Agent 3"]
///         .into_iter()
///         .map(|n| Participant::player(n, Model::default()))
///         .collect(),
/// )
/// .unwrap();
/// let voter = ParticipantId::new("Agent 1");
///
/// let targets = parse_vote_targets("I think it's agent 3.\nVOTE: Agent 3", &voter, &roster);
/// assert_eq!(targets, vec![ParticipantId::new("Agent 3")]);
/// ```
pub fn parse_vote_targets(
    response: &str,
    voter: &ParticipantId,
    roster: &Roster,
) -> Vec<ParticipantId> {
    let from_json = json_names(response)
        .map(|names| resolve(names.iter().map(String::as_str), voter, roster))
        .unwrap_or_default();
    if !from_json.is_empty() {
        return from_json;
    }

    let from_line = vote_line(response)
        .map(|line| resolve(split_names(line), voter, roster))
        .unwrap_or_default();
    if !from_line.is_empty() {
        return from_line;
    }

    response
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(|line| mentioned_in(line, voter, roster))
        .unwrap_or_default()
}

fn json_names(response: &str) -> Option<Vec<String>> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }
    let parsed: serde_json::Value = serde_json::from_str(&response[start..=end]).ok()?;

    let value = ["vote", "votes", "targets", "target"]
        .iter()
        .find_map(|key| parsed.get(*key))?;

    match value {
        serde_json::Value::String(s) => Some(split_names(s).map(str::to_string).collect()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Text after the last `VOTE:` marker, tolerating markdown emphasis.
fn vote_line(response: &str) -> Option<&str> {
    response.lines().rev().find_map(|line| {
        let cleaned = line.trim().trim_start_matches(['*', '#', '-', ' ']);
        let rest = strip_prefix_ignore_case(cleaned, "VOTES:")
            .or_else(|| strip_prefix_ignore_case(cleaned, "VOTE:"))?;
        Some(rest.trim().trim_matches('*').trim())
    })
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

fn split_names(s: &str) -> impl Iterator<Item = &str> {
    s.split([',', ';', '&', '/'])
        .flat_map(|part| part.split(" and "))
        .map(|p| p.trim().trim_matches(['"', '\'', '.', '*']).trim())
        .filter(|p| !p.is_empty())
}

fn resolve<'a>(
    names: impl Iterator<Item = &'a str>,
    voter: &ParticipantId,
    roster: &Roster,
) -> Vec<ParticipantId> {
    let mut out: Vec<ParticipantId> = Vec::new();
    for name in names {
        if let Some(p) = roster.find_by_name(name)
            && &p.id != voter
            && !out.contains(&p.id)
        {
            out.push(p.id.clone());
        }
    }
    out
}

fn mentioned_in(line: &str, voter: &ParticipantId, roster: &Roster) -> Vec<ParticipantId> {
    let mut found: Vec<(usize, ParticipantId)> = roster
        .ids()
        .filter(|id| *id != voter)
        .filter_map(|id| find_whole_word(line, id.as_str()).map(|pos| (pos, id.clone())))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, id)| id).collect()
}

/// Parse a judge response: true only for an unambiguous SUCCESS.
///
/// Conservative: anything mentioning FAILURE, PARTIAL or a negated success
/// is "not met".
pub fn parse_judge_verdict(response: &str) -> bool {
    let upper = response.to_uppercase();

    upper.contains("SUCCESS")
        && !upper.contains("FAILURE")
        && !upper.contains("PARTIAL")
        && !upper.contains("NOT SUCCESS")
        && !upper.contains("UNSUCCESS")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Model;
    use crate::game::participant::Participant;

    fn roster() -> Roster {
        Roster::new(
            ["Agent 1", "Agent 2", "Agent 3", "Agent 12"]
                .into_iter()
                .map(|n| Participant::player(n, Model::default()))
                .collect(),
        )
        .unwrap()
    }

    fn id(n: &str) -> ParticipantId {
        ParticipantId::new(n)
    }

    #[test]
    fn test_json_vote() {
        let r = roster();
        let t = parse_vote_targets(
            r#"Reasoning... {"vote": ["agent 2", "Agent 9", "Agent 1"]}"#,
            &id("Agent 1"),
            &r,
        );
        assert_eq!(t, vec![id("Agent 2")]);

        let t = parse_vote_targets(r#"{"targets": "Agent 3, Agent 2"}"#, &id("Agent 1"), &r);
        assert_eq!(t, vec![id("Agent 3"), id("Agent 2")]);
    }

    #[test]
    fn test_vote_line_with_markdown() {
        let r = roster();
        let t = parse_vote_targets(
            "Agent 2 was vague.\n**Vote:** Agent 2 and Agent 3\nThanks!",
            &id("Agent 1"),
            &r,
        );
        assert_eq!(t, vec![id("Agent 2"), id("Agent 3")]);
    }

    #[test]
    fn test_last_line_fallback_respects_word_boundaries() {
        let r = roster();
        let t = parse_vote_targets(
            "Lots of thinking here about Agent 2.\n\nI suspect Agent 12.\n",
            &id("Agent 3"),
            &r,
        );
        assert_eq!(t, vec![id("Agent 12")]);
    }

    #[test]
    fn test_self_and_unknown_only_yield_nothing() {
        let r = roster();
        assert!(parse_vote_targets("VOTE: Agent 1", &id("Agent 1"), &r).is_empty());
        assert!(parse_vote_targets("VOTE: nobody", &id("Agent 1"), &r).is_empty());
        assert!(parse_vote_targets("", &id("Agent 1"), &r).is_empty());
    }

    #[test]
    fn test_judge_verdict() {
        assert!(parse_judge_verdict("SUCCESS: the table found the odd one out."));
        assert!(!parse_judge_verdict("FAILURE: not yet."));
        assert!(!parse_judge_verdict("Partial success"));
        assert!(!parse_judge_verdict("The round was unsuccessful."));
        assert!(!parse_judge_verdict("I cannot tell."));
    }
}
