//! Reading the decision and risk level out of the analyst's prose.

use super::report::{Decision, RiskLabel};

/// Find the risk label, preferring an explicit `risk` annotation.
///
/// Compound labels resolve to the higher end ("Medium-High" is `High`).
///
/// ```
/// use roundtable_domain::pipeline::{RiskLabel, parse_risk_label};
///
/// assert_eq!(parse_risk_label("**Risk level:** Medium-High"), RiskLabel::High);
/// assert_eq!(parse_risk_label("No view."), RiskLabel::Unknown);
/// ```
pub fn parse_risk_label(text: &str) -> RiskLabel {
    let lower = text.to_lowercase();

    for line in lower.lines() {
        let Some(pos) = line.find("risk") else {
            continue;
        };
        let rest = &line[pos..];
        if let Some(label) = strongest_level(rest) {
            return label;
        }
        // "high risk" style: the level precedes the keyword
        if let Some(label) = strongest_level(&line[..pos]) {
            return label;
        }
    }
    RiskLabel::Unknown
}

fn strongest_level(text: &str) -> Option<RiskLabel> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .take(8)
        .collect();
    if words.contains(&"high") || words.contains(&"extreme") || words.contains(&"elevated") {
        Some(RiskLabel::High)
    } else if words.contains(&"medium") || words.contains(&"moderate") {
        Some(RiskLabel::Medium)
    } else if words.contains(&"low") {
        Some(RiskLabel::Low)
    } else {
        None
    }
}

/// Find the recommendation, preferring an explicit `decision`/`recommendation` line.
///
/// ```
/// use roundtable_domain::pipeline::{Decision, parse_decision};
///
/// assert_eq!(parse_decision("Recommendation: SELL half now."), Decision::Sell);
/// ```
pub fn parse_decision(text: &str) -> Decision {
    let lower = text.to_lowercase();

    let marked = lower.lines().find_map(|line| {
        ["decision", "recommendation", "verdict"]
            .iter()
            .find_map(|key| line.find(key).map(|pos| &line[pos + key.len()..]))
            .and_then(first_decision)
    });
    if let Some(decision) = marked {
        return decision;
    }

    // Unmarked: only an unambiguous single call counts
    let mut seen: Vec<Decision> = Vec::new();
    for word in lower.split(|c: char| !c.is_alphanumeric()) {
        if let Some(d) = decision_word(word)
            && !seen.contains(&d)
        {
            seen.push(d);
        }
    }
    match seen.as_slice() {
        [only] => *only,
        _ => Decision::Unknown,
    }
}

fn first_decision(text: &str) -> Option<Decision> {
    text.split(|c: char| !c.is_alphanumeric())
        .find_map(decision_word)
}

fn decision_word(word: &str) -> Option<Decision> {
    match word {
        "buy" | "accumulate" => Some(Decision::Buy),
        "sell" => Some(Decision::Sell),
        "hold" | "wait" => Some(Decision::Hold),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_labels() {
        assert_eq!(parse_risk_label("Risk level: high"), RiskLabel::High);
        assert_eq!(parse_risk_label("risk: Moderate"), RiskLabel::Medium);
        assert_eq!(parse_risk_label("This is a low risk position."), RiskLabel::Low);
        assert_eq!(parse_risk_label("Risk: Medium-High"), RiskLabel::High);
        assert_eq!(parse_risk_label("Prices are high."), RiskLabel::Unknown);
    }

    #[test]
    fn test_marked_decision_wins() {
        let text = "Some would buy the dip.\n**Decision:** Sell within two weeks.";
        assert_eq!(parse_decision(text), Decision::Sell);
    }

    #[test]
    fn test_unmarked_decision_must_be_unambiguous() {
        assert_eq!(parse_decision("I would hold for now."), Decision::Hold);
        assert_eq!(
            parse_decision("Either buy or sell depending on appetite."),
            Decision::Unknown
        );
        assert_eq!(parse_decision("No opinion."), Decision::Unknown);
    }
}
