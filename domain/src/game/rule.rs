//! Vote rules for deciding whether the table has caught the odd one out.

use serde::{Deserialize, Serialize};

/// Rule applied to each minority holder's ballot count
///
/// - `Majority`: named by more than half of the counted ballots (default)
/// - `Unanimous`: named by every counted ballot
/// - `AtLeast(n)`: named by at least n ballots
/// - `Percentage(p)`: named by at least p% of ballots
///
/// # Example
///
/// ```
/// use roundtable_domain::game::VoteRule;
///
/// let rule = VoteRule::Majority;
/// assert!(rule.is_satisfied(2, 3));
/// assert!(!rule.is_satisfied(1, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoteRule {
    #[default]
    Majority,
    Unanimous,
    AtLeast(usize),
    Percentage(u8),
}

impl VoteRule {
    /// Check the rule for `named` ballots out of `ballots` counted.
    pub fn is_satisfied(&self, named: usize, ballots: usize) -> bool {
        if ballots == 0 {
            return false;
        }
        named >= self.min_needed(ballots)
    }

    /// Ballots required given a total count; never less than one.
    pub fn min_needed(&self, ballots: usize) -> usize {
        let needed = match self {
            VoteRule::Majority => ballots / 2 + 1,
            VoteRule::Unanimous => ballots,
            VoteRule::AtLeast(n) => *n,
            VoteRule::Percentage(p) => (ballots as f64 * (*p as f64 / 100.0)).ceil() as usize,
        };
        needed.max(1)
    }

    pub fn description(&self) -> String {
        match self {
            VoteRule::Majority => "majority (more than half)".to_string(),
            VoteRule::Unanimous => "unanimous (every ballot)".to_string(),
            VoteRule::AtLeast(n) => format!("at least {} ballots", n),
            VoteRule::Percentage(p) => format!("at least {}% of ballots", p),
        }
    }
}

impl std::fmt::Display for VoteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for VoteRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(VoteRule::Majority),
            "unanimous" => Ok(VoteRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                if n == 0 {
                    return Err("atleast needs at least one ballot".to_string());
                }
                Ok(VoteRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num.parse().map_err(|_| "Invalid percentage")?;
                if p == 0 || p > 100 {
                    return Err(format!("Percentage out of range: {}", p));
                }
                Ok(VoteRule::Percentage(p))
            }
            _ => Err(format!(
                "Unknown vote rule: {}. Valid: majority, unanimous, atleast:N, percentage:N or N%",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_is_strict() {
        let rule = VoteRule::Majority;
        assert!(!rule.is_satisfied(1, 3));
        assert!(rule.is_satisfied(2, 3));
        assert!(!rule.is_satisfied(2, 4));
        assert!(rule.is_satisfied(3, 4));
    }

    #[test]
    fn test_other_rules() {
        assert!(!VoteRule::Unanimous.is_satisfied(2, 3));
        assert!(VoteRule::Unanimous.is_satisfied(3, 3));
        assert!(VoteRule::AtLeast(2).is_satisfied(2, 5));
        assert!(!VoteRule::Percentage(75).is_satisfied(3, 5));
        assert!(VoteRule::Percentage(75).is_satisfied(4, 5));
    }

    #[test]
    fn test_no_ballots_never_satisfies() {
        assert!(!VoteRule::Majority.is_satisfied(0, 0));
        assert!(!VoteRule::AtLeast(0).is_satisfied(0, 0));
    }

    #[test]
    fn test_zero_thresholds_still_need_one_ballot() {
        assert!(!VoteRule::AtLeast(0).is_satisfied(0, 3));
        assert!(!VoteRule::Percentage(0).is_satisfied(0, 3));
        assert!(VoteRule::AtLeast(0).is_satisfied(1, 3));
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!("Majority".parse::<VoteRule>(), Ok(VoteRule::Majority));
        assert_eq!("atleast:2".parse::<VoteRule>(), Ok(VoteRule::AtLeast(2)));
        assert_eq!("75%".parse::<VoteRule>(), Ok(VoteRule::Percentage(75)));
        assert_eq!(
            "percentage:60".parse::<VoteRule>(),
            Ok(VoteRule::Percentage(60))
        );
        assert!("150%".parse::<VoteRule>().is_err());
        assert!("0%".parse::<VoteRule>().is_err());
        assert!("atleast:0".parse::<VoteRule>().is_err());
        assert!("plurality".parse::<VoteRule>().is_err());
    }
}
