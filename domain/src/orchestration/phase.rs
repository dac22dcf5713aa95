use serde::{Deserialize, Serialize};

/// Stage of a game or pipeline run, used for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "round")]
pub enum Phase {
    /// Players describe their words
    Describe(u32),
    /// Players cast ballots
    Vote(u32),
    /// Referee checks the success criterion
    Judge(u32),
    /// Researcher gathers evidence
    Research,
    /// Analyst decides
    Analysis,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Describe(_) => "describe",
            Phase::Vote(_) => "vote",
            Phase::Judge(_) => "judge",
            Phase::Research => "research",
            Phase::Analysis => "analysis",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Phase::Describe(r) => format!("Round {} descriptions", r),
            Phase::Vote(r) => format!("Round {} voting", r),
            Phase::Judge(r) => format!("Round {} referee", r),
            Phase::Research => "Research".to_string(),
            Phase::Analysis => "Analysis".to_string(),
        }
    }

    pub fn round(&self) -> Option<u32> {
        match self {
            Phase::Describe(r) | Phase::Vote(r) | Phase::Judge(r) => Some(*r),
            Phase::Research | Phase::Analysis => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Describe(2).to_string(), "Round 2 descriptions");
        assert_eq!(Phase::Vote(1).as_str(), "vote");
        assert_eq!(Phase::Research.round(), None);
        assert_eq!(Phase::Judge(3).round(), Some(3));
    }
}
