use serde::{Deserialize, Serialize};

/// Which end condition is checked first after a round's votes are in
///
/// The round limit is always checked last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Majority-correct check, then the success criterion
    #[default]
    MajorityFirst,
    /// Success criterion, then the majority-correct check
    CriterionFirst,
}

impl TerminationPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            TerminationPolicy::MajorityFirst => "majority_first",
            TerminationPolicy::CriterionFirst => "criterion_first",
        }
    }
}

impl std::fmt::Display for TerminationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TerminationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "majority_first" | "majority" => Ok(TerminationPolicy::MajorityFirst),
            "criterion_first" | "criterion" => Ok(TerminationPolicy::CriterionFirst),
            other => Err(format!(
                "Unknown termination policy: {}. Valid: majority_first, criterion_first",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "criterion-first".parse::<TerminationPolicy>(),
            Ok(TerminationPolicy::CriterionFirst)
        );
        assert_eq!(
            "majority".parse::<TerminationPolicy>(),
            Ok(TerminationPolicy::MajorityFirst)
        );
        assert!("random".parse::<TerminationPolicy>().is_err());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&TerminationPolicy::CriterionFirst).unwrap();
        assert_eq!(json, "\"criterion_first\"");
    }
}
