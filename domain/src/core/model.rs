//! Model value object representing a hosted LLM

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Hosted models known to the roundtable (Value Object)
///
/// Each participant, the judge and the pipeline roles are bound to one model.
/// Unknown identifiers are carried as [`Model::Custom`] and routed by the
/// provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // DeepSeek
    DeepSeekChat,
    DeepSeekReasoner,
    // OpenAI
    Gpt4o,
    Gpt4oMini,
    O3Mini,
    // Google
    Gemini20Flash,
    // Perplexity
    SonarPro,
    Sonar,
    // Routed through OpenRouter ("vendor/model")
    OpenRouterGeminiFlash,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::DeepSeekChat => "deepseek-chat",
            Model::DeepSeekReasoner => "deepseek-reasoner",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::O3Mini => "o3-mini",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::SonarPro => "sonar-pro",
            Model::Sonar => "sonar",
            Model::OpenRouterGeminiFlash => "google/gemini-2.0-flash-001",
            Model::Custom(s) => s,
        }
    }

    /// Default player line-up: three different vendors so that no single
    /// model family dominates the table.
    pub fn default_players() -> Vec<Model> {
        vec![Model::DeepSeekChat, Model::Gpt4o, Model::O3Mini]
    }

    /// Default referee model for success-criterion judging
    pub fn default_judge() -> Model {
        Model::OpenRouterGeminiFlash
    }

    pub fn is_deepseek(&self) -> bool {
        matches!(self, Model::DeepSeekChat | Model::DeepSeekReasoner)
            || self.as_str().starts_with("deepseek-")
    }

    pub fn is_openai(&self) -> bool {
        matches!(self, Model::Gpt4o | Model::Gpt4oMini | Model::O3Mini)
            || (!self.is_openrouter()
                && (self.as_str().starts_with("gpt-")
                    || self.as_str().starts_with("o1")
                    || self.as_str().starts_with("o3")
                    || self.as_str().starts_with("o4")))
    }

    pub fn is_gemini(&self) -> bool {
        matches!(self, Model::Gemini20Flash)
            || (!self.is_openrouter() && self.as_str().starts_with("gemini-"))
    }

    pub fn is_perplexity(&self) -> bool {
        matches!(self, Model::SonarPro | Model::Sonar) || self.as_str().starts_with("sonar")
    }

    /// OpenRouter model ids are namespaced by vendor (`google/...`).
    pub fn is_openrouter(&self) -> bool {
        self.as_str().contains('/')
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::DeepSeekChat
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "deepseek-chat" => Model::DeepSeekChat,
            "deepseek-reasoner" => Model::DeepSeekReasoner,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "o3-mini" => Model::O3Mini,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "sonar-pro" => Model::SonarPro,
            "sonar" => Model::Sonar,
            "google/gemini-2.0-flash-001" => Model::OpenRouterGeminiFlash,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse();
        Ok(model)
    }
}
