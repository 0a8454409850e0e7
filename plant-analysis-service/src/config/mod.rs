use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

/// Token budget for the narrative completion request.
const DEFAULT_MAX_TOKENS: u32 = 900;

#[derive(Debug, Clone, Deserialize)]
pub struct PlantConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub plant_id: PlantIdConfig,
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantIdConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Chat-completion model (e.g. gpt-4o-mini)
    pub model: String,
    pub max_tokens: u32,
}

impl PlantConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        // API keys may load empty in dev; the analyze handler rejects the
        // request before any outbound call when either one is blank.
        Ok(PlantConfig {
            common: common_config,
            plant_id: PlantIdConfig {
                api_key: core_config::get_env("PLANT_ID_API_KEY", Some(""), is_prod)?,
                base_url: core_config::get_env(
                    "PLANT_ID_BASE_URL",
                    Some("https://api.plant.id"),
                    is_prod,
                )?,
            },
            openai: OpenAiConfig {
                api_key: core_config::get_env("OPENAI_API_KEY", Some(""), is_prod)?,
                base_url: core_config::get_env(
                    "OPENAI_BASE_URL",
                    Some("https://api.openai.com"),
                    is_prod,
                )?,
                model: core_config::get_env("OPENAI_MODEL", Some("gpt-4o-mini"), is_prod)?,
                max_tokens: core_config::get_env(
                    "OPENAI_MAX_TOKENS",
                    Some(&DEFAULT_MAX_TOKENS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_TOKENS),
            },
        })
    }

    /// Both upstream credentials are present.
    pub fn has_api_keys(&self) -> bool {
        !self.plant_id.api_key.is_empty() && !self.openai.api_key.is_empty()
    }
}
