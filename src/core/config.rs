use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub inference: InferenceConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Wire format spoken by the inference endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceBackend {
    /// Hugging Face Inference API: `{"inputs", "parameters"}` -> `[{"generated_text"}]`
    TextGeneration,
    /// OpenAI-compatible `/v1/chat/completions`
    ChatCompletions,
}

impl FromStr for InferenceBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text-generation" | "text_generation" => Ok(Self::TextGeneration),
            "chat-completions" | "chat_completions" => Ok(Self::ChatCompletions),
            other => Err(format!(
                "Unknown INFERENCE_BACKEND '{}' (expected 'text-generation' or 'chat-completions')",
                other
            )),
        }
    }
}

impl fmt::Display for InferenceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceBackend::TextGeneration => write!(f, "text-generation"),
            InferenceBackend::ChatCompletions => write!(f, "chat-completions"),
        }
    }
}

/// Settings for the hosted language-model endpoint used to label tickets
#[derive(Clone)]
pub struct InferenceConfig {
    pub backend: InferenceBackend,
    pub endpoint_url: String,
    pub api_token: String,
    /// Model name sent in the request body (chat-completions backend only)
    pub model: String,
    pub timeout: Duration,
    pub max_new_tokens: u32,
    pub temperature: f32,
}

// Keep the bearer token out of logs
impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("backend", &self.backend)
            .field("endpoint_url", &self.endpoint_url)
            .field("api_token", &"***")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            inference: InferenceConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl InferenceConfig {
    pub const DEFAULT_ENDPOINT_URL: &'static str =
        "https://api-inference.huggingface.co/models/Qwen/Qwen2.5-1.5B-Instruct";
    pub const DEFAULT_MODEL: &'static str = "Qwen/Qwen2.5-1.5B-Instruct";
    const DEFAULT_TIMEOUT_SECS: u64 = 60;
    const DEFAULT_MAX_NEW_TOKENS: u32 = 256;
    const DEFAULT_TEMPERATURE: f32 = 0.1;

    pub fn from_env() -> Result<Self, String> {
        let api_token = env::var("HUGGINGFACE_API_TOKEN")
            .map_err(|_| "HUGGINGFACE_API_TOKEN environment variable is required".to_string())?;

        let backend = env::var("INFERENCE_BACKEND")
            .unwrap_or_else(|_| "text-generation".to_string())
            .parse::<InferenceBackend>()?;

        let endpoint_url =
            env::var("INFERENCE_URL").unwrap_or_else(|_| Self::DEFAULT_ENDPOINT_URL.to_string());

        let model = env::var("INFERENCE_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        let timeout_secs = env::var("INFERENCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "INFERENCE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_new_tokens = env::var("INFERENCE_MAX_NEW_TOKENS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_NEW_TOKENS.to_string())
            .parse::<u32>()
            .map_err(|_| "INFERENCE_MAX_NEW_TOKENS must be a valid number".to_string())?;

        let temperature = env::var("INFERENCE_TEMPERATURE")
            .unwrap_or_else(|_| Self::DEFAULT_TEMPERATURE.to_string())
            .parse::<f32>()
            .map_err(|_| "INFERENCE_TEMPERATURE must be a valid number".to_string())?;

        Ok(Self {
            backend,
            endpoint_url,
            api_token,
            model,
            timeout: Duration::from_secs(timeout_secs),
            max_new_tokens,
            temperature,
        })
    }

    /// Config pointing at an arbitrary endpoint with the default generation settings
    #[cfg(test)]
    pub fn with_endpoint(
        backend: InferenceBackend,
        endpoint_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            endpoint_url: endpoint_url.into(),
            api_token: api_token.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            max_new_tokens: Self::DEFAULT_MAX_NEW_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Support Ticket AI API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "1.0.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Classifies support tickets by category and sentiment using a hosted language model"
                .to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
