pub mod openai {
    pub const DEFAULT_MODEL: &str = "gpt-5";
    pub const API_BASE: &str = "https://api.openai.com/v1";
    pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
    pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
}

pub mod gemini {
    pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";
    pub const API_KEY_HEADER: &str = "x-goog-api-key";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
}
