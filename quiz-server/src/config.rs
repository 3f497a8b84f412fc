use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared secret entered once per session to unlock host controls.
    pub admin_pin: String,
    pub session_idle_minutes: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            admin_pin: env::var("ADMIN_PIN").unwrap_or_else(|_| "hradmin".to_string()),
            session_idle_minutes: env::var("SESSION_IDLE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid SESSION_IDLE_MINUTES"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
