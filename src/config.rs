use std::net::SocketAddr;

/// Column-role keyword mapping. Roles are resolved once per snapshot by
/// case-insensitive substring match against these keyword lists, instead of
/// re-parsing column names on every transition decision.
#[derive(Debug, Clone)]
pub struct RoleKeywords {
    pub done: Vec<String>,
    pub current_week: Vec<String>,
    pub recurring: Vec<String>,
    pub in_progress: Vec<String>,
    pub backlog: Vec<String>,
}

impl Default for RoleKeywords {
    fn default() -> Self {
        Self {
            done: vec!["concluído".to_string(), "concluido".to_string(), "done".to_string()],
            current_week: vec![
                "semana atual".to_string(),
                "esta semana".to_string(),
                "this week".to_string(),
            ],
            recurring: vec!["recorrente".to_string(), "recurring".to_string()],
            in_progress: vec![
                "em andamento".to_string(),
                "in progress".to_string(),
                "doing".to_string(),
            ],
            backlog: vec!["backlog".to_string(), "a fazer".to_string(), "to do".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoMoveConfig {
    pub enabled: bool,
    /// Column-name fragments whose columns are never drained by the
    /// weekly auto-mover.
    pub exclude_columns: Vec<String>,
}

impl Default for AutoMoveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude_columns: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub auto_move: AutoMoveConfig,
    pub roles: RoleKeywords,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:focusboard.db?mode=rwc".to_string());

        let listen_addr = std::env::var("LISTEN_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let enabled = std::env::var("AUTO_MOVE_ENABLED")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let exclude_columns = std::env::var("AUTO_MOVE_EXCLUDE")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            database_url,
            listen_addr,
            auto_move: AutoMoveConfig {
                enabled,
                exclude_columns,
            },
            roles: RoleKeywords::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            auto_move: AutoMoveConfig::default(),
            roles: RoleKeywords::default(),
        }
    }
}
