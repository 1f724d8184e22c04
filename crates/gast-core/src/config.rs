use std::sync::OnceLock;

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

fn bool_from_env(key: &str) -> bool {
    env_true(key).unwrap_or(false)
}

/// Accept trees containing syntax errors; error nodes normalize to `Other*` nodes.
pub fn lossy_mode() -> bool {
    static LOSSY: OnceLock<bool> = OnceLock::new();
    *LOSSY.get_or_init(|| bool_from_env("GAST_LOSSY"))
}

/// Attach the parser's S-expression dump to every frontend result.
pub fn snapshot_mode() -> bool {
    static SNAPSHOT: OnceLock<bool> = OnceLock::new();
    *SNAPSHOT.get_or_init(|| bool_from_env("GAST_SNAPSHOT"))
}

/// Per-call normalization settings. Defaults come from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeConfig {
    pub lossy: bool,
    pub snapshot: bool,
}

impl NormalizeConfig {
    pub fn from_env() -> Self {
        Self {
            lossy: lossy_mode(),
            snapshot: snapshot_mode(),
        }
    }

    pub fn strict() -> Self {
        Self {
            lossy: false,
            snapshot: false,
        }
    }

    pub fn with_lossy(mut self, lossy: bool) -> Self {
        self.lossy = lossy;
        self
    }

    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
