use moon::*;
use shared::{DashboardConfig, DataCatalog, DownMsg, UpMsg};
use std::fs;
use std::path::{Path, PathBuf};

// ===== CENTRALIZED DEBUG FLAGS =====
const DEBUG_BACKEND: bool = false; // Request/response debugging
const DEBUG_CONFIG: bool = true; // Dashboard config loading

// Debug macro for easy toggling
macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            println!($($arg)*);
        }
    };
}

const CONFIG_FILE_PATH: &str = "dashboard.toml";
const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

async fn frontend() -> Frontend {
    Frontend::new()
        .title("Performance Analytics")
        .index_by_robots(false)
}

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);

    debug_log!(DEBUG_BACKEND, "🔍 BACKEND: Received {:?}", req.up_msg);

    match req.up_msg {
        UpMsg::LoadDashboardConfig => {
            let msg = match load_dashboard_config(&config_path()) {
                Ok(config) => DownMsg::DashboardConfigLoaded(config),
                Err(error) => {
                    debug_log!(DEBUG_CONFIG, "⚠️ CONFIG: {}", error);
                    DownMsg::ConfigError(error)
                }
            };
            send_down_msg(msg, session_id, cor_id).await;
        }
    }
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        debug_log!(DEBUG_BACKEND, "🔍 BACKEND: Session {:?} is gone, dropping reply", session_id);
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_PATH))
}

/// Reads and validates the dashboard config.
///
/// A missing file falls back to the bundled sample, which is written to
/// `path` so it can be edited. Unreadable or invalid files are errors.
fn load_dashboard_config(path: &Path) -> Result<DashboardConfig, String> {
    let config = match fs::read_to_string(path) {
        Ok(content) => DashboardConfig::from_toml_str(&content)
            .map_err(|error| format!("{}: {error}", path.display()))?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug_log!(DEBUG_CONFIG, "🔧 CONFIG: '{}' not found, using bundled sample", path.display());
            let sample = DashboardConfig::sample().map_err(|error| error.to_string())?;
            if let Err(error) = save_dashboard_config(path, &sample) {
                debug_log!(DEBUG_CONFIG, "⚠️ CONFIG: Could not write '{}': {}", path.display(), error);
            }
            sample
        }
        Err(error) => return Err(format!("Failed to read {}: {error}", path.display())),
    };

    // Structural problems are reported now rather than on the first render.
    DataCatalog::from_config(config.clone())
        .map_err(|error| format!("{}: {error}", path.display()))?;

    debug_log!(
        DEBUG_CONFIG,
        "🔧 CONFIG: Loaded '{}' ({} chart periods, {} table rows)",
        path.display(),
        config.chart.periods.len(),
        config.table.rows.len()
    );
    Ok(config)
}

fn save_dashboard_config(path: &Path, config: &DashboardConfig) -> Result<(), String> {
    let content = config.to_toml_string().map_err(|error| error.to_string())?;
    fs::write(path, content).map_err(|error| error.to_string())
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    // Set panic hook to log all panics
    std::panic::set_hook(Box::new(|panic_info| {
        println!("BACKEND PANIC: {:?}", panic_info);
    }));

    debug_log!(DEBUG_CONFIG, "🔧 CONFIG: Serving dashboard config from '{}'", config_path().display());

    start(frontend, up_msg_handler, |_error| {}).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dashboard-backend-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_falls_back_to_sample_and_writes_it() {
        let dir = scratch_dir("missing");
        let path = dir.join("dashboard.toml");

        let config = load_dashboard_config(&path).unwrap();
        assert_eq!(config, DashboardConfig::sample().unwrap());
        assert!(path.exists());

        let reloaded = load_dashboard_config(&path).unwrap();
        assert_eq!(reloaded, config);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = scratch_dir("invalid");
        let path = dir.join("dashboard.toml");
        fs::write(&path, "[chart\nperiods = 1").unwrap();

        let error = load_dashboard_config(&path).unwrap_err();
        assert!(error.contains("dashboard.toml"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn structurally_invalid_config_is_rejected() {
        let dir = scratch_dir("structure");
        let path = dir.join("dashboard.toml");
        let mut config = DashboardConfig::sample().unwrap();
        config.chart.periods.push("2021".to_string());
        save_dashboard_config(&path, &config).unwrap();

        let error = load_dashboard_config(&path).unwrap_err();
        assert!(error.contains("2021"));
        fs::remove_dir_all(dir).unwrap();
    }
}
