// Application configuration types
//
// This module contains:
// - Command-line / environment configuration (clap)
// - Presentation tuning constants for the graph layout
// - Graph view visual settings

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Minimum UI poll interval in milliseconds
pub const MIN_REFRESH_MS: u64 = 16;

/// Maximum UI poll interval in milliseconds
pub const MAX_REFRESH_MS: u64 = 1000;

/// Tick interval for the pulse animation (100ms)
pub const TICK_INTERVAL_MS: u128 = 100;

/// Two presses on the same cell within this window count as a double-click
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// How long a status message stays in the banner
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(4);

/// Default token file name, placed in the home directory
pub const TOKEN_FILE_NAME: &str = ".networth_token";

/// Default log file name, placed in the OS temp directory
pub const LOG_FILE_NAME: &str = "networth.log";

// Layout simulation tuning. These only affect presentation.

/// Repulsion between every pair of nodes
pub const FORCE_CHARGE: f32 = 150.0;

/// Attraction along edges
pub const FORCE_SPRING: f32 = 0.05;

/// Upper bound on the force applied to a node in one step
pub const FORCE_MAX: f32 = 100.0;

pub const NODE_SPEED: f32 = 3000.0;

pub const DAMPING_FACTOR: f32 = 0.9;

pub const NODE_MASS: f32 = 10.0;

/// Simulated seconds per layout step
pub const SIMULATION_DT: f32 = 0.016;

/// Layout steps run synchronously when a graph is mounted
pub const STABILIZATION_ITERATIONS: u32 = 300;

/// Extra layout steps run one per frame after mounting, then the layout freezes
pub const LIVE_STEP_BUDGET: u32 = 120;

/// Radius of the ring category nodes start on, in world units
pub const INITIAL_RING_RADIUS: f32 = 100.0;

/// World radius of a node is its visual size times this factor
pub const NODE_RADIUS_SCALE: f64 = 0.25;

/// Minimum free space between two node outlines, in world units
pub const NODE_GAP: f64 = 4.0;

/// Passes of the overlap separation run after layout steps
pub const SEPARATION_PASSES: u32 = 50;

/// Canvas units kept free around the graph when fitting it to the view
pub const FIT_MARGIN: f64 = 8.0;

/// Duration of the fit-to-view animation in seconds
pub const FIT_ANIMATION_SECS: f64 = 0.4;

// ============================================================================
// Command line
// ============================================================================

/// Terminal dashboard for tracking profits, expenses and net worth
#[derive(Parser, Debug, Clone)]
#[command(name = "networth", version)]
#[command(about = "Terminal dashboard for tracking profits, expenses and net worth")]
pub struct Cli {
    /// Base URL of the finance API
    #[arg(long, env = "NETWORTH_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// File holding the session token (default: ~/.networth_token)
    #[arg(long, env = "NETWORTH_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Log file (default: networth.log in the temp directory)
    #[arg(long, env = "NETWORTH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// UI poll interval in milliseconds
    #[arg(long, env = "NETWORTH_REFRESH_MS", default_value_t = 50)]
    pub refresh_ms: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Cli {
    /// Resolve the token file, falling back to the temp dir without a home
    pub fn token_path(&self) -> PathBuf {
        if let Some(path) = &self.token_file {
            return path.clone();
        }
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(TOKEN_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME))
    }

    /// UI poll interval, clamped to a sane range
    pub fn ui_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Visual settings for the graph view
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Flow particles along edges (toggle with 'a' key)
    pub animations_enabled: bool,

    /// Text labels next to nodes (toggle with 't' key)
    pub labels_enabled: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            labels_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["networth"]).unwrap();
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.http_timeout(), Duration::from_secs(30));
        assert!(cli.log_path().ends_with(LOG_FILE_NAME));
        assert!(cli.token_path().ends_with(TOKEN_FILE_NAME));
    }

    #[test]
    fn test_cli_flags_override() {
        let cli = Cli::try_parse_from([
            "networth",
            "--api-url",
            "https://finance.example.com",
            "--token-file",
            "/tmp/tok",
            "--refresh-ms",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "https://finance.example.com");
        assert_eq!(cli.token_path(), PathBuf::from("/tmp/tok"));
        assert_eq!(cli.ui_interval(), Duration::from_millis(MIN_REFRESH_MS));
    }

    #[test]
    fn test_ui_interval_clamps_high() {
        let cli = Cli::try_parse_from(["networth", "--refresh-ms", "60000"]).unwrap();
        assert_eq!(cli.ui_interval(), Duration::from_millis(MAX_REFRESH_MS));
    }

    #[test]
    fn test_graph_settings_default_on() {
        let settings = GraphSettings::default();
        assert!(settings.animations_enabled);
        assert!(settings.labels_enabled);
    }
}
