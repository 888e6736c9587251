use crate::viewport::ZoomLimits;
use clap::{CommandFactory, Parser};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "family-tree", version, about = "Family tree TUI")]
pub struct CliArgs {
    /// Print the tree outline and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the API base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the tree to load
    #[arg(long = "tree-id", value_name = "ID")]
    pub tree_id: Option<String>,

    /// Override the log file used in TUI mode
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Smallest zoom factor
    #[arg(long = "min-zoom", default_value_t = 0.3)]
    pub min_zoom: f64,

    /// Largest zoom factor
    #[arg(long = "max-zoom", default_value_t = 2.0)]
    pub max_zoom: f64,

    /// Zoom change per wheel event or key press
    #[arg(long = "zoom-step", default_value_t = 0.1)]
    pub zoom_step: f64,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.base_url {
            std::env::set_var("FAMILY_API_BASE_URL", url);
        }
        if let Some(id) = &self.tree_id {
            std::env::set_var("FAMILY_TREE_ID", id);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("FAMILY_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub const fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.min_zoom,
            max: self.max_zoom,
            step: self.zoom_step,
        }
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
