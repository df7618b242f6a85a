//! Demo configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Directory the rendered SVG files are written to
    pub out_dir: PathBuf,

    /// Square size in viewBox units
    pub square_size: f64,

    /// Nominal duration of one move
    pub move_duration: Duration,

    /// Board size of the n-queens demo
    pub queens: usize,
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self {
            out_dir: env::var("BOARD_DEMO_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("board-demo-out")),
            square_size: env::var("BOARD_DEMO_SQUARE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &f64| *size > 0.0)
                .unwrap_or(40.0),
            move_duration: env::var("BOARD_DEMO_MOVE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(300)),
            queens: env::var("BOARD_DEMO_QUEENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n >= 4)
                .unwrap_or(8),
        }
    }

    /// Path of an output file.
    pub fn out_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.svg"))
    }
}
