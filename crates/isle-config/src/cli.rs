//! Command-line argument parsing for the island generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Island generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "isle-gen", about = "Procedural island generator")]
pub struct CliArgs {
    /// Field width in cells.
    #[arg(long)]
    pub width: Option<i32>,

    /// Field height in cells.
    #[arg(long)]
    pub height: Option<i32>,

    /// Island seed string. Implies a fixed seed.
    #[arg(long)]
    pub seed: Option<String>,

    /// Draw a fresh random seed.
    #[arg(long)]
    pub random_seed: Option<bool>,

    /// Noise scale in (0, 1].
    #[arg(long)]
    pub scale: Option<f64>,

    /// Water padding thickness in cells (0 disables falloff and fading).
    #[arg(long)]
    pub water_border: Option<u32>,

    /// Enable the fade-smoothing pass.
    #[arg(long)]
    pub fade_out: Option<bool>,

    /// Work points per progressive step (0 runs in one step).
    #[arg(long)]
    pub points_per_step: Option<u64>,

    /// PNG output path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let generator = &mut self.generator;
        if let Some(w) = args.width {
            generator.width = w;
        }
        if let Some(h) = args.height {
            generator.height = h;
        }
        if let Some(ref seed) = args.seed {
            generator.seed = seed.clone();
            generator.random_seed = false;
        }
        if let Some(random) = args.random_seed {
            generator.random_seed = random;
        }
        if let Some(scale) = args.scale {
            generator.scale = scale;
        }
        if let Some(border) = args.water_border {
            generator.water_border = border;
        }
        if let Some(fade) = args.fade_out {
            generator.fade_out = fade;
        }
        if let Some(points) = args.points_per_step {
            generator.points_per_step = points;
        }
        if let Some(ref path) = args.output {
            self.output.image_path = path.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(256),
            seed: Some("Ebanu".to_string()),
            output: Some(PathBuf::from("/tmp/out.png")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generator.width, 256);
        assert_eq!(config.generator.seed, "Ebanu");
        assert_eq!(config.output.image_path, PathBuf::from("/tmp/out.png"));
        // Non-overridden fields retain defaults
        assert_eq!(config.generator.height, 100);
        assert_eq!(config.generator.water_border, 4);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_explicit_seed_disables_random_seed() {
        let mut config = Config::default();
        config.generator.random_seed = true;
        let args = CliArgs {
            seed: Some("Omira".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert!(!config.generator.random_seed);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "isle-gen",
            "--width",
            "40",
            "--fade-out",
            "false",
            "--points-per-step",
            "0",
            "-o",
            "map.png",
        ])
        .unwrap();
        assert_eq!(args.width, Some(40));
        assert_eq!(args.fade_out, Some(false));
        assert_eq!(args.points_per_step, Some(0));
        assert_eq!(args.output, Some(PathBuf::from("map.png")));
        assert!(args.seed.is_none());
    }
}
