use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Window title.
pub const WINDOW_TITLE: &str = "spritewalk";
/// Initial inner size of the window (physical pixels).
pub const WINDOW_SIZE: (u32, u32) = (800, 800);
/// Initial top-left position of the window.
pub const WINDOW_POS: (i32, i32) = (100, 100);

/// Which demo runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Arrow keys walk, space/shift attack; counters advance on key-down.
    Keyboard,
    /// Sprite and glow layers advance every frame and are composited.
    Auto,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Keyboard => "Keyboard",
            Variant::Auto => "Auto",
        }
    }
}

/// Start-up switches.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Textured-quad sprite animation demo")]
pub struct Args {
    /// Which demo to run
    #[arg(long, value_enum, default_value_t = Variant::Keyboard)]
    pub variant: Variant,

    /// Directory the sprite images are loaded from
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Show the debug overlay at start-up (toggle with F12)
    #[arg(long)]
    pub debug_overlay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_keyboard_in_working_dir() {
        let args = Args::try_parse_from(["spritewalk"]).unwrap();
        assert_eq!(args.variant, Variant::Keyboard);
        assert_eq!(args.assets, PathBuf::from("."));
        assert!(!args.debug_overlay);
    }

    #[test]
    fn parses_auto_variant() {
        let args = Args::try_parse_from([
            "spritewalk",
            "--variant",
            "auto",
            "--assets",
            "sprites",
            "--debug-overlay",
        ])
        .unwrap();
        assert_eq!(args.variant, Variant::Auto);
        assert_eq!(args.assets, PathBuf::from("sprites"));
        assert!(args.debug_overlay);
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!(Args::try_parse_from(["spritewalk", "--variant", "mouse"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
