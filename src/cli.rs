use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

use crate::command;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "spritemux", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ./.spritemux.yaml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CSS that shows one frame of a sprite sheet
    Style(command::style::StyleArgs),

    /// Render a scene manifest to a standalone HTML page
    Render {
        /// Scene manifest (.yaml, .yml or .json)
        scene: PathBuf,

        /// Write the page here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Sample every animation this many milliseconds after mount
        #[arg(long, value_name = "MS", default_value_t = 0)]
        at_ms: u64,

        /// Embed local sprite files as data URIs
        #[arg(long)]
        inline_sprites: bool,
    },

    /// Show how each entity of a scene resolves
    #[command(visible_alias = "ls")]
    List {
        scene: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Live terminal preview of a scene's animations
    Preview { scene: PathBuf },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "spritemux", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Style(args) => command::style::run(&args, &config),
        Commands::Render {
            scene,
            output,
            at_ms,
            inline_sprites,
        } => command::render::run(&scene, output.as_deref(), at_ms, inline_sprites, &config),
        Commands::List { scene, json } => command::list::run(&scene, json, &config),
        Commands::Preview { scene } => command::preview::run(&scene, &config),
        Commands::Completions { .. } => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "spritemux",
            "render",
            "town.yaml",
            "-o",
            "town.html",
            "--at-ms",
            "250",
            "--inline-sprites",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                scene,
                output,
                at_ms,
                inline_sprites,
            } => {
                assert_eq!(scene, PathBuf::from("town.yaml"));
                assert_eq!(output, Some(PathBuf::from("town.html")));
                assert_eq!(at_ms, 250);
                assert!(inline_sprites);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_style_rejects_mixed_modes() {
        assert!(
            Cli::try_parse_from(["spritemux", "style", "--cols", "3", "--frame-width", "32"])
                .is_err()
        );
    }
}
