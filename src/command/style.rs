use anyhow::{Context, Result};
use clap::Args;
use console::style;

use crate::config::Config;
use crate::sheet::{
    FrameAddress, GridSheet, SheetGeometry, SheetLook, format_percent, sheet_style,
};
use crate::status::AnimationState;

#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Image locator written into `background-image`
    #[arg(long, default_value = "sprite.png")]
    pub src: String,

    /// Frame width in pixels (pixel mode)
    #[arg(long, conflicts_with_all = ["cols", "rows"])]
    pub frame_width: Option<u32>,

    /// Frame height in pixels (pixel mode)
    #[arg(long, conflicts_with_all = ["cols", "rows"])]
    pub frame_height: Option<u32>,

    /// Frames per row (pixel mode)
    #[arg(long, conflicts_with_all = ["cols", "rows"])]
    pub frame_count: Option<usize>,

    /// Grid columns (grid mode)
    #[arg(long)]
    pub cols: Option<usize>,

    /// Grid rows (grid mode)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Frame index within the row
    #[arg(long, default_value_t = 0)]
    pub frame: usize,

    /// Sheet row; defaults to the row the status maps to
    #[arg(long)]
    pub row: Option<usize>,

    /// Activity state used to pick the row (IDLE, WORKING, MERGING, ...)
    #[arg(long)]
    pub status: Option<String>,

    /// Scale factor (pixel mode)
    #[arg(long)]
    pub scale: Option<f64>,
}

/// Resolve the sheet, row and look the arguments describe.
fn resolve(args: &StyleArgs, config: &Config) -> Result<(SheetGeometry, usize, SheetLook)> {
    let grid_mode = args.cols.is_some() || args.rows.is_some();

    let (geometry, look): (SheetGeometry, SheetLook) = if grid_mode {
        let sheet = GridSheet::new(args.cols.unwrap_or(1), args.rows.unwrap_or(1))
            .context("Invalid grid sheet")?;
        (sheet.into(), config.zone.look())
    } else {
        let sheet = config
            .sprite
            .sheet_with(args.frame_width, args.frame_height, args.frame_count)
            .context("Invalid pixel sheet")?;
        (sheet.into(), config.sprite.look_with(args.scale))
    };

    let row = args.row.unwrap_or_else(|| {
        args.status
            .as_deref()
            .map(|s| {
                config
                    .rows
                    .resolve(&AnimationState::parse(s), config.sprite.fps())
                    .row
            })
            .unwrap_or(0)
    });

    Ok((geometry, row, look))
}

#[cfg(test)]
fn build_style(args: &StyleArgs, config: &Config) -> Result<crate::sheet::Style> {
    let (geometry, row, look) = resolve(args, config)?;
    Ok(sheet_style(&geometry, args.frame, row, &args.src, &look))
}

pub fn run(args: &StyleArgs, config: &Config) -> Result<()> {
    let (geometry, row, look) = resolve(args, config)?;

    let summary = match geometry.address(args.frame, row) {
        FrameAddress::Pixel(offset) => format!("offset {}px {}px", offset.x, offset.y),
        FrameAddress::Grid(pos) => format!(
            "position {} {}",
            format_percent(pos.pos_x),
            format_percent(pos.pos_y)
        ),
    };
    eprintln!(
        "{}",
        style(format!("/* {} mode, frame {}, {} */", geometry.mode_label(), args.frame, summary)).dim()
    );

    for (property, value) in sheet_style(&geometry, args.frame, row, &args.src, &look).iter() {
        println!("{}: {};", property, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_style_from_args() {
        let args = StyleArgs {
            src: "a.png".to_string(),
            frame_width: Some(32),
            frame_height: Some(48),
            frame: 2,
            row: Some(1),
            ..Default::default()
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(style.get("background-position"), Some("-64px -48px"));
        assert_eq!(style.get("transform"), Some("scale(2)"));
    }

    #[test]
    fn test_out_of_range_frame_clamps_to_last() {
        let args = StyleArgs {
            src: "a.png".to_string(),
            frame: 7,
            ..Default::default()
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(style.get("background-position"), Some("-96px 0px"));

        let args = StyleArgs {
            frame: 1 << 60,
            ..args
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(style.get("background-position"), Some("-96px 0px"));
    }

    #[test]
    fn test_huge_row_does_not_overflow() {
        let args = StyleArgs {
            src: "a.png".to_string(),
            row: Some(1 << 60),
            ..Default::default()
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(
            style.get("background-position"),
            Some(format!("0px {}px", -i64::MAX).as_str())
        );
    }

    #[test]
    fn test_invalid_scale_arg_uses_config_scale() {
        let args = StyleArgs {
            src: "a.png".to_string(),
            scale: Some(-2.0),
            ..Default::default()
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(style.get("transform"), Some("scale(2)"));
    }

    #[test]
    fn test_grid_style_from_args() {
        let args = StyleArgs {
            src: "z.png".to_string(),
            cols: Some(3),
            rows: Some(4),
            frame: 1,
            row: Some(2),
            ..Default::default()
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(style.get("background-size"), Some("300% 400%"));
        assert_eq!(style.get("background-position"), Some("50% 66.6667%"));
    }

    #[test]
    fn test_status_picks_row() {
        let args = StyleArgs {
            src: "a.png".to_string(),
            frame_height: Some(48),
            status: Some("working".to_string()),
            ..Default::default()
        };
        let style = build_style(&args, &Config::default()).unwrap();
        assert_eq!(style.get("background-position"), Some("0px -48px"));
    }

    #[test]
    fn test_invalid_sheet_is_reported() {
        let args = StyleArgs {
            cols: Some(0),
            ..Default::default()
        };
        let err = build_style(&args, &Config::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("at least one column"));
    }
}
