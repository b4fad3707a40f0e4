//! Writers for point sequences and tiles.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use indra_core::{GeneralizedCircle, LimitCurve, Point, Tile, export_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `re,im` per line, `inf,inf` for the point at infinity
    Csv,
    /// `{version, closed, points}` document
    Json,
}

fn csv_point(p: Point) -> String {
    match p.finite() {
        Some(z) => format!("{},{}", z.re, z.im),
        None => "inf,inf".to_string(),
    }
}

pub fn write_curve(out: &mut impl Write, curve: &LimitCurve, format: Format) -> Result<()> {
    match format {
        Format::Csv => {
            writeln!(out, "re,im")?;
            for p in &curve.points {
                writeln!(out, "{}", csv_point(*p))?;
            }
        }
        Format::Json => {
            writeln!(out, "{}", export_json(curve)?)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// One row per tile; lines report direction and offset instead of a centre.
pub fn write_tile(out: &mut impl Write, tile: &Tile) -> Result<()> {
    match &tile.disk {
        GeneralizedCircle::Circle(c) => writeln!(
            out,
            "{},{},circle,{},{},{}",
            tile.word,
            tile.level,
            c.center().re,
            c.center().im,
            c.radius()
        )?,
        GeneralizedCircle::Line(l) => writeln!(
            out,
            "{},{},line,{},{},inf",
            tile.word,
            tile.level,
            l.direction(),
            l.offset()
        )?,
    }
    Ok(())
}

pub const TILE_HEADER: &str = "word,level,kind,x,y,radius";
