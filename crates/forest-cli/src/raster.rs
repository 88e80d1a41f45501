//! Image decoding and endpoint handling for the planner front end.

use anyhow::{bail, Context, Result};
use forest_core::Coordinate;
use std::path::Path;

/// Decode an image file into rows of 8-bit luma values.
pub fn load_raster(path: &Path) -> Result<Vec<Vec<u8>>> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .to_luma8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        bail!("image {} has no pixels", path.display());
    }
    tracing::debug!(width, height, "decoded raster");
    Ok(luma_rows(image.as_raw(), width as usize))
}

/// Split a row-major luma buffer into rows.
pub fn luma_rows(pixels: &[u8], width: usize) -> Vec<Vec<u8>> {
    pixels.chunks(width.max(1)).map(<[u8]>::to_vec).collect()
}

/// Parse `ROW,COL`.
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{value}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row in '{value}'"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("invalid column in '{value}'"))?;
    Ok(Coordinate::new(row, col))
}

/// Pull a coordinate into `[0, rows) x [0, cols)`.
pub fn clamp_coordinate(coord: Coordinate, rows: usize, cols: usize) -> Coordinate {
    Coordinate::new(
        coord.row.min(rows.saturating_sub(1)),
        coord.col.min(cols.saturating_sub(1)),
    )
}

/// Resolve optional endpoints; defaults are the top-left and bottom-right
/// pixels.
pub fn resolve_endpoints(
    start: Option<Coordinate>,
    target: Option<Coordinate>,
    rows: usize,
    cols: usize,
) -> (Coordinate, Coordinate) {
    let start = start.unwrap_or(Coordinate::new(0, 0));
    let target = target.unwrap_or(Coordinate::new(
        rows.saturating_sub(1),
        cols.saturating_sub(1),
    ));
    (
        clamp_coordinate(start, rows, cols),
        clamp_coordinate(target, rows, cols),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("3,4"), Ok(Coordinate::new(3, 4)));
        assert_eq!(parse_coordinate(" 10 , 0 "), Ok(Coordinate::new(10, 0)));
        assert!(parse_coordinate("3").is_err());
        assert!(parse_coordinate("-1,2").is_err());
    }

    #[test]
    fn test_endpoints_default_and_clamp() {
        let (start, target) = resolve_endpoints(None, None, 40, 60);
        assert_eq!(start, Coordinate::new(0, 0));
        assert_eq!(target, Coordinate::new(39, 59));

        let (start, target) = resolve_endpoints(
            Some(Coordinate::new(100, 5)),
            Some(Coordinate::new(2, 900)),
            40,
            60,
        );
        assert_eq!(start, Coordinate::new(39, 5));
        assert_eq!(target, Coordinate::new(2, 59));
    }

    #[test]
    fn test_luma_rows() {
        let rows = luma_rows(&[1, 2, 3, 4, 5, 6], 3);
        assert_eq!(rows, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_load_raster_round_trips_png() {
        let dir = std::env::temp_dir().join(format!("forest-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("terrain.png");
        let image = image::GrayImage::from_raw(3, 2, vec![0, 50, 100, 150, 200, 250]).unwrap();
        image.save(&path).unwrap();

        let raster = load_raster(&path).unwrap();
        assert_eq!(raster, vec![vec![0, 50, 100], vec![150, 200, 250]]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_raster_reports_missing_file() {
        let err = load_raster(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("failed to decode image"));
    }
}
