//! Closed-form material estimates for walls, paint and roofs.
//!
//! Rates are South African rules of thumb for the standard imperial brick
//! (222 x 106 x 73 mm) and include typical wastage.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const SINGLE_SKIN_BRICKS_PER_SQM: f64 = 55.0;
const DOUBLE_SKIN_BRICKS_PER_SQM: f64 = 110.0;
const MAXI_BRICKS_PER_SQM: f64 = 35.0;
/// 1000 bricks take roughly 3 bags of cement and 0.6 m3 of sand.
const CEMENT_BAGS_PER_1000_BRICKS: f64 = 3.0;
const SAND_M3_PER_1000_BRICKS: f64 = 0.6;
const PAINT_SPREAD_SQM_PER_LITER: f64 = 9.0;
const DEFAULT_PAINT_COATS: u32 = 2;
const ROOF_TILES_PER_SQM: f64 = 11.5;
const UNDERLAY_SQM_PER_ROLL: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcType {
    Bricks,
    Paint,
    Roof,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickEstimate {
    pub bricks_count: u64,
    pub cement_bags_50kg: u64,
    pub building_sand_m3: f64,
    pub brick_type_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintEstimate {
    pub liters_needed: f64,
    pub buckets_20l: u64,
    pub buckets_5l: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoofEstimate {
    pub tiles_count: u64,
    pub underlay_rolls: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Estimate {
    Bricks(BrickEstimate),
    Paint(PaintEstimate),
    Roof(RoofEstimate),
}

/// Runs the calculation selected by `calc_type`.
///
/// `variable` is the brick type for bricks and the coat count for paint;
/// roofs ignore it.
pub fn estimate(calc_type: CalcType, area: f64, variable: &str) -> Result<Estimate> {
    if !area.is_finite() || area <= 0.0 {
        return Err(AppError::Validation(format!("area must be greater than zero, got {}", area)));
    }

    let estimate = match calc_type {
        CalcType::Bricks => Estimate::Bricks(bricks_needed(area, variable)),
        CalcType::Paint => Estimate::Paint(paint_liters(area, parse_coats(variable)?)),
        CalcType::Roof => Estimate::Roof(roof_tiles(area)),
    };
    Ok(estimate)
}

pub fn bricks_needed(wall_area_sqm: f64, brick_type: &str) -> BrickEstimate {
    let rate = match brick_type.to_lowercase().as_str() {
        "standard_single" => SINGLE_SKIN_BRICKS_PER_SQM,
        "standard_double" => DOUBLE_SKIN_BRICKS_PER_SQM,
        "maxi" => MAXI_BRICKS_PER_SQM,
        _ => SINGLE_SKIN_BRICKS_PER_SQM,
    };
    let bricks = (wall_area_sqm * rate).ceil();
    let thousands = bricks / 1000.0;

    BrickEstimate {
        bricks_count: bricks as u64,
        cement_bags_50kg: (thousands * CEMENT_BAGS_PER_1000_BRICKS).ceil() as u64,
        building_sand_m3: round_to(thousands * SAND_M3_PER_1000_BRICKS, 2),
        brick_type_used: brick_type.to_string(),
    }
}

pub fn paint_liters(wall_area_sqm: f64, coats: u32) -> PaintEstimate {
    let liters = wall_area_sqm * f64::from(coats) / PAINT_SPREAD_SQM_PER_LITER;

    PaintEstimate {
        liters_needed: round_to(liters, 1),
        buckets_20l: (liters / 20.0).ceil() as u64,
        buckets_5l: if liters < 20.0 { (liters / 5.0).ceil() as u64 } else { 0 },
    }
}

pub fn roof_tiles(roof_area_sqm: f64) -> RoofEstimate {
    RoofEstimate {
        tiles_count: (roof_area_sqm * ROOF_TILES_PER_SQM).ceil() as u64,
        underlay_rolls: (roof_area_sqm / UNDERLAY_SQM_PER_ROLL).ceil() as u64,
    }
}

// Anything that isn't an integer (e.g. the "standard" default) means two coats.
fn parse_coats(variable: &str) -> Result<u32> {
    match variable.trim().parse::<i64>() {
        Ok(coats) if coats >= 1 => u32::try_from(coats)
            .map_err(|_| AppError::Validation(format!("too many coats: {}", coats))),
        Ok(coats) => Err(AppError::Validation(format!("coats must be at least 1, got {}", coats))),
        Err(_) => Ok(DEFAULT_PAINT_COATS),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_skin_wall() {
        let est = bricks_needed(10.0, "standard");
        assert_eq!(est.bricks_count, 550);
        assert_eq!(est.cement_bags_50kg, 2);
        assert_eq!(est.building_sand_m3, 0.33);
        assert_eq!(est.brick_type_used, "standard");
    }

    #[test]
    fn brick_type_lookup_is_case_insensitive() {
        let est = bricks_needed(10.0, "Standard_Double");
        assert_eq!(est.bricks_count, 1100);
        assert_eq!(est.cement_bags_50kg, 4);
        assert_eq!(est.building_sand_m3, 0.66);
        assert_eq!(est.brick_type_used, "Standard_Double");

        assert_eq!(bricks_needed(10.0, "maxi").bricks_count, 350);
    }

    #[test]
    fn fractional_bricks_round_up() {
        assert_eq!(bricks_needed(1.01, "standard_single").bricks_count, 56);
    }

    #[test]
    fn paint_defaults_to_two_coats() {
        let est = estimate(CalcType::Paint, 45.0, "standard").unwrap();
        assert_eq!(
            est,
            Estimate::Paint(PaintEstimate {
                liters_needed: 10.0,
                buckets_20l: 1,
                buckets_5l: 2,
            })
        );
    }

    #[test]
    fn large_paint_job_skips_small_buckets() {
        let est = paint_liters(100.0, 3);
        assert_eq!(est.liters_needed, 33.3);
        assert_eq!(est.buckets_20l, 2);
        assert_eq!(est.buckets_5l, 0);
    }

    #[test]
    fn zero_coats_is_rejected() {
        let err = estimate(CalcType::Paint, 10.0, "0").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn roof_tiles_and_underlay() {
        let est = roof_tiles(31.0);
        assert_eq!(est.tiles_count, 357);
        assert_eq!(est.underlay_rolls, 2);
    }

    #[test]
    fn non_positive_area_is_rejected() {
        for area in [0.0, -5.0, f64::NAN] {
            assert!(estimate(CalcType::Roof, area, "standard").is_err());
        }
    }

    #[test]
    fn estimates_serialize_without_variant_tag() {
        let json = serde_json::to_value(estimate(CalcType::Roof, 30.0, "").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "tiles_count": 345, "underlay_rolls": 1 }));
    }
}
