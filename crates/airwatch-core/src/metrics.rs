//! Metrics and quality assessment for sensor data
//!
//! Maps raw ENS160 outputs and compensation inputs onto the coarse bands a
//! status screen shows: the AQI-UBA class, an eCO2 level, the heat-index
//! risk derived from temperature and humidity, and the comfort scales and
//! summary status built on top of them.

use serde::{Deserialize, Serialize};

/// Air quality class reported by the ENS160 (AQI-UBA)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQuality {
    Excellent,
    Good,
    Moderate,
    Poor,
    Unhealthy,
    /// Outside 1-5, usually before the first measurement
    Unknown,
}

impl AirQuality {
    /// Classify an AQI-UBA index (1 = excellent, 5 = unhealthy)
    pub const fn from_index(aqi: u8) -> Self {
        match aqi {
            1 => Self::Excellent,
            2 => Self::Good,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::Unhealthy,
            _ => Self::Unknown,
        }
    }

    /// Get the display label for this class
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::Unhealthy => "Unhealthy",
            Self::Unknown => "Unknown",
        }
    }
}

/// Comfort band for an equivalent CO2 concentration
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Co2Level {
    /// Below outdoor baseline; the sensor has not produced data yet
    NoData,
    Excellent,
    Good,
    Fair,
    Poor,
    Bad,
}

impl Co2Level {
    /// Assess an eCO2 concentration in ppm
    ///
    /// Thresholds (ppm):
    /// - below 400: no data (the ENS160 floor is 400)
    /// - 400-599: excellent, 600-799: good, 800-999: fair
    /// - 1000-1499: poor, 1500 and up: bad
    pub const fn assess(ppm: u16) -> Self {
        match ppm {
            0..400 => Self::NoData,
            400..600 => Self::Excellent,
            600..800 => Self::Good,
            800..1000 => Self::Fair,
            1000..1500 => Self::Poor,
            _ => Self::Bad,
        }
    }

    /// Get the display label for this level
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Bad => "Bad",
        }
    }
}

/// Heat stress band for a heat index in °C
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatRisk {
    NoHeat,
    Caution,
    ExtremeCaution,
    Danger,
    ExtremeDanger,
}

impl HeatRisk {
    /// Assess a heat index in °C
    pub fn assess(heat_index_c: f32) -> Self {
        if heat_index_c < 27.0 {
            Self::NoHeat
        } else if heat_index_c < 32.0 {
            Self::Caution
        } else if heat_index_c < 41.0 {
            Self::ExtremeCaution
        } else if heat_index_c < 54.0 {
            Self::Danger
        } else {
            Self::ExtremeDanger
        }
    }

    /// Get the display label for this band
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoHeat => "No heat stress",
            Self::Caution => "Caution",
            Self::ExtremeCaution => "Extreme caution",
            Self::Danger => "Danger",
            Self::ExtremeDanger => "Extreme danger",
        }
    }
}

// Rothfusz regression coefficients for °C and %RH
const HI_C1: f32 = -8.784_694_755_56;
const HI_C2: f32 = 1.611_394_11;
const HI_C3: f32 = 2.338_548_838_89;
const HI_C4: f32 = -0.146_116_05;
const HI_C5: f32 = -0.012_308_094;
const HI_C6: f32 = -0.016_424_827_777_8;
const HI_C7: f32 = 0.002_211_732;
const HI_C8: f32 = 0.000_725_46;
const HI_C9: f32 = -0.000_003_582;

/// Below this temperature the heat index equals the air temperature
pub const HEAT_INDEX_THRESHOLD_C: f32 = 27.0;

/// Apparent temperature in °C from air temperature and relative humidity
pub fn heat_index(temperature_c: f32, humidity_pct: f32) -> f32 {
    if temperature_c < HEAT_INDEX_THRESHOLD_C {
        return temperature_c;
    }

    let t = temperature_c;
    let r = humidity_pct;
    let t2 = t * t;
    let r2 = r * r;

    HI_C1
        + HI_C2 * t
        + HI_C3 * r
        + HI_C4 * t * r
        + HI_C5 * t2
        + HI_C6 * r2
        + HI_C7 * t2 * r
        + HI_C8 * t * r2
        + HI_C9 * t2 * r2
}

/// Thermal comfort index from -2 (cool to cold) to 4 (extreme danger)
///
/// From 27 °C upwards the heat index replaces the air temperature, so the
/// hot end follows the [`HeatRisk`] bands.
pub fn comfort_index(temperature_c: f32, humidity_pct: f32) -> i8 {
    comfort_band(heat_index(temperature_c, humidity_pct))
}

fn comfort_band(apparent: f32) -> i8 {
    if apparent >= 54.0 {
        4
    } else if apparent >= 41.0 {
        3
    } else if apparent >= 32.0 {
        2
    } else if apparent >= 27.0 {
        1
    } else if apparent >= 20.0 {
        0
    } else if apparent >= 16.0 {
        -1
    } else {
        -2
    }
}

/// Comfort of the air temperature alone, from -3 (cold) to 3 (hot)
///
/// 22-24 °C is neutral. NaN is treated as neutral.
pub fn temperature_comfort_index(temperature_c: f32) -> i8 {
    let t = temperature_c;
    if (22.0..=24.0).contains(&t) {
        0
    } else if (20.0..22.0).contains(&t) {
        -1
    } else if (24.0..=26.0).contains(&t) {
        1
    } else if (18.0..20.0).contains(&t) {
        -2
    } else if (26.0..=28.0).contains(&t) {
        2
    } else if t < 18.0 {
        -3
    } else if t > 28.0 {
        3
    } else {
        0
    }
}

/// Comfort of the relative humidity, from -2 (very dry) to 4 (mould risk)
pub fn humidity_comfort_index(humidity_pct: f32) -> i8 {
    let rh = humidity_pct;
    if rh > 80.0 {
        4
    } else if rh > 70.0 {
        3
    } else if rh > 60.0 {
        2
    } else if rh > 50.0 {
        1
    } else if rh > 40.0 {
        0
    } else if rh > 30.0 {
        -1
    } else {
        -2
    }
}

/// One-line summary of the room, most urgent condition first
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComfortStatus {
    /// AQI of 3 or worse while eCO2 is still below 1000 ppm
    PoorAir,
    HighCo2,
    DangerHeat,
    ExtremeHeat,
    VeryHot,
    Heat,
    HighHumidity,
    Dry,
    Cold,
    Comfort,
    Normal,
}

impl ComfortStatus {
    /// Assess the current conditions
    ///
    /// Air quality outranks heat, heat outranks humidity, and humidity
    /// outranks temperature. `Comfort` needs eCO2 below 800 ppm, AQI of 2 or
    /// better, 18-25 °C and 35-60 %RH; anything else unremarkable is
    /// `Normal`.
    pub fn assess(
        eco2_ppm: u16,
        aqi: u8,
        heat_index_c: f32,
        humidity_pct: f32,
        temperature_c: f32,
    ) -> Self {
        if eco2_ppm < 1000 && aqi >= 3 {
            Self::PoorAir
        } else if eco2_ppm >= 1000 {
            Self::HighCo2
        } else if heat_index_c >= 54.0 {
            Self::DangerHeat
        } else if heat_index_c >= 41.0 {
            Self::ExtremeHeat
        } else if heat_index_c >= 32.0 {
            Self::VeryHot
        } else if heat_index_c >= 27.0 {
            Self::Heat
        } else if humidity_pct > 65.0 {
            Self::HighHumidity
        } else if humidity_pct < 35.0 {
            Self::Dry
        } else if temperature_c < 18.0 {
            Self::Cold
        } else if eco2_ppm < 800
            && aqi <= 2
            && (18.0..=25.0).contains(&temperature_c)
            && (35.0..=60.0).contains(&humidity_pct)
        {
            Self::Comfort
        } else {
            Self::Normal
        }
    }

    /// Get the display label for this status
    pub const fn label(self) -> &'static str {
        match self {
            Self::PoorAir => "Poor Air",
            Self::HighCo2 => "High CO2",
            Self::DangerHeat => "Danger heat",
            Self::ExtremeHeat => "Extreme heat",
            Self::VeryHot => "Very heat",
            Self::Heat => "Heat",
            Self::HighHumidity => "High humidity",
            Self::Dry => "Dry",
            Self::Cold => "Cold",
            Self::Comfort => "Comfort",
            Self::Normal => "Normal",
        }
    }
}

/// Round to the nearest integer, halves away from zero
///
/// `core` has no `f32::round`. The fraction is compared against 0.5 after
/// truncation, so values just below a half never round up. NaN maps to 0
/// and out-of-range values saturate.
pub fn round_half_away(value: f32) -> i32 {
    let whole = value as i32;
    let fraction = value - whole as f32;

    if fraction >= 0.5 {
        whole.saturating_add(1)
    } else if fraction <= -0.5 {
        whole.saturating_sub(1)
    } else {
        whole
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_quality_classes() {
        assert_eq!(AirQuality::from_index(1), AirQuality::Excellent);
        assert_eq!(AirQuality::from_index(3), AirQuality::Moderate);
        assert_eq!(AirQuality::from_index(5), AirQuality::Unhealthy);
        assert_eq!(AirQuality::from_index(0), AirQuality::Unknown);
        assert_eq!(AirQuality::from_index(6).label(), "Unknown");
    }

    #[test]
    fn test_co2_level_thresholds() {
        assert_eq!(Co2Level::assess(0), Co2Level::NoData);
        assert_eq!(Co2Level::assess(399), Co2Level::NoData);
        assert_eq!(Co2Level::assess(400), Co2Level::Excellent);
        assert_eq!(Co2Level::assess(799), Co2Level::Good);
        assert_eq!(Co2Level::assess(800), Co2Level::Fair);
        assert_eq!(Co2Level::assess(1499), Co2Level::Poor);
        assert_eq!(Co2Level::assess(u16::MAX), Co2Level::Bad);
    }

    #[test]
    fn test_heat_index_identity_below_threshold() {
        assert_eq!(heat_index(22.0, 90.0), 22.0);
        assert_eq!(heat_index(-5.0, 10.0), -5.0);
    }

    #[test]
    fn test_heat_index_hot_and_humid() {
        // 30 °C at 70 %RH feels like roughly 35 °C
        let hi = heat_index(30.0, 70.0);
        assert!((34.0..37.0).contains(&hi), "heat index was {}", hi);
        assert_eq!(HeatRisk::assess(hi), HeatRisk::ExtremeCaution);
    }

    #[test]
    fn test_heat_risk_bands() {
        assert_eq!(HeatRisk::assess(26.9), HeatRisk::NoHeat);
        assert_eq!(HeatRisk::assess(27.0), HeatRisk::Caution);
        assert_eq!(HeatRisk::assess(41.0), HeatRisk::Danger);
        assert_eq!(HeatRisk::assess(60.0), HeatRisk::ExtremeDanger);
    }

    #[test]
    fn test_round_half_away() {
        assert_eq!(round_half_away(2.5), 3);
        assert_eq!(round_half_away(-2.5), -3);
        assert_eq!(round_half_away(2.49), 2);
        assert_eq!(round_half_away(f32::NAN), 0);
    }

    #[test]
    fn test_round_half_away_just_below_half() {
        assert_eq!(round_half_away(0.499_999_97), 0);
        assert_eq!(round_half_away(-0.499_999_97), 0);
        assert_eq!(round_half_away(-0.5), -1);
        assert_eq!(round_half_away(1e10), i32::MAX);
        assert_eq!(round_half_away(-1e10), i32::MIN);
    }

    #[test]
    fn test_comfort_index_cool_and_neutral() {
        assert_eq!(comfort_index(10.0, 50.0), -2);
        assert_eq!(comfort_index(15.9, 50.0), -2);
        assert_eq!(comfort_index(16.0, 50.0), -1);
        assert_eq!(comfort_index(20.0, 50.0), 0);
        assert_eq!(comfort_index(26.9, 95.0), 0);
    }

    #[test]
    fn test_comfort_index_uses_heat_index_when_hot() {
        // 30 °C at 70 %RH feels like ~35 °C: extreme caution rather than caution
        assert_eq!(comfort_index(30.0, 70.0), 2);
        assert_eq!(comfort_index(27.0, 90.0), 1);
        assert_eq!(comfort_index(40.0, 60.0), 4);
    }

    #[test]
    fn test_comfort_band_edges() {
        assert_eq!(comfort_band(26.9), 0);
        assert_eq!(comfort_band(27.0), 1);
        assert_eq!(comfort_band(31.9), 1);
        assert_eq!(comfort_band(32.0), 2);
        assert_eq!(comfort_band(41.0), 3);
        assert_eq!(comfort_band(53.9), 3);
        assert_eq!(comfort_band(54.0), 4);
        assert_eq!(comfort_band(19.9), -1);
        assert_eq!(comfort_band(f32::NAN), -2);
    }

    #[test]
    fn test_temperature_comfort_bands() {
        assert_eq!(temperature_comfort_index(22.0), 0);
        assert_eq!(temperature_comfort_index(24.0), 0);
        assert_eq!(temperature_comfort_index(20.0), -1);
        assert_eq!(temperature_comfort_index(25.0), 1);
        assert_eq!(temperature_comfort_index(26.0), 1);
        assert_eq!(temperature_comfort_index(18.0), -2);
        assert_eq!(temperature_comfort_index(28.0), 2);
        assert_eq!(temperature_comfort_index(16.0), -3);
        assert_eq!(temperature_comfort_index(5.0), -3);
        assert_eq!(temperature_comfort_index(30.0), 3);
        assert_eq!(temperature_comfort_index(45.0), 3);
        assert_eq!(temperature_comfort_index(f32::NAN), 0);
    }

    #[test]
    fn test_humidity_comfort_thresholds() {
        assert_eq!(humidity_comfort_index(80.1), 4);
        assert_eq!(humidity_comfort_index(80.0), 3);
        assert_eq!(humidity_comfort_index(70.0), 2);
        assert_eq!(humidity_comfort_index(60.0), 1);
        assert_eq!(humidity_comfort_index(50.0), 0);
        assert_eq!(humidity_comfort_index(40.0), -1);
        assert_eq!(humidity_comfort_index(30.0), -2);
        assert_eq!(humidity_comfort_index(0.0), -2);
    }

    #[test]
    fn test_comfort_status_air_quality_first() {
        assert_eq!(ComfortStatus::assess(900, 3, 60.0, 90.0, 10.0), ComfortStatus::PoorAir);
        assert_eq!(ComfortStatus::assess(1000, 3, 22.0, 45.0, 22.0), ComfortStatus::HighCo2);
        assert_eq!(ComfortStatus::assess(1200, 1, 60.0, 45.0, 22.0), ComfortStatus::HighCo2);
        assert_eq!(ComfortStatus::PoorAir.label(), "Poor Air");
    }

    #[test]
    fn test_comfort_status_heat_bands() {
        assert_eq!(ComfortStatus::assess(500, 1, 54.0, 45.0, 40.0), ComfortStatus::DangerHeat);
        assert_eq!(ComfortStatus::assess(500, 1, 41.0, 45.0, 35.0), ComfortStatus::ExtremeHeat);
        assert_eq!(ComfortStatus::assess(500, 1, 32.0, 45.0, 30.0), ComfortStatus::VeryHot);
        assert_eq!(ComfortStatus::assess(500, 1, 27.0, 90.0, 27.0), ComfortStatus::Heat);
    }

    #[test]
    fn test_comfort_status_humidity_and_temperature() {
        assert_eq!(ComfortStatus::assess(500, 1, 22.0, 65.1, 22.0), ComfortStatus::HighHumidity);
        assert_eq!(ComfortStatus::assess(500, 1, 22.0, 34.9, 22.0), ComfortStatus::Dry);
        assert_eq!(ComfortStatus::assess(500, 1, 15.0, 45.0, 15.0), ComfortStatus::Cold);
        assert_eq!(ComfortStatus::assess(500, 2, 22.0, 45.0, 22.0), ComfortStatus::Comfort);
        assert_eq!(ComfortStatus::assess(800, 2, 22.0, 45.0, 22.0), ComfortStatus::Normal);
        assert_eq!(ComfortStatus::assess(500, 1, 26.0, 63.0, 26.0), ComfortStatus::Normal);
        assert_eq!(ComfortStatus::Normal.label(), "Normal");
    }
}
