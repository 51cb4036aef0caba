/// Default perpendicular offset (in degrees) of the first curve between a node pair.
/// Each further duplicate adds another multiple of this value.
pub const DEFAULT_BASE_OFFSET: f64 = 0.12;

/// Default number of samples per curved leg
pub const DEFAULT_CURVE_POINTS: usize = 30;

/// Added to the edge length before normalising the perpendicular, so that
/// coincident endpoints never divide by zero
pub const CURVE_EPSILON: f64 = 1e-6;

/// Risk weight of a RED leg
pub const DEFAULT_RED_WEIGHT: f64 = 3.0;

/// Risk weight of an ORANGE leg
pub const DEFAULT_ORANGE_WEIGHT: f64 = 2.0;

/// Risk weight of a GREEN leg
pub const DEFAULT_GREEN_WEIGHT: f64 = 1.0;

/// Default map center (lat, lon), roughly the middle of India
pub const DEFAULT_MAP_CENTER: (f64, f64) = (22.0, 78.0);

/// Default map zoom level
pub const DEFAULT_MAP_ZOOM: u8 = 5;

/// Minutes in one day, the exclusive upper bound of a departure ordinal
pub const MINUTES_PER_DAY: u16 = 24 * 60;
