/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// Reference radius of the degree-1 harmonic coefficients (meters)
pub const EARTH_REFERENCE_RADIUS_M: f64 = 6378136.3;

/// Earth gravitational constant (m^3 s-2)
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = 3.986004415E14;

/// |TAI - GPST| constant offset, in seconds
pub const TAI_GPST_OFFSET_S: f64 = 19.0;

/// SP3 clock values at or above this threshold (µs) encode missing data
pub const SP3_CLOCK_SENTINEL_US: f64 = 999999.0;

/// Satellite selection token: select every satellite
pub const SELECT_ALL_TOKEN: &str = "<all>";

/// Position scaling: SP3 km to m
pub(crate) const KM_TO_M: f64 = 1.0E3;

/// Velocity scaling: SP3 dm/s to m/s
pub(crate) const DM_S_TO_M_S: f64 = 0.1;

/// Clock scaling: SP3 µs to s
pub(crate) const US_TO_S: f64 = 1.0E-6;

/// Covariance scaling: SP3 mm to m
pub(crate) const MM_TO_M: f64 = 1.0E-3;

/// Covariance scaling: correlation [1E-7] x mm x mm to m²
pub(crate) const CORRELATION_MM2_TO_M2: f64 = 1.0E-13;
