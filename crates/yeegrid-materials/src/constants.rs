//! Physical constants in the workspace unit system (µm, s, Hz).

/// Speed of light in vacuum (µm/s).
pub const C_0: f64 = 2.997_924_58e14;

/// Vacuum permittivity (F/µm).
pub const EPSILON_0: f64 = 8.854_187_812_8e-18;

/// Hertz per electron-volt (photon energy to frequency).
pub const HZ_PER_EV: f64 = 2.417_989_242e14;

/// Angular frequency (rad/s) of an ordinary frequency (Hz).
pub fn angular(freq_hz: f64) -> f64 {
    2.0 * std::f64::consts::PI * freq_hz
}

/// Vacuum wavelength (µm) at an ordinary frequency (Hz).
pub fn wavelength_um(freq_hz: f64) -> f64 {
    C_0 / freq_hz
}

/// Frequency (Hz) of a vacuum wavelength (µm).
pub fn frequency_hz(wavelength_um: f64) -> f64 {
    C_0 / wavelength_um
}
