//! Physical constants and the Courant stability bound.
//!
//! SI units throughout: metres, seconds, farads per metre, henries per
//! metre, siemens per metre, radians per second.

/// Permittivity of free space (F/m).
pub const EPSILON_0: f64 = 8.854e-12;

/// Permeability of free space (H/m).
pub const MU_0: f64 = 4.0 * std::f64::consts::PI * 1e-7;

/// Wave speed in a homogeneous medium, $c = 1/\sqrt{\mu \epsilon}$ (m/s).
pub fn light_speed(mu: f64, epsilon: f64) -> f64 {
    1.0 / (mu * epsilon).sqrt()
}

/// Largest stable time step for the 2-D Yee scheme,
/// $\Delta t \le 1 / (c \sqrt{1/\Delta x^2 + 1/\Delta y^2})$.
pub fn courant_limit(dx: f64, dy: f64, c: f64) -> f64 {
    1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vacuum_light_speed() {
        let c = light_speed(MU_0, EPSILON_0);
        // 1/sqrt(mu_0 * 8.854e-12) is within 0.1% of the defined value.
        assert_relative_eq!(c, 2.998e8, max_relative = 1e-3);
    }

    #[test]
    fn test_courant_limit_square_cells() {
        let c = 3e8;
        let dt = courant_limit(1e-7, 1e-7, c);
        // For dx = dy the bound reduces to dx / (c sqrt(2)).
        assert_relative_eq!(dt, 1e-7 / (c * 2f64.sqrt()), max_relative = 1e-12);
    }
}
