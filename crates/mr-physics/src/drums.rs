//! Control drum configuration table.

use serde::{Deserialize, Serialize};

/// Drum counts with defined feedback coefficients.
pub const SUPPORTED_DRUM_COUNTS: [u32; 4] = [1, 2, 4, 8];

/// Base drum reactivity for the 8-drum layout.
const RHO_D0_8: f64 = -0.033085599;

/// Feedback and actuator constants for one drum layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrumParameters {
    /// Drum reactivity at zero rotation
    pub rho_d0: f64,
    /// Reactivity gained per degree of drum rotation
    pub reactivity_per_degree: f64,
    /// Baseline drum angle (degrees)
    pub u0: f64,
    /// Supertwisting switching gain
    pub w: f64,
}

/// Look up the drum parameters for `num_drums`.
///
/// Fewer drums need a larger baseline angle and switching gain, and each
/// degree is worth less reactivity. Unknown counts fall back to the 8-drum
/// reactivity and position values with a switching gain of 0.04 rather than
/// the 8-drum 0.06.
pub fn lookup_drum_parameters(num_drums: u32) -> DrumParameters {
    match num_drums {
        8 => DrumParameters {
            rho_d0: RHO_D0_8,
            reactivity_per_degree: 26.11e-5,
            u0: 77.56,
            w: 0.06,
        },
        4 => DrumParameters {
            rho_d0: RHO_D0_8 + 0.013980296,
            reactivity_per_degree: 16.11e-5,
            u0: 108.5,
            w: 0.1,
        },
        2 => DrumParameters {
            rho_d0: RHO_D0_8 + 0.0074,
            reactivity_per_degree: 7.33e-5,
            u0: 165.5,
            w: 0.2,
        },
        1 => DrumParameters {
            rho_d0: RHO_D0_8 + 0.0071 + 0.0082,
            reactivity_per_degree: 2.77e-5,
            u0: 170.0,
            w: 0.49,
        },
        _ => DrumParameters {
            rho_d0: RHO_D0_8,
            reactivity_per_degree: 26.11e-5,
            u0: 77.56,
            w: 0.04,
        },
    }
}
