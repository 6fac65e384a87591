// mr-core/src/units.rs

use uom::si::f64::{
    Power as UomPower, Ratio as UomRatio, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Power = UomPower;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn kelvin_of(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[inline]
pub fn watts_of(p: Power) -> f64 {
    use uom::si::power::watt;
    p.get::<watt>()
}

/// Reactivity in pcm (1e-5 dk/k).
#[inline]
pub fn pcm_of(rho: Ratio) -> f64 {
    use uom::si::ratio::ratio;
    rho.get::<ratio>() * 1e5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _t = k(300.0);
        let _p = w(22e6);
        let _r = unitless(0.5);
    }

    #[test]
    fn accessors_round_trip_si() {
        assert_eq!(kelvin_of(k(1105.0)), 1105.0);
        assert_eq!(watts_of(w(22e6)), 22e6);
        assert!((pcm_of(unitless(0.0048)) - 480.0).abs() < 1e-9);
    }
}
