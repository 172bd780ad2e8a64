// isp-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Force as UomForce, Length as UomLength, MassRate as UomMassRate,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime, Velocity as UomVelocity, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Force = UomForce;
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;

/// Specific impulse, carried as a time (lbf·s/lbm reduces to seconds).
pub type SpecificImpulse = UomTime;

#[inline]
pub fn psia(v: f64) -> Pressure {
    use uom::si::pressure::psi;
    Pressure::new::<psi>(v)
}

#[inline]
pub fn deg_r(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_rankine;
    Temperature::new::<degree_rankine>(v)
}

#[inline]
pub fn lbm_per_s(v: f64) -> MassRate {
    use uom::si::mass_rate::pound_per_second;
    MassRate::new::<pound_per_second>(v)
}

#[inline]
pub fn inch(v: f64) -> Length {
    use uom::si::length::inch;
    Length::new::<inch>(v)
}

#[inline]
pub fn sq_in(v: f64) -> Area {
    use uom::si::area::square_inch;
    Area::new::<square_inch>(v)
}

#[inline]
pub fn cu_in(v: f64) -> Volume {
    use uom::si::volume::cubic_inch;
    Volume::new::<cubic_inch>(v)
}

#[inline]
pub fn fps(v: f64) -> Velocity {
    use uom::si::velocity::foot_per_second;
    Velocity::new::<foot_per_second>(v)
}

#[inline]
pub fn lbf(v: f64) -> Force {
    use uom::si::force::pound_force;
    Force::new::<pound_force>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Extractors into the US-customary units the correlations were fitted in.
pub mod us {
    use super::*;

    #[inline]
    pub fn psia(p: Pressure) -> f64 {
        p.get::<uom::si::pressure::psi>()
    }

    #[inline]
    pub fn inches(l: Length) -> f64 {
        l.get::<uom::si::length::inch>()
    }

    #[inline]
    pub fn sq_inches(a: Area) -> f64 {
        a.get::<uom::si::area::square_inch>()
    }

    #[inline]
    pub fn cu_inches(v: Volume) -> f64 {
        v.get::<uom::si::volume::cubic_inch>()
    }

    #[inline]
    pub fn fps(v: Velocity) -> f64 {
        v.get::<uom::si::velocity::foot_per_second>()
    }

    #[inline]
    pub fn deg_r(t: Temperature) -> f64 {
        t.get::<uom::si::thermodynamic_temperature::degree_rankine>()
    }

    #[inline]
    pub fn lbf(f: Force) -> f64 {
        f.get::<uom::si::force::pound_force>()
    }

    #[inline]
    pub fn lbm_per_s(w: MassRate) -> f64 {
        w.get::<uom::si::mass_rate::pound_per_second>()
    }

    #[inline]
    pub fn seconds(t: Time) -> f64 {
        t.get::<uom::si::time::second>()
    }
}

pub mod constants {
    /// Gravitational conversion constant, lbm·ft/(lbf·s²).
    pub const GC: f64 = 32.174;

    /// Universal gas constant, ft·lbf/(lbmol·degR).
    pub const R_UNIVERSAL_US: f64 = 1545.349;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_and_volume_in_inches() {
        assert!((us::sq_inches(sq_in(3.5)) - 3.5).abs() < 1e-12);
        assert!((us::cu_inches(cu_in(42.0)) - 42.0).abs() < 1e-9);
        assert!((us::seconds(s(0.25)) - 0.25).abs() < 1e-15);
        assert!((us::lbm_per_s(lbm_per_s(2.0)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn us_round_trip_values() {
        assert!((us::psia(psia(14.7)) - 14.7).abs() < 1e-9);
        assert!((us::inches(inch(3.0)) - 3.0).abs() < 1e-12);
        assert!((us::fps(fps(5500.0)) - 5500.0).abs() < 1e-9);
        assert!((us::deg_r(deg_r(6000.0)) - 6000.0).abs() < 1e-9);
        assert!((us::lbf(lbf(100.0)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn psia_converts_to_pascal() {
        let p = psia(1.0);
        assert!((p.value - 6894.757).abs() < 0.01);
    }
}
