//! Thrust chamber geometry.
//!
//! Inputs live in [`GeometryConfig`]; [`Geometry::new`] derives throat and
//! injector areas, nozzle length, chamber length and chamber volume. All
//! derived values are computed in inches and exposed as uom quantities.

use crate::error::{PerfError, PerfResult};
use isp_core::units::{Area, Length, Volume, cu_in, inch, sq_in, us};
use std::f64::consts::PI;

/// Geometry inputs. Radii of curvature are normalized by throat radius.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryConfig {
    pub throat_radius: Length,
    /// Injector face area over throat area.
    pub contraction_ratio: f64,
    /// Exit area over throat area.
    pub area_ratio: f64,
    /// Nozzle length as percent of a 15 degree cone.
    pub percent_bell: f64,
    /// Overrides `percent_bell` when set.
    pub nozzle_length: Option<Length>,
    pub rup_throat: f64,
    pub rdwn_throat: f64,
    pub rchm_conv: f64,
    /// Half angle of the conical convergent section [deg].
    pub conv_half_angle_deg: f64,
    /// Chamber length over throat diameter.
    pub lcham_over_dt: f64,
    pub lcham_min: Length,
    /// Overrides `lcham_over_dt` and `lcham_min` when set.
    pub chamber_length: Option<Length>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            throat_radius: inch(1.0),
            contraction_ratio: 2.5,
            area_ratio: 20.0,
            percent_bell: 80.0,
            nozzle_length: None,
            rup_throat: 1.5,
            rdwn_throat: 1.0,
            rchm_conv: 1.0,
            conv_half_angle_deg: 30.0,
            lcham_over_dt: 3.0,
            lcham_min: inch(1.0),
            chamber_length: None,
        }
    }
}

/// What set the chamber length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChamberLengthSource {
    Input,
    RatioToThroat,
    Minimum,
    /// Requested length was shorter than the convergent section.
    ConvergentLimited,
}

#[derive(Clone, Debug)]
pub struct Geometry {
    config: GeometryConfig,
    rt: f64,
    percent_bell: f64,
    lnoz: f64,
    lcham: f64,
    lcham_source: ChamberLengthSource,
    lcham_conv: f64,
    lcham_cyl: f64,
    vcham: f64,
}

impl Geometry {
    pub fn new(config: GeometryConfig) -> PerfResult<Self> {
        validate(&config)?;

        let rt = us::inches(config.throat_radius);
        let z100 = rt * (config.area_ratio.sqrt() - 1.0) / 15f64.to_radians().tan();
        let (lnoz, percent_bell) = match config.nozzle_length {
            Some(l) => {
                let l = us::inches(l);
                (l, 100.0 * l / z100)
            }
            None => (z100 * config.percent_bell / 100.0, config.percent_bell),
        };

        let rinj = rt * config.contraction_ratio.sqrt();
        let (mut lcham, mut lcham_source) = match config.chamber_length {
            Some(l) => (us::inches(l), ChamberLengthSource::Input),
            None => {
                let lmin = us::inches(config.lcham_min);
                let from_ratio = config.lcham_over_dt * 2.0 * rt;
                if from_ratio > lmin {
                    (from_ratio, ChamberLengthSource::RatioToThroat)
                } else {
                    (lmin, ChamberLengthSource::Minimum)
                }
            }
        };

        let lcham_conv = convergent_length(&config)? * rt;
        let mut lcham_cyl = lcham - lcham_conv;
        if lcham_cyl < 0.0 {
            lcham_cyl = 0.0;
            lcham = lcham_conv;
            lcham_source = ChamberLengthSource::ConvergentLimited;
        }

        let dinj = 2.0 * rinj;
        let vcham = cylinder_volume(dinj, lcham_cyl) + frustum_volume(dinj, 2.0 * rt, lcham_conv);

        Ok(Self {
            config,
            rt,
            percent_bell,
            lnoz,
            lcham,
            lcham_source,
            lcham_conv,
            lcham_cyl,
            vcham,
        })
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn throat_radius(&self) -> Length {
        inch(self.rt)
    }

    pub fn throat_area(&self) -> Area {
        sq_in(PI * self.rt * self.rt)
    }

    pub fn area_ratio(&self) -> f64 {
        self.config.area_ratio
    }

    pub fn contraction_ratio(&self) -> f64 {
        self.config.contraction_ratio
    }

    /// Percent bell, back-computed when a nozzle length was given.
    pub fn percent_bell(&self) -> f64 {
        self.percent_bell
    }

    pub fn nozzle_length(&self) -> Length {
        inch(self.lnoz)
    }

    pub fn exit_radius(&self) -> Length {
        inch(self.rt * self.config.area_ratio.sqrt())
    }

    pub fn injector_radius(&self) -> Length {
        inch(self.rt * self.config.contraction_ratio.sqrt())
    }

    pub fn injector_area(&self) -> Area {
        sq_in(PI * self.rt * self.rt * self.config.contraction_ratio)
    }

    pub fn chamber_length(&self) -> Length {
        inch(self.lcham)
    }

    pub fn chamber_length_source(&self) -> ChamberLengthSource {
        self.lcham_source
    }

    pub fn convergent_length(&self) -> Length {
        inch(self.lcham_conv)
    }

    pub fn cylinder_length(&self) -> Length {
        inch(self.lcham_cyl)
    }

    pub fn total_length(&self) -> Length {
        inch(self.lcham + self.lnoz)
    }

    pub fn chamber_volume(&self) -> Volume {
        cu_in(self.vcham)
    }

    /// Chamber length over injector (chamber) radius.
    pub fn lprime_over_rcham(&self) -> f64 {
        self.lcham / (self.rt * self.config.contraction_ratio.sqrt())
    }
}

fn validate(config: &GeometryConfig) -> PerfResult<()> {
    let positive = |v: f64, what: &str| -> PerfResult<()> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PerfError::Geometry {
                what: format!("{what} must be positive and finite, got {v}"),
            });
        }
        Ok(())
    };

    positive(us::inches(config.throat_radius), "throat radius")?;
    positive(config.percent_bell, "percent bell")?;
    positive(config.rup_throat, "upstream throat radius of curvature")?;
    positive(config.rdwn_throat, "downstream throat radius of curvature")?;
    positive(config.rchm_conv, "convergent radius of curvature")?;
    positive(config.lcham_over_dt, "Lcham/Dt")?;
    positive(us::inches(config.lcham_min), "minimum chamber length")?;
    if let Some(l) = config.nozzle_length {
        positive(us::inches(l), "nozzle length")?;
    }
    if let Some(l) = config.chamber_length {
        positive(us::inches(l), "chamber length")?;
    }
    if !config.area_ratio.is_finite() || config.area_ratio <= 1.0 {
        return Err(PerfError::Geometry {
            what: format!("area ratio must exceed 1, got {}", config.area_ratio),
        });
    }
    if !config.contraction_ratio.is_finite() || config.contraction_ratio <= 1.0 {
        return Err(PerfError::Geometry {
            what: format!(
                "contraction ratio must exceed 1, got {}",
                config.contraction_ratio
            ),
        });
    }
    let angle = config.conv_half_angle_deg;
    if !angle.is_finite() || angle <= 0.0 || angle >= 90.0 {
        return Err(PerfError::Geometry {
            what: format!("convergent half angle must lie in (0, 90) deg, got {angle}"),
        });
    }
    Ok(())
}

/// Convergent section length normalized by throat radius.
fn convergent_length(config: &GeometryConfig) -> PerfResult<f64> {
    let a = config.conv_half_angle_deg.to_radians();
    let (sin_a, cos_a, tan_a) = (a.sin(), a.cos(), a.tan());

    let rchm = config.contraction_ratio.sqrt();
    let seg_height =
        rchm - config.rup_throat * (1.0 - cos_a) - config.rchm_conv * (1.0 - cos_a) - 1.0;
    if seg_height < 0.0 {
        return Err(PerfError::Geometry {
            what: format!(
                "convergent section has negative length: RupThroat={}, RchmConv={}, CR={} and \
                 angle={} deg are inconsistent",
                config.rup_throat,
                config.rchm_conv,
                config.contraction_ratio,
                config.conv_half_angle_deg
            ),
        });
    }
    let seg_width = seg_height / tan_a;
    Ok((config.rchm_conv + config.rup_throat) * sin_a + seg_width)
}

fn cylinder_volume(d: f64, l: f64) -> f64 {
    d * d * PI * l / 4.0
}

fn frustum_volume(d1: f64, d2: f64, h: f64) -> f64 {
    let (r1, r2) = (d1 / 2.0, d2 / 2.0);
    PI * h * (r1 * r1 + r1 * r2 + r2 * r2) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn default_geometry() {
        let g = Geometry::new(GeometryConfig::default()).unwrap();
        assert!(close(us::sq_inches(g.throat_area()), PI, 1e-9));
        assert!(close(us::inches(g.chamber_length()), 6.0, 1e-9));
        assert_eq!(g.chamber_length_source(), ChamberLengthSource::RatioToThroat);
        assert!(close(us::inches(g.convergent_length()), 1.676435, 1e-5));
        assert!(close(us::inches(g.nozzle_length()), 10.36655, 1e-4));
        assert!(close(us::cu_inches(g.chamber_volume()), 42.8774, 1e-3));
    }

    #[test]
    fn derived_envelope() {
        let g = Geometry::new(GeometryConfig::default()).unwrap();
        assert!(close(us::sq_inches(g.injector_area()), 2.5 * PI, 1e-9));
        assert!(close(us::inches(g.injector_radius()), 2.5f64.sqrt(), 1e-12));
        assert!(close(us::inches(g.exit_radius()), 20f64.sqrt(), 1e-12));
        assert!(close(us::inches(g.total_length()), 16.36655, 1e-4));
        assert!(close(
            us::inches(g.total_length()),
            us::inches(g.chamber_length()) + us::inches(g.nozzle_length()),
            1e-12
        ));
        assert!(close(g.lprime_over_rcham(), 6.0 / 2.5f64.sqrt(), 1e-12));
    }

    #[test]
    fn nozzle_length_overrides_percent_bell() {
        let cfg = GeometryConfig {
            throat_radius: inch(5.1527),
            contraction_ratio: 3.0,
            area_ratio: 77.5,
            nozzle_length: Some(inch(121.0)),
            rup_throat: 1.0,
            rdwn_throat: 0.392,
            rchm_conv: 1.73921,
            conv_half_angle_deg: 25.42,
            lcham_over_dt: 2.4842 / 2.0,
            ..GeometryConfig::default()
        };
        let g = Geometry::new(cfg.clone()).unwrap();
        assert!(close(g.percent_bell(), 80.634078, 1e-5));
        assert!(close(us::inches(g.chamber_length()), 12.80034, 1e-4));
        assert!(close(us::inches(g.cylinder_length()), 1.680205, 1e-4));
        assert!(close(us::cu_inches(g.chamber_volume()), 2192.6619, 1e-2));

        let g = Geometry::new(GeometryConfig {
            lcham_min: inch(100.0),
            ..cfg
        })
        .unwrap();
        assert!(close(us::inches(g.chamber_length()), 100.0, 1e-9));
        assert_eq!(g.chamber_length_source(), ChamberLengthSource::Minimum);
    }

    #[test]
    fn chamber_length_over_injector_radius() {
        let g = Geometry::new(GeometryConfig {
            area_ratio: 62.5,
            percent_bell: 75.0,
            lcham_over_dt: 3.1,
            lcham_min: inch(2.0),
            ..GeometryConfig::default()
        })
        .unwrap();
        assert!(close(us::inches(g.chamber_length()), 6.2, 1e-9));
        assert!(close(g.lprime_over_rcham(), 3.921224, 1e-5));
        assert!(close(us::inches(g.nozzle_length()), 19.32930, 1e-4));
        assert!(close(us::cu_inches(g.chamber_volume()), 44.4482, 1e-3));
    }

    #[test]
    fn short_chamber_is_convergent_limited() {
        let g = Geometry::new(GeometryConfig {
            chamber_length: Some(inch(1.0)),
            ..GeometryConfig::default()
        })
        .unwrap();
        assert_eq!(g.chamber_length_source(), ChamberLengthSource::ConvergentLimited);
        assert!(close(us::inches(g.chamber_length()), 1.676435, 1e-5));
        assert_eq!(us::inches(g.cylinder_length()), 0.0);
    }

    #[test]
    fn inconsistent_convergent_section() {
        let err = Geometry::new(GeometryConfig {
            contraction_ratio: 1.2,
            rup_throat: 3.0,
            rchm_conv: 3.0,
            conv_half_angle_deg: 45.0,
            ..GeometryConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, PerfError::Geometry { .. }));
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(
            Geometry::new(GeometryConfig {
                area_ratio: 1.0,
                ..GeometryConfig::default()
            })
            .is_err()
        );
        assert!(
            Geometry::new(GeometryConfig {
                throat_radius: inch(-1.0),
                ..GeometryConfig::default()
            })
            .is_err()
        );
    }
}
