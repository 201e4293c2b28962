//! Natural Earth I projection fitted to a target size, plus point hit testing.

use serde::Serialize;

use crate::models::GeographyFeature;

/// Raw Natural Earth I projection of (λ, φ) in radians. y grows northward.
pub fn natural_earth_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    (
        lambda
            * (0.8707 - 0.131979 * phi2
                + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
        phi * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
    )
}

/// Uniform scale + translation from raw projected units to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl Projection {
    /// Fit all features into `size`, centered, preserving aspect ratio.
    pub fn fit_size(features: &[GeographyFeature], size: (f64, f64)) -> Self {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in features
            .iter()
            .flat_map(|f| f.polygons.iter().flatten().flatten())
            .map(|&(lon, lat)| raw_screen(lon, lat))
        {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        let Some((x0, y0, x1, y1)) = bounds else {
            return Self {
                scale: 1.0,
                translate: (0.0, 0.0),
            };
        };
        let (w, h) = size;
        let kx = if x1 > x0 { w / (x1 - x0) } else { f64::INFINITY };
        let ky = if y1 > y0 { h / (y1 - y0) } else { f64::INFINITY };
        let mut k = kx.min(ky);
        if !k.is_finite() {
            k = 1.0;
        }
        Self {
            scale: k,
            translate: ((w - k * (x1 + x0)) / 2.0, (h - k * (y1 + y0)) / 2.0),
        }
    }

    /// Longitude/latitude in degrees → screen pixels (y down).
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = raw_screen(lon, lat);
        (
            self.translate.0 + self.scale * x,
            self.translate.1 + self.scale * y,
        )
    }
}

fn raw_screen(lon: f64, lat: f64) -> (f64, f64) {
    let (x, y) = natural_earth_raw(lon.to_radians(), lat.to_radians());
    (x, -y)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedRegion {
    pub name: String,
    /// Screen-space rings; the first ring of every polygon is its exterior.
    pub polygons: Vec<Vec<Vec<(f64, f64)>>>,
}

impl ProjectedRegion {
    /// Even-odd containment over all rings.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygons.iter().any(|rings| {
            rings
                .iter()
                .filter(|ring| ring_contains(ring, x, y))
                .count()
                % 2
                == 1
        })
    }
}

/// Geography projected once for the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedMap {
    pub width: u32,
    pub height: u32,
    pub regions: Vec<ProjectedRegion>,
}

impl ProjectedMap {
    pub fn new(features: &[GeographyFeature], width: u32, height: u32) -> Self {
        let projection = Projection::fit_size(features, (width as f64, height as f64));
        let regions = features
            .iter()
            .map(|f| ProjectedRegion {
                name: f.name.clone(),
                polygons: f
                    .polygons
                    .iter()
                    .map(|rings| {
                        rings
                            .iter()
                            .map(|ring| {
                                ring.iter()
                                    .map(|&(lon, lat)| projection.project(lon, lat))
                                    .collect()
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect();
        Self {
            width,
            height,
            regions,
        }
    }

    /// Name of the region under the point; later regions are drawn on top and win.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.contains(x, y))
            .map(|r| r.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }
}

fn ring_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, lon0: f64, lat0: f64, size: f64) -> GeographyFeature {
        GeographyFeature::new(
            name,
            vec![vec![vec![
                (lon0, lat0),
                (lon0 + size, lat0),
                (lon0 + size, lat0 + size),
                (lon0, lat0 + size),
                (lon0, lat0),
            ]]],
        )
    }

    #[test]
    fn origin_projects_to_origin() {
        assert_eq!(natural_earth_raw(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn fit_size_fills_the_target() {
        let features = vec![square("A", -10.0, -10.0, 20.0)];
        let map = ProjectedMap::new(&features, 400, 200);
        let pts: Vec<(f64, f64)> = map.regions[0].polygons[0][0].clone();
        let (min_x, max_x) = pts
            .iter()
            .fold((f64::MAX, f64::MIN), |(a, b), p| (a.min(p.0), b.max(p.0)));
        let (min_y, max_y) = pts
            .iter()
            .fold((f64::MAX, f64::MIN), |(a, b), p| (a.min(p.1), b.max(p.1)));
        // Roughly square input: height is the binding dimension.
        assert!((max_y - min_y - 200.0).abs() < 1e-6);
        assert!(min_y.abs() < 1e-6);
        assert!(((min_x + max_x) / 2.0 - 200.0).abs() < 1e-6);
    }

    #[test]
    fn north_is_up() {
        let features = vec![square("A", 0.0, 0.0, 10.0)];
        let p = Projection::fit_size(&features, (100.0, 100.0));
        assert!(p.project(5.0, 10.0).1 < p.project(5.0, 0.0).1);
    }

    #[test]
    fn hit_test_finds_regions_and_misses_gaps() {
        let features = vec![square("West", -30.0, 0.0, 10.0), square("East", 20.0, 0.0, 10.0)];
        let map = ProjectedMap::new(&features, 600, 300);
        let center = |i: usize| {
            let ring = &map.regions[i].polygons[0][0];
            let n = (ring.len() - 1) as f64;
            let sx: f64 = ring[..ring.len() - 1].iter().map(|p| p.0).sum();
            let sy: f64 = ring[..ring.len() - 1].iter().map(|p| p.1).sum();
            (sx / n, sy / n)
        };
        let (wx, wy) = center(0);
        let (ex, ey) = center(1);
        assert_eq!(map.hit_test(wx, wy), Some("West"));
        assert_eq!(map.hit_test(ex, ey), Some("East"));
        assert_eq!(map.hit_test((wx + ex) / 2.0, wy), None);
    }
}
