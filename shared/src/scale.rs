//! Band and linear scales.
//!
//! Geometry follows the usual charting conventions: a band scale with
//! padding `p` uses `p` for both inner and outer padding and centers the
//! bands in the range; a linear scale maps its domain affinely onto its
//! range and produces 1/2/5 × 10ⁿ ticks.

/// Ordinal scale that splits a continuous range into equal bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding: f64,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    /// Returns `None` for an empty domain.
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Option<Self> {
        if domain.is_empty() {
            return None;
        }
        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let extent = r1 - r0;
        let step = extent / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (extent - step * (n - padding)) * 0.5;
        Some(Self {
            domain,
            range,
            padding,
            step,
            bandwidth: step * (1.0 - padding),
            start,
        })
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Start offset of the band at `index`.
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.domain.len()).then(|| self.start + self.step * index as f64)
    }

    /// Start offset of the band labelled `category`.
    pub fn position_of(&self, category: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|label| label == category)
            .and_then(|index| self.position(index))
    }

    pub fn center(&self, index: usize) -> Option<f64> {
        self.position(index).map(|x| x + self.bandwidth / 2.0)
    }
}

/// Continuous scale mapping `domain` onto `range` affinely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Returns `None` when the domain is degenerate or not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Option<Self> {
        let (d0, d1) = domain;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 {
            return None;
        }
        Some(Self { domain, range })
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (start, stop) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        let mut ticks = nice_ticks(start, stop, count);
        if d0 > d1 {
            ticks.reverse();
        }
        ticks
    }
}

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(start < stop) {
        return if start == stop && count > 0 { vec![start] } else { Vec::new() };
    }
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    // Negative powers divide by an integer inverse to keep ticks exact.
    if power < 0.0 {
        let inverse = 10f64.powf(-power) / factor;
        let first = (start * inverse).ceil() as i64;
        let last = (stop * inverse).floor() as i64;
        (first..=last).map(|i| i as f64 / inverse).collect()
    } else {
        let increment = 10f64.powf(power) * factor;
        let first = (start / increment).ceil() as i64;
        let last = (stop / increment).floor() as i64;
        (first..=last).map(|i| i as f64 * increment).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn band_scale_geometry_with_padding() {
        let scale = BandScale::new(labels(12), (0.0, 570.0), 0.2).unwrap();
        let step = 570.0 / 12.2;
        assert!(approx(scale.step(), step));
        assert!(approx(scale.bandwidth(), step * 0.8));
        // Outer padding equals inner padding: the first band starts one
        // padding fraction of a step into the range.
        assert!(approx(scale.position(0).unwrap(), step * 0.2));
        let last_end = scale.position(11).unwrap() + scale.bandwidth();
        assert!(approx(570.0 - last_end, step * 0.2));
    }

    #[test]
    fn band_scale_looks_up_by_label() {
        let scale = BandScale::new(labels(5), (0.0, 570.0), 0.4).unwrap();
        assert_eq!(scale.position_of("c3"), scale.position(3));
        assert_eq!(scale.position_of("missing"), None);
        assert_eq!(scale.position(5), None);
    }

    #[test]
    fn band_scale_rejects_empty_domain() {
        assert!(BandScale::new(Vec::new(), (0.0, 100.0), 0.2).is_none());
    }

    #[test]
    fn linear_scale_inverts_range() {
        let scale = LinearScale::new((0.0, 100.0), (300.0, 0.0)).unwrap();
        assert!(approx(scale.apply(0.0), 300.0));
        assert!(approx(scale.apply(100.0), 0.0));
        assert!(approx(scale.apply(25.0), 225.0));
    }

    #[test]
    fn linear_scale_rejects_degenerate_domain() {
        assert!(LinearScale::new((0.0, 0.0), (300.0, 0.0)).is_none());
        assert!(LinearScale::new((0.0, f64::NAN), (300.0, 0.0)).is_none());
    }

    #[test]
    fn ticks_are_round_numbers() {
        let scale = LinearScale::new((0.0, 100.0), (300.0, 0.0)).unwrap();
        assert_eq!(scale.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);

        let scale = LinearScale::new((0.0, 75.0), (300.0, 0.0)).unwrap();
        assert_eq!(scale.ticks(5), vec![0.0, 20.0, 40.0, 60.0]);

        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0)).unwrap();
        assert_eq!(scale.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }
}
