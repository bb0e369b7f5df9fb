//! GPS tracking playback of rented equipment.
//!
//! Equipment travels along a fixed [`Route`] one waypoint per step, so its
//! position is a pure function of the time elapsed since the work started.

use std::time;

use serde::{Deserialize, Serialize};

use crate::domain::equipment::Coordinates;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Waypoints of the [`Route::DEFAULT`].
#[expect(unsafe_code, reason = "coordinates are within ranges")]
const DEFAULT_WAYPOINTS: [Coordinates; 7] = unsafe {
    [
        Coordinates::new_unchecked(18.5204, 73.8567),
        Coordinates::new_unchecked(18.5250, 73.8650),
        Coordinates::new_unchecked(18.5310, 73.8720),
        Coordinates::new_unchecked(18.5365, 73.8805),
        Coordinates::new_unchecked(18.5420, 73.8890),
        Coordinates::new_unchecked(18.5480, 73.8960),
        Coordinates::new_unchecked(18.5535, 73.9030),
    ]
};

/// Route of equipment travelling to a farm.
#[derive(Clone, Copy, Debug)]
pub struct Route {
    /// Waypoints of this [`Route`], at least two.
    waypoints: &'static [Coordinates],
}

impl Route {
    /// Default [`Route`] every tracked equipment follows.
    pub const DEFAULT: Self = Self {
        waypoints: &DEFAULT_WAYPOINTS,
    };

    /// Returns waypoints of this [`Route`].
    #[must_use]
    pub fn waypoints(&self) -> &'static [Coordinates] {
        self.waypoints
    }

    /// Returns index of the last waypoint.
    fn last(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Returns total length of this [`Route`] in kilometers.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| haversine_km(w[0], w[1]))
            .sum()
    }

    /// Returns the [`Position`] on this [`Route`] after the `elapsed` time
    /// in the provided [`Mode`].
    #[must_use]
    pub fn position_at(&self, elapsed: time::Duration, mode: Mode) -> Position {
        let step = mode.step();
        let last = self.last();

        let steps = elapsed.as_nanos() / step.as_nanos().max(1);
        let index = usize::try_from(steps).unwrap_or(usize::MAX).min(last);

        #[expect(clippy::cast_precision_loss, reason = "tiny indices")]
        let progress = if last == 0 {
            1.0
        } else {
            index as f64 / last as f64
        };
        let total = self.distance_km();
        let covered_km = progress * total;

        let remaining_steps = u32::try_from(last - index).unwrap_or(u32::MAX);

        Position {
            index,
            coordinates: self.waypoints[index],
            progress,
            covered_km,
            remaining_km: total - covered_km,
            eta: step.saturating_mul(remaining_steps),
            arrived: index == last,
        }
    }
}

/// Calculates the great-circle distance between two [`Coordinates`] in
/// kilometers.
#[must_use]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lat = lat2 - lat1;
    let d_lng = (to.longitude() - from.longitude()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Mode of tracking.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum Mode {
    /// Real-time tracking.
    Live,

    /// Replay with the provided [`Speed`].
    Playback(Speed),
}

impl Mode {
    /// Interval between waypoints in [`Mode::Live`].
    pub const LIVE_STEP: time::Duration = time::Duration::from_secs(5);

    /// Returns the interval between waypoints in this [`Mode`].
    #[must_use]
    pub fn step(self) -> time::Duration {
        match self {
            Self::Live => Self::LIVE_STEP,
            Self::Playback(speed) => Self::LIVE_STEP.div_f64(speed.0),
        }
    }
}

/// Playback speed factor within `[0.25; 8]`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd, Serialize)]
pub struct Speed(f64);

impl Speed {
    /// Slowest [`Speed`].
    pub const MIN: f64 = 0.25;

    /// Fastest [`Speed`].
    pub const MAX: f64 = 8.0;

    /// Creates a new [`Speed`] if the `factor` is within the allowed range.
    #[must_use]
    pub fn new(factor: f64) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&factor)
            .then_some(Self(factor))
    }

    /// Returns the speed factor.
    #[must_use]
    pub fn factor(self) -> f64 {
        self.0
    }
}

/// Position of tracked equipment on a [`Route`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Index of the current waypoint.
    pub index: usize,

    /// [`Coordinates`] of the current waypoint.
    pub coordinates: Coordinates,

    /// Share of the [`Route`] passed, within `[0; 1]`.
    pub progress: f64,

    /// Kilometers passed.
    pub covered_km: f64,

    /// Kilometers left.
    pub remaining_km: f64,

    /// Estimated time until arrival.
    pub eta: time::Duration,

    /// Indicator whether the destination is reached.
    pub arrived: bool,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use crate::domain::equipment::Coordinates;

    use super::{haversine_km, Mode, Route, Speed};

    #[test]
    fn measures_route() {
        let pune = Coordinates::new(18.5204, 73.8567).unwrap();
        let mumbai = Coordinates::new(19.0760, 72.8777).unwrap();
        let km = haversine_km(pune, mumbai);
        assert!((118.0..122.0).contains(&km), "{km}");

        let route = Route::DEFAULT;
        assert_eq!(route.waypoints().len(), 7);
        assert!(route.distance_km() > 0.0);
    }

    #[test]
    fn steps_every_five_seconds_live() {
        let route = Route::DEFAULT;

        let start = route.position_at(Duration::ZERO, Mode::Live);
        assert_eq!(start.index, 0);
        assert!(start.progress.abs() < f64::EPSILON);
        assert_eq!(start.eta, Duration::from_secs(30));
        assert!(!start.arrived);

        let mid = route.position_at(Duration::from_millis(14_999), Mode::Live);
        assert_eq!(mid.index, 2);
        assert!((mid.progress - 2.0 / 6.0).abs() < 1e-9);
        assert!(
            (mid.covered_km + mid.remaining_km - route.distance_km()).abs()
                < 1e-9,
        );
        assert_eq!(mid.eta, Duration::from_secs(20));
    }

    #[test]
    fn stops_at_destination() {
        let route = Route::DEFAULT;

        let end = route.position_at(Duration::from_secs(3600), Mode::Live);
        assert_eq!(end.index, 6);
        assert!(end.arrived);
        assert_eq!(end.eta, Duration::ZERO);
        assert!(end.remaining_km.abs() < 1e-9);
    }

    #[test]
    fn playback_speeds_up() {
        let route = Route::DEFAULT;
        let fast = Mode::Playback(Speed::new(4.0).unwrap());

        assert_eq!(fast.step(), Duration::from_millis(1250));
        assert_eq!(route.position_at(Duration::from_secs(5), fast).index, 4);

        assert!(Speed::new(0.1).is_none());
        assert!(Speed::new(9.0).is_none());
    }
}
