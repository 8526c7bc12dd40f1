use crate::geo::Coordinate;

/// Below this span, a coordinate range is treated as flat (a single
/// row or column) rather than divided by a near-zero zoom coefficient.
const EPSILON: f64 = 1e-6;

/// Maps geodetic coordinates onto a padded canvas.
///
/// Degenerate inputs (empty, a single point, or all points sharing a
/// latitude or longitude) never fail: they project to the padded
/// origin, or a single row/column, per `spec.md` §4.3.
pub struct SphereProjector {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
}

impl SphereProjector {
    pub fn new<'a>(
        coordinates: impl Iterator<Item = &'a Coordinate>,
        width: f64,
        height: f64,
        padding: f64,
    ) -> Self {
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut any = false;

        for coordinate in coordinates {
            any = true;
            min_lon = min_lon.min(coordinate.longitude);
            max_lon = max_lon.max(coordinate.longitude);
            min_lat = min_lat.min(coordinate.latitude);
            max_lat = max_lat.max(coordinate.latitude);
        }

        if !any {
            return Self {
                padding,
                min_lon: 0.0,
                max_lat: 0.0,
                zoom: 0.0,
            };
        }

        let width_zoom = if (max_lon - min_lon).abs() > EPSILON {
            Some((width - 2.0 * padding) / (max_lon - min_lon))
        } else {
            None
        };
        let height_zoom = if (max_lat - min_lat).abs() > EPSILON {
            Some((height - 2.0 * padding) / (max_lat - min_lat))
        } else {
            None
        };

        let zoom = match (width_zoom, height_zoom) {
            (Some(wz), Some(hz)) => wz.min(hz),
            (Some(wz), None) => wz,
            (None, Some(hz)) => hz,
            (None, None) => 0.0,
        };

        Self {
            padding,
            min_lon,
            max_lat,
            zoom,
        }
    }

    /// Projects a geodetic coordinate into canvas space.
    pub fn project(&self, coordinate: &Coordinate) -> (f64, f64) {
        (
            (coordinate.longitude - self.min_lon) * self.zoom + self.padding,
            (self.max_lat - coordinate.latitude) * self.zoom + self.padding,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_projects_to_padded_origin() {
        let projector = SphereProjector::new(std::iter::empty(), 600.0, 400.0, 50.0);
        let (x, y) = projector.project(&Coordinate::new(10.0, 10.0));
        assert_eq!((x, y), (50.0, 50.0));
    }

    #[test]
    fn single_point_projects_to_padded_origin() {
        let points = [Coordinate::new(10.0, 20.0)];
        let projector = SphereProjector::new(points.iter(), 600.0, 400.0, 50.0);
        let (x, y) = projector.project(&points[0]);
        assert_eq!((x, y), (50.0, 50.0));
    }

    #[test]
    fn constant_latitude_produces_same_row() {
        let points = [
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 5.0),
            Coordinate::new(10.0, 10.0),
        ];
        let projector = SphereProjector::new(points.iter(), 600.0, 400.0, 50.0);
        let ys: Vec<f64> = points.iter().map(|c| projector.project(c).1).collect();
        assert!(ys.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9));
    }

    #[test]
    fn constant_longitude_produces_same_column() {
        let points = [
            Coordinate::new(0.0, 30.0),
            Coordinate::new(5.0, 30.0),
            Coordinate::new(10.0, 30.0),
        ];
        let projector = SphereProjector::new(points.iter(), 600.0, 400.0, 50.0);
        let xs: Vec<f64> = points.iter().map(|c| projector.project(c).0).collect();
        assert!(xs.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9));
    }
}
