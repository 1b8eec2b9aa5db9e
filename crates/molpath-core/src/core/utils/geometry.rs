use nalgebra::{Point3, Vector3};

pub fn distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p2).norm()
}

/// Returns `position - offset`, component-wise.
pub fn translate(position: &Point3<f64>, offset: &Vector3<f64>) -> Point3<f64> {
    position - offset
}

/// Arithmetic mean of a set of points, unweighted.
///
/// Returns `None` for an empty input rather than dividing by zero.
pub fn centroid<'a, I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), p| {
            (sum + p.coords, count + 1)
        });
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}
