use super::Point;

/// Returns the point with the smallest loss.
///
/// Ties resolve to the earliest argument, so `a` beats `b` and `b` beats `c`
/// when their losses are equal. A `NaN` loss never wins against a number.
#[must_use]
pub fn argmin3(a: Point, b: Point, c: Point) -> Point {
    let mut best = a;
    for point in [b, c] {
        if point.loss < best.loss || (best.loss.is_nan() && !point.loss.is_nan()) {
            best = point;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_smallest_loss() {
        let a = Point::new(0.1, 3.0);
        let b = Point::new(0.2, 1.0);
        let c = Point::new(0.3, 2.0);

        assert_eq!(argmin3(a, b, c), b);
        assert_eq!(argmin3(c, a, b), b);
    }

    #[test]
    fn ties_go_to_earliest_argument() {
        let a = Point::new(0.1, 1.0);
        let b = Point::new(0.2, 1.0);
        let c = Point::new(0.3, 1.0);

        assert_eq!(argmin3(a, b, c), a);
        assert_eq!(argmin3(Point::new(0.0, 5.0), b, c), b);
    }

    #[test]
    fn nan_loss_loses() {
        let a = Point::new(0.1, f64::NAN);
        let b = Point::new(0.2, 4.0);
        let c = Point::new(0.3, f64::NAN);

        assert_eq!(argmin3(a, b, c), b);
    }
}
