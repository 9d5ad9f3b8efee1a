// Where to put the result highlight.
// Visual: a marker lands roughly between the right-most and bottom-most decoded
// points. It is a quick cue, not a centroid.

use crate::types::{FrameRect, PointF};

/// Midpoint of the right-most and bottom-most points, for 2..=4 points.
///
/// Both scans run in input order and only replace on a strictly greater value,
/// so on ties the first point seen wins.
pub fn compute_anchor(points: &[PointF]) -> Option<PointF> {
    if !(2..=4).contains(&points.len()) {
        return None;
    }

    let mut right = points[0];
    let mut bottom = points[0];
    let mut max_x = right.x;
    let mut max_y = bottom.y;
    for p in points {
        if max_x < p.x {
            max_x = p.x;
            right = *p;
        }
        if max_y < p.y {
            max_y = p.y;
            bottom = *p;
        }
    }

    let x = right.x - (right.x - bottom.x) / 2.0;
    let y = bottom.y - (bottom.y - right.y) / 2.0;
    Some(PointF::new(x, y))
}

/// Anchor in surface coordinates. Decoded points are relative to the preview;
/// outside full-screen mode the preview starts at the frame's top-left corner.
pub fn anchor_on_surface(points: &[PointF], frame: FrameRect, full_screen: bool) -> Option<PointF> {
    let anchor = compute_anchor(points)?;
    if full_screen {
        return Some(anchor);
    }
    Some(PointF::new(anchor.x + frame.left as f32, anchor.y + frame.top as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pts(raw: &[(f32, f32)]) -> Vec<PointF> {
        raw.iter().map(|&(x, y)| PointF::new(x, y)).collect()
    }

    #[test]
    fn square_anchors_on_first_maxima() {
        // right = (10,0) (first with x=10), bottom = (10,10) (first with y=10)
        let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(compute_anchor(&square), Some(PointF::new(10.0, 5.0)));
    }

    #[test]
    fn tie_break_follows_scan_order() {
        // Same set, different order: bottom is now (0,10).
        let square = pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        assert_eq!(compute_anchor(&square), Some(PointF::new(5.0, 5.0)));
    }

    #[test]
    fn two_points_anchor_at_midpoint() {
        let p = pts(&[(20.0, 40.0), (60.0, 10.0)]);
        // right = (60,10), bottom = (20,40)
        assert_eq!(compute_anchor(&p), Some(PointF::new(40.0, 25.0)));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    fn unsupported_point_counts(#[case] n: usize) {
        let p: Vec<_> = (0..n).map(|i| PointF::new(i as f32, i as f32)).collect();
        assert_eq!(compute_anchor(&p), None);
    }

    #[test]
    fn framed_mode_offsets_by_frame_origin() {
        let p = pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let frame = FrameRect::new(50, 70, 250, 270);
        let framed = anchor_on_surface(&p, frame, false).expect("anchor");
        let full = anchor_on_surface(&p, frame, true).expect("anchor");
        assert_eq!(full, PointF::new(5.0, 5.0));
        assert_eq!(framed, PointF::new(55.0, 75.0));
    }
}
