use crate::domain::Column;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        [
            Point::new(self.x, self.y),
            Point::new(right, self.y),
            Point::new(self.x, bottom),
            Point::new(right, bottom),
        ]
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Droppable region of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    pub column: Column,
    pub rect: Rect,
}

/// Pick the zone whose corners are nearest the dragged rect's corners.
///
/// Each zone scores the mean distance between corresponding corners; the
/// lowest score wins and the first zone wins ties. Tolerates partial overlap
/// better than containment of the pointer.
pub fn closest_corners(active: &Rect, zones: &[DropZone]) -> Option<Column> {
    let from = active.corners();
    let mut best: Option<(f64, Column)> = None;
    for zone in zones {
        let to = zone.rect.corners();
        let score = from
            .iter()
            .zip(to.iter())
            .map(|(a, b)| a.distance(*b))
            .sum::<f64>()
            / 4.0;
        match best {
            Some((s, _)) if s <= score => {}
            _ => best = Some((score, zone.column)),
        }
    }
    best.map(|(_, column)| column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes() -> Vec<DropZone> {
        Column::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| DropZone {
                column: *c,
                rect: Rect::new(i as f64 * 100.0, 0.0, 100.0, 400.0),
            })
            .collect()
    }

    #[test]
    fn card_inside_a_lane_picks_it() {
        let card = Rect::new(110.0, 20.0, 80.0, 40.0);
        assert_eq!(closest_corners(&card, &lanes()), Some(Column::InProgress));
    }

    #[test]
    fn straddling_card_picks_lane_with_nearer_corners() {
        let card = Rect::new(230.0, 20.0, 80.0, 40.0);
        assert_eq!(closest_corners(&card, &lanes()), Some(Column::Review));
        let card = Rect::new(140.0, 20.0, 80.0, 40.0);
        assert_eq!(closest_corners(&card, &lanes()), Some(Column::InProgress));
    }

    #[test]
    fn ties_go_to_first_zone() {
        let zones = [
            DropZone {
                column: Column::Todo,
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
            DropZone {
                column: Column::Done,
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
        ];
        let card = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(closest_corners(&card, &zones), Some(Column::Todo));
    }

    #[test]
    fn no_zones_no_target() {
        assert_eq!(closest_corners(&Rect::default(), &[]), None);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }
}
