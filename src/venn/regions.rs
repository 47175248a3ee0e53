//! Set membership regions and the shapes that draw them.
//!
//! Shapes live in a unit square with the y axis pointing up. A region is
//! identified by a bit mask: bit `i` is set when the region lies inside
//! shape `i`.

use std::collections::{BTreeMap, HashMap};

use super::NamedSet;

/// Samples per side when locating region label anchors.
const ANCHOR_GRID: usize = 120;

/// Elements that belong to exactly the sets in `mask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub mask: u8,
    pub members: Vec<String>,
}

impl Region {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Indices of the sets this region belongs to.
    pub fn sets(&self) -> Vec<usize> {
        (0..8).filter(|bit| self.mask & (1 << bit) != 0).collect()
    }
}

/// Partition the distinct elements of `sets` into regions.
///
/// Returns one region per non-zero mask (`1..2^n`), empty ones included.
/// Members keep first-seen order across the sets.
pub fn partition(sets: &[NamedSet]) -> Vec<Region> {
    let mut masks: HashMap<&str, u8> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for (index, set) in sets.iter().enumerate() {
        for element in &set.elements {
            let mask = masks.entry(element.as_str()).or_insert_with(|| {
                order.push(element.as_str());
                0
            });
            *mask |= 1 << index;
        }
    }

    let mut regions = (1..(1u8 << sets.len()))
        .map(|mask| Region {
            mask,
            members: Vec::new(),
        })
        .collect::<Vec<_>>();
    for element in order {
        let mask = masks[element];
        regions[usize::from(mask) - 1].members.push(element.to_string());
    }
    regions
}

/// An ellipse rotated counter-clockwise by `rotation` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

impl Ellipse {
    const fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            cx,
            cy,
            rx: r,
            ry: r,
            rotation: 0.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let (dx, dy) = (x - self.cx, y - self.cy);
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        (u / self.rx).powi(2) + (v / self.ry).powi(2) <= 1.0
    }
}

/// Shapes and label positions for one set count.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shapes: Vec<Ellipse>,
    pub labels: Vec<(f64, f64)>,
}

impl Geometry {
    /// Circles for two and three sets, the four-ellipse layout for four.
    pub fn for_set_count(count: usize) -> Option<Self> {
        let (shapes, labels) = match count {
            2 => (
                vec![Ellipse::circle(0.35, 0.5, 0.3), Ellipse::circle(0.65, 0.5, 0.3)],
                vec![(0.30, 0.86), (0.70, 0.86)],
            ),
            3 => (
                vec![
                    Ellipse::circle(0.38, 0.6, 0.25),
                    Ellipse::circle(0.62, 0.6, 0.25),
                    Ellipse::circle(0.5, 0.4, 0.25),
                ],
                vec![(0.28, 0.93), (0.72, 0.93), (0.50, 0.07)],
            ),
            4 => {
                let ellipse = |cx, cy, rotation| Ellipse {
                    cx,
                    cy,
                    rx: 0.40,
                    ry: 0.24,
                    rotation,
                };
                (
                    vec![
                        ellipse(0.40, 0.45, 135.0),
                        ellipse(0.50, 0.55, 135.0),
                        ellipse(0.50, 0.55, 45.0),
                        ellipse(0.60, 0.45, 45.0),
                    ],
                    vec![(0.10, 0.80), (0.26, 0.94), (0.74, 0.94), (0.90, 0.80)],
                )
            }
            _ => return None,
        };
        Some(Self { shapes, labels })
    }

    /// Mask of the shapes containing `(x, y)`.
    pub fn mask_at(&self, x: f64, y: f64) -> u8 {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| shape.contains(x, y))
            .fold(0, |mask, (index, _)| mask | (1 << index))
    }

    /// A point inside each region, keyed by mask.
    ///
    /// The grid sample closest to the region's centroid is used, so the
    /// anchor lies inside the region even when the region is not convex.
    pub fn region_anchors(&self) -> BTreeMap<u8, (f64, f64)> {
        let mut samples: BTreeMap<u8, Vec<(f64, f64)>> = BTreeMap::new();
        for i in 0..ANCHOR_GRID {
            for j in 0..ANCHOR_GRID {
                let x = (i as f64 + 0.5) / ANCHOR_GRID as f64;
                let y = (j as f64 + 0.5) / ANCHOR_GRID as f64;
                let mask = self.mask_at(x, y);
                if mask != 0 {
                    samples.entry(mask).or_default().push((x, y));
                }
            }
        }

        samples
            .into_iter()
            .filter_map(|(mask, points)| {
                let n = points.len() as f64;
                let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
                let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
                let closest = points.into_iter().min_by(|a, b| {
                    let da = (a.0 - cx).powi(2) + (a.1 - cy).powi(2);
                    let db = (b.0 - cx).powi(2) + (b.1 - cy).powi(2);
                    da.total_cmp(&db)
                })?;
                Some((mask, closest))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str, elements: &[&str]) -> NamedSet {
        NamedSet {
            name: name.to_string(),
            elements: elements.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    #[test]
    fn test_partition_assigns_exclusive_regions() {
        let sets = vec![
            set("Set1", &["A", "B", "C"]),
            set("Set2", &["B", "C", "D", "E"]),
            set("Set3", &["A", "E", "F"]),
        ];
        let regions = partition(&sets);

        assert_eq!(regions.len(), 7);
        let members = |mask: u8| regions[usize::from(mask) - 1].members.clone();
        assert_eq!(members(0b001), Vec::<String>::new());
        assert_eq!(members(0b011), vec!["B", "C"]);
        assert_eq!(members(0b101), vec!["A"]);
        assert_eq!(members(0b010), vec!["D"]);
        assert_eq!(members(0b110), vec!["E"]);
        assert_eq!(members(0b100), vec!["F"]);
        assert_eq!(members(0b111), Vec::<String>::new());
        assert_eq!(regions.iter().map(Region::count).sum::<usize>(), 6);
    }

    #[test]
    fn test_partition_ignores_duplicate_elements() {
        let sets = vec![set("a", &["x", "x", "y"]), set("b", &["y", "y"])];
        let regions = partition(&sets);
        assert_eq!(regions[0].members, vec!["x"]);
        assert!(regions[1].members.is_empty());
        assert_eq!(regions[2].members, vec!["y"]);
        assert_eq!(regions[2].sets(), vec![0, 1]);
    }

    #[test]
    fn test_geometry_exists_only_for_supported_counts() {
        for count in [2, 3, 4] {
            let geometry = Geometry::for_set_count(count).unwrap();
            assert_eq!(geometry.shapes.len(), count);
            assert_eq!(geometry.labels.len(), count);
        }
        assert!(Geometry::for_set_count(1).is_none());
        assert!(Geometry::for_set_count(5).is_none());
    }

    #[test]
    fn test_every_region_has_an_anchor_inside_it() {
        for count in [2usize, 3, 4] {
            let geometry = Geometry::for_set_count(count).unwrap();
            let anchors = geometry.region_anchors();
            assert_eq!(anchors.len(), (1 << count) - 1, "{count} sets");
            for (mask, (x, y)) in anchors {
                assert_eq!(geometry.mask_at(x, y), mask);
            }
        }
    }

    #[test]
    fn test_rotated_ellipse_contains_points_along_major_axis() {
        let ellipse = Ellipse {
            cx: 0.5,
            cy: 0.5,
            rx: 0.4,
            ry: 0.1,
            rotation: 45.0,
        };
        assert!(ellipse.contains(0.7, 0.7));
        assert!(!ellipse.contains(0.7, 0.3));
    }
}
