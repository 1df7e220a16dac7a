use tabula_model::{Coord, RangeRef};

fn r(s: &str) -> RangeRef {
    RangeRef::from_a1(s).unwrap()
}

const SAMPLES: &[&str] = &[
    "A1:A1",
    "A1:C3",
    "B2:D4",
    "C3:C9",
    "D4:E5",
    "A10:XFD10",
    "AA1:AB1048576",
];

#[test]
fn every_range_contains_and_overlaps_itself() {
    for s in SAMPLES {
        let x = r(s);
        assert!(x.contains(x), "{s} should contain itself");
        assert!(x.overlaps_with(x), "{s} should overlap itself");
        assert_eq!(x.overlap(x), Some(x));
    }
}

#[test]
fn overlap_test_is_symmetric() {
    for a in SAMPLES {
        for b in SAMPLES {
            let (a, b) = (r(a), r(b));
            assert_eq!(
                a.overlaps_with(b),
                b.overlaps_with(a),
                "overlaps_with({a}, {b}) is not symmetric"
            );
        }
    }
}

#[test]
fn overlap_region_is_contained_by_both_sides() {
    for a in SAMPLES {
        for b in SAMPLES {
            let (a, b) = (r(a), r(b));
            match a.overlap(b) {
                Some(region) => {
                    assert!(a.overlaps_with(b));
                    assert!(a.contains(region), "{a} does not contain overlap {region}");
                    assert!(b.contains(region), "{b} does not contain overlap {region}");
                }
                None => assert!(!a.overlaps_with(b)),
            }
        }
    }
}

#[test]
fn parse_display_round_trip() {
    for s in ["A1", "C3", "A1:B2", "AA10:AB12", "B2:A1", "$A$1:$B$2"] {
        let parsed = r(s);
        let reparsed = RangeRef::from_a1(&parsed.to_string()).unwrap();
        assert_eq!(parsed, reparsed, "round trip changed {s}");
    }
}

#[test]
fn coordinate_a1_round_trip() {
    for (col, row) in [(1, 1), (26, 9), (27, 10), (702, 99), (703, 1), (16_384, 1_048_576)] {
        let c = Coord::new(col, row);
        assert_eq!(Coord::from_a1(&c.to_a1()).unwrap(), c);
    }
}

#[test]
fn single_cell_ranges_collapse_cleanly() {
    let cell = r("D4");
    assert!(cell.is_single_cell());
    assert_eq!(cell.width(), 1);
    assert_eq!(cell.height(), 1);
    assert_eq!(cell.top_left, cell.bottom_right);
    assert_eq!(cell.top_right(), cell.bottom_left());
}
