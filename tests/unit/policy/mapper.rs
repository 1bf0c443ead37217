use super::*;

#[test]
fn in_range_is_identity_under_every_policy() {
    for policy in OverflowPolicy::ALL {
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(
                    map_coordinate(x, y, 5, 3, policy).unwrap(),
                    Mapped::At(x as u32, y as u32)
                );
            }
        }
    }
}

#[test]
fn wrap_uses_floored_modulo() {
    let p = OverflowPolicy::Wrap;
    assert_eq!(map_coordinate(-1, 0, 10, 10, p).unwrap(), Mapped::At(9, 0));
    assert_eq!(map_coordinate(10, 0, 10, 10, p).unwrap(), Mapped::At(0, 0));
    assert_eq!(map_coordinate(-21, 35, 10, 10, p).unwrap(), Mapped::At(9, 5));
}

#[test]
fn mirror_flips_odd_replicas() {
    let p = OverflowPolicy::Mirror;
    assert_eq!(map_coordinate(4, 0, 4, 4, p).unwrap(), Mapped::At(3, 0));
    assert_eq!(map_coordinate(-1, 0, 4, 4, p).unwrap(), Mapped::At(0, 0));
    assert_eq!(map_coordinate(7, 0, 4, 4, p).unwrap(), Mapped::At(0, 0));
    assert_eq!(map_coordinate(8, 0, 4, 4, p).unwrap(), Mapped::At(0, 0));
    assert_eq!(map_coordinate(-5, 0, 4, 4, p).unwrap(), Mapped::At(3, 0));
}

#[test]
fn mirror_axes_are_independent() {
    let p = OverflowPolicy::Mirror;
    assert_eq!(map_coordinate(1, 5, 4, 4, p).unwrap(), Mapped::At(1, 2));
    assert_eq!(map_coordinate(5, 9, 4, 4, p).unwrap(), Mapped::At(2, 1));
}

#[test]
fn mirror_tiling_has_no_seams() {
    // Walking across a tile boundary repeats the edge pixel once and then reverses.
    let xs: Vec<u32> = (-4..12)
        .map(|x| match map_coordinate(x, 0, 4, 1, OverflowPolicy::Mirror).unwrap() {
            Mapped::At(x, _) => x,
            Mapped::Discard => unreachable!(),
        })
        .collect();
    assert_eq!(
        xs,
        vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0, 0, 1, 2, 3]
    );
}

#[test]
fn error_policy_reports_coordinates() {
    let err = map_coordinate(-1, 0, 4, 4, OverflowPolicy::Error).unwrap_err();
    assert!(matches!(
        err,
        RasterError::OutOfBounds {
            x: -1,
            y: 0,
            width: 4,
            height: 4
        }
    ));
}

#[test]
fn discard_policy_never_errors() {
    assert_eq!(
        map_coordinate(-1, 0, 4, 4, OverflowPolicy::Discard).unwrap(),
        Mapped::Discard
    );
    assert_eq!(
        map_coordinate(i64::MAX, i64::MIN, 4, 4, OverflowPolicy::Discard).unwrap(),
        Mapped::Discard
    );
}
