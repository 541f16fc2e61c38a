use super::*;

#[test]
fn region_rejects_empty_sizes() {
    assert!(Region::new(0, 0, 0, 4).is_err());
    assert!(Region::new(0, 0, 4, 0).is_err());
    assert!(Region::new(3, 3, 1, 1).is_ok());
}

#[test]
fn region_edges_are_exclusive() {
    let r = Region::new(2, 3, 4, 5).unwrap();
    assert_eq!((r.right(), r.bottom()), (6, 8));
}

#[test]
fn region_fits_within_frame() {
    let r = Region::new(10, 10, 20, 20).unwrap();
    assert!(r.fits_within(30, 30));
    assert!(!r.fits_within(29, 30));
}
