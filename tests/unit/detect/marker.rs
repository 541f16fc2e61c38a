use super::*;

fn canvas(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
}

fn fill(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, c: [u8; 4]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, Rgba(c));
        }
    }
}

#[test]
fn no_marker_pixels_is_none() {
    let img = canvas(16, 16);
    assert_eq!(detect_region(&img, &MarkerColor::GREEN), None);
    assert_eq!(count_matches(&img, &MarkerColor::GREEN), 0);
}

#[test]
fn single_square_bounding_box() {
    let mut img = canvas(40, 30);
    fill(&mut img, 5, 7, 10, 12, [0, 255, 0, 255]);
    let r = detect_region(&img, &MarkerColor::GREEN).unwrap();
    assert_eq!(r, Region::new(5, 7, 10, 12).unwrap());
    assert!(r.fits_within(40, 30));
    assert_eq!(count_matches(&img, &MarkerColor::GREEN), 120);
}

#[test]
fn disjoint_blobs_merge_into_one_box() {
    let mut img = canvas(50, 50);
    fill(&mut img, 2, 3, 4, 4, [0, 255, 0, 255]);
    fill(&mut img, 40, 30, 5, 6, [0, 255, 0, 255]);
    let r = detect_region(&img, &MarkerColor::GREEN).unwrap();
    assert_eq!(r, Region::new(2, 3, 43, 33).unwrap());
}

#[test]
fn tolerance_accepts_palette_drift_but_not_other_markers() {
    let mut img = canvas(20, 20);
    fill(&mut img, 0, 0, 2, 2, [40, 230, 60, 255]);
    fill(&mut img, 10, 10, 3, 3, [255, 0, 255, 255]);

    let green = detect_region(&img, &MarkerColor::GREEN).unwrap();
    assert_eq!(green, Region::new(0, 0, 2, 2).unwrap());

    let magenta = detect_region(&img, &MarkerColor::MAGENTA).unwrap();
    assert_eq!(magenta, Region::new(10, 10, 3, 3).unwrap());
}

#[test]
fn boundary_values_are_exclusive() {
    let on_edge = Rgba([100, 200, 99, 255]);
    assert!(!MarkerColor::GREEN.matches(&on_edge));
    let inside = Rgba([99, 201, 99, 255]);
    assert!(MarkerColor::GREEN.matches(&inside));
}

#[test]
fn from_rgb_builds_directional_rules() {
    let m = MarkerColor::from_rgb([0, 0, 255], 50);
    assert_eq!(m.r, ChannelRule::Below(50));
    assert_eq!(m.g, ChannelRule::Below(50));
    assert_eq!(m.b, ChannelRule::Above(205));
    assert!(m.matches(&Rgba([10, 20, 250, 0])));
}
