use super::*;

#[test]
fn fill_rect_clips_to_bounds() {
    let mut r = Raster::filled(4, 3, 0);
    r.fill_rect(2, 1, 10, 10, 200);
    assert_eq!(r.pixel(1, 1), [0, 0, 0]);
    assert_eq!(r.pixel(2, 1), [200, 200, 200]);
    assert_eq!(r.pixel(3, 2), [200, 200, 200]);
    assert_eq!(r.pixel(3, 0), [0, 0, 0]);
}

#[test]
fn fill_rect_outside_is_a_no_op() {
    let mut r = Raster::filled(2, 2, 7);
    r.fill_rect(5, 5, 3, 3, 0);
    assert!(r.data.iter().all(|&v| v == 7));
}

#[test]
fn invert_swaps_levels() {
    let mut r = Raster::filled(2, 1, 0);
    r.set_gray(1, 0, 255);
    r.invert();
    assert_eq!(r.pixel(0, 0), [255, 255, 255]);
    assert_eq!(r.pixel(1, 0), [0, 0, 0]);
}

#[test]
fn png_round_trips_through_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("00000.png");
    let mut r = Raster::filled(3, 2, 0);
    r.set_gray(2, 1, 255);
    r.save_png(&path).unwrap();

    let back = image::open(&path).unwrap().to_rgb8();
    assert_eq!(back.dimensions(), (3, 2));
    assert_eq!(back.into_raw(), r.data);
}

#[test]
fn empty_raster_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let err = Raster::filled(0, 5, 0)
        .save_png(&dir.path().join("x.png"))
        .unwrap_err();
    assert!(matches!(err, MezzError::Io(_)));
}
