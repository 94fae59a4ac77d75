use super::*;
use crate::bitpattern::record::BitPayload;
use crate::bitpattern::template::{CALIBRATION_COLS, MARGIN_COLS_BEFORE, MARGIN_ROWS_BEFORE};

fn res(w: u32, h: u32) -> Resolution {
    Resolution::new(w, h).unwrap()
}

#[test]
fn output_size_follows_reference_ratio() {
    assert_eq!(output_dimensions(res(240, 135)), (106, 6));
    assert_eq!(output_dimensions(res(480, 270)), (212, 12));
    assert_eq!(output_dimensions(res(1920, 1080)), (848, 48));
    assert_eq!(output_dimensions(res(3840, 2160)), (1696, 96));
}

#[test]
fn reference_size_is_identity() {
    let t = BitPatternTemplate::build(BitPayload(0b1011));
    let r = rasterize(&t, res(240, 135));
    for y in 0..6u32 {
        for x in 0..106u32 {
            let expected = t.cell(y as usize, x as usize) * 255;
            assert_eq!(r.pixel(x, y), [expected; 3]);
        }
    }
}

#[test]
fn cells_become_blocks_at_integer_scale() {
    let t = BitPatternTemplate::build(BitPayload(0b1));
    let r = rasterize(&t, res(960, 540));
    // Scale factor 4: payload bit 0 sits at template cell (3, 7).
    let row = (MARGIN_ROWS_BEFORE + 1) as u32;
    let col = (MARGIN_COLS_BEFORE + CALIBRATION_COLS) as u32;
    for dy in 0..4 {
        for dx in 0..4 {
            assert_eq!(r.pixel(col * 4 + dx, row * 4 + dy), [255, 255, 255]);
        }
    }
    assert_eq!(r.pixel((col + 1) * 4, row * 4), [0, 0, 0]);
}

#[test]
fn only_black_and_white_are_emitted() {
    let t = BitPatternTemplate::build(BitPayload(0x5555_aaaa_1234));
    let r = rasterize(&t, res(1280, 720));
    assert!(r.data.iter().all(|&v| v == 0 || v == 255));
    assert_eq!(
        (r.width, r.height),
        output_dimensions(res(1280, 720))
    );
}

#[test]
fn non_integer_ratios_sample_without_overrun() {
    let t = BitPatternTemplate::build(BitPayload(u128::MAX));
    for (w, h) in [(1366, 768), (720, 576), (1, 1), (8191, 4321)] {
        let r = rasterize(&t, res(w, h));
        assert_eq!(r.data.len(), (r.width * r.height * 3) as usize);
    }
}
