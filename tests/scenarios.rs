//! End-to-end decoding and calibration scenarios on synthetic images.

use image::{ImageBuffer, Rgb, RgbImage};
use proptest::prelude::*;

use meterman_lcd::calibration::MovingAverage;
use meterman_lcd::geometry::{BBox, Point};
use meterman_lcd::lcd::table::{lookup, mask_for, CHARACTERS, M_BR, M_TR};
use meterman_lcd::lcd::Digit;
use meterman_lcd::{DecoderOptions, LcdConfig, LcdDecoder};

const BACKGROUND: Rgb<u8> = Rgb([0xE0, 0xE0, 0xE0]);
const INK: Rgb<u8> = Rgb([0x20, 0x20, 0x20]);

fn paint(img: &mut RgbImage, digit: &Digit, mask: u8, dp: bool, ink: Rgb<u8>) {
    for (i, seg) in digit.segments.iter().enumerate() {
        if mask & (1 << i) != 0 {
            for p in &seg.points {
                img.put_pixel(p.x as u32, p.y as u32, ink);
            }
        }
    }
    if dp {
        for p in &digit.dp {
            img.put_pixel(p.x as u32, p.y as u32, ink);
        }
    }
}

fn render(decoder: &LcdDecoder, size: (u32, u32), masks: &[u8], dps: &[bool]) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::from_pixel(size.0, size.1, BACKGROUND);
    for (i, digit) in decoder.digits().iter().enumerate() {
        paint(&mut img, digit, masks[i], dps.get(i).copied().unwrap_or(false), INK);
    }
    img
}

fn masks_for(text: &str) -> Vec<u8> {
    text.chars().map(|c| mask_for(c).unwrap()).collect()
}

/// Template `A` from the seed scenarios, optionally with a decimal point.
fn single_digit(dp: &[i32]) -> LcdDecoder {
    let mut d = LcdDecoder::new(DecoderOptions::default()).unwrap();
    d.add_template("A", &[60, 0, 60, 100, 0, 100], dp, 8).unwrap();
    d.add_digit("A", 0, 0, None).unwrap();
    d
}

#[test]
fn test_s1_calibrate_eight() {
    let mut d = single_digit(&[]);
    let img = render(&d, (80, 110), &[0x7F], &[]);

    d.calibrate_from_image(&img, "8").unwrap();
    let res = d.decode(&img);
    assert_eq!(res.text, "8");
    assert_eq!(res.invalid, 0);
}

#[test]
fn test_s2_decode_one() {
    let mut d = single_digit(&[]);
    d.calibrate_from_image(&render(&d, (80, 110), &[0x7F], &[]), "8").unwrap();

    let img = render(&d, (80, 110), &[M_TR | M_BR], &[]);
    let res = d.decode(&img);
    assert_eq!(res.scans[0].mask, 0x0C);
    assert_eq!(res.text, "1");
    assert_eq!(res.invalid, 0);
}

#[test]
fn test_s3_decimal_point() {
    let mut d = single_digit(&[65, 95]);
    let img = render(&d, (80, 110), &[0x7F], &[true]);
    d.calibrate_from_image(&img, "8").unwrap();

    let res = d.decode(&img);
    assert_eq!(res.text, "8.");
    assert!(res.decodes[0].dp);
}

#[test]
fn test_s4_two_digits() {
    let mut d = single_digit(&[]);
    d.add_digit("A", 80, 0, None).unwrap();

    let img = render(&d, (160, 110), &masks_for("12"), &[]);
    let res = d.decode(&img);
    assert_eq!(res.text, "12");
    assert_eq!(res.invalid, 0);
}

#[test]
fn test_led_display_inverse() {
    let options = DecoderOptions {
        inverse: true,
        ..Default::default()
    };
    let mut d = LcdDecoder::new(options).unwrap();
    d.add_template("A", &[60, 0, 60, 100, 0, 100], &[], 8).unwrap();
    d.add_digit("A", 0, 0, None).unwrap();

    let led = |mask: u8| {
        let mut img: RgbImage = ImageBuffer::from_pixel(80, 110, Rgb([0, 0, 0]));
        paint(&mut img, &d.digits()[0], mask, false, Rgb([255, 255, 255]));
        img
    };
    let eight = led(0x7F);
    let one = led(M_TR | M_BR);

    d.calibrate_from_image(&eight, "8").unwrap();
    let levels = &d.current_levels().digits[0];
    assert_eq!(levels.segments[0].max.value(), 0xFFFF);
    assert_eq!(levels.segments[0].min.value(), 0);

    assert_eq!(d.decode(&eight).text, "8");
    let res = d.decode(&one);
    assert_eq!(res.text, "1");
    assert_eq!(res.invalid, 0);
}

#[test]
fn test_s5_restore_and_pick() {
    let mut d = single_digit(&[]);
    let file = "0,60\n0,0,0,100,900\n1,80\n1,0,0,200,800\n2,40\n2,0,0,300,700\n";

    assert_eq!(d.restore(file.as_bytes()).unwrap(), 3);
    assert!(d.pick_calibration());
    assert_eq!(d.current_levels().quality, 80);
    assert_eq!(d.current_levels().digits[0].segments[0].min.value(), 200);
    assert_eq!(d.population().len(), 2);
    assert!(d.population().iter().all(|s| s.quality != 80));

    assert!(d.pick_calibration());
    assert_eq!(d.current_levels().quality, 60);
    assert_eq!(d.current_levels().digits[0].segments[0].min.value(), 100);
    assert_eq!(d.current_levels().digits[0].segments[0].threshold(), 500);
}

/// Eleven-character panel: a three-letter label in small digits followed by
/// seven slanted digits with decimal points.
fn panel() -> LcdDecoder {
    let json = r#"{
        "templates": [
            { "name": "label", "bb": [36, 0, 36, 60, 0, 60], "width": 6 },
            { "name": "value", "bb": [60, 0, 55, 100, -5, 100], "dp": [62, 95], "width": 8 }
        ],
        "digits": [
            { "template": "label", "x": 10, "y": 40 },
            { "template": "label", "x": 56, "y": 40 },
            { "template": "label", "x": 102, "y": 40 },
            { "template": "value", "x": 160, "y": 5 },
            { "template": "value", "x": 240, "y": 5 },
            { "template": "value", "x": 320, "y": 5 },
            { "template": "value", "x": 400, "y": 5 },
            { "template": "value", "x": 480, "y": 5 },
            { "template": "value", "x": 560, "y": 5 },
            { "template": "value", "x": 640, "y": 5 }
        ]
    }"#;
    let config: LcdConfig = serde_json::from_str(json).unwrap();
    LcdDecoder::from_config(&config).unwrap()
}

const PANEL_SIZE: (u32, u32) = (720, 115);

fn panel_image(d: &LcdDecoder) -> RgbImage {
    let mut dps = vec![false; 10];
    dps[8] = true;
    render(d, PANEL_SIZE, &masks_for("tot0087654"), &dps)
}

#[test]
fn test_panel_calibrated_on_eights() {
    let mut d = panel();
    let eights = render(&d, PANEL_SIZE, &[0x7F; 10], &[true; 10]);
    d.calibrate_from_image(&eights, "8888888888").unwrap();
    assert_eq!(d.decode(&eights).text, "8888.8.8.8.8.8.8.");

    let img = panel_image(&d);
    let res = d.decode(&img);
    assert_eq!(res.text, "tot008765.4");
    assert_eq!(res.invalid, 0);
}

#[test]
fn test_panel_calibrated_on_itself() {
    let mut d = panel();
    let img = panel_image(&d);
    d.calibrate_from_image(&img, "tot0087654").unwrap();

    let res = d.decode(&img);
    assert_eq!(res.text, "tot008765.4");
    d.good();
    d.recalibrate();
    assert_eq!(d.decode(&img).text, "tot008765.4");
}

#[test]
fn test_all_black_and_all_white() {
    let d = single_digit(&[]);
    let black: RgbImage = ImageBuffer::from_pixel(80, 110, Rgb([0, 0, 0]));
    let white: RgbImage = ImageBuffer::from_pixel(80, 110, Rgb([255, 255, 255]));

    let res = d.decode(&black);
    assert_eq!(res.scans[0].mask, 0x7F);
    assert_eq!(res.text, "8");

    let res = d.decode(&white);
    assert_eq!(res.scans[0].mask, 0);
    assert_eq!(res.text, " ");
    assert!(res.decodes[0].valid);
}

#[test]
fn test_character_tables_agree() {
    for &(_, c) in CHARACTERS.iter() {
        let mask = mask_for(c).unwrap();
        assert_eq!(lookup(mask), Some(c));
        let fewest = CHARACTERS
            .iter()
            .filter(|(_, ch)| *ch == c)
            .map(|(m, _)| m.count_ones())
            .min()
            .unwrap();
        assert_eq!(mask.count_ones(), fewest, "{:?}", c);
    }
}

#[test]
fn test_diamond_fixture() {
    let bb = BBox::new(Point::new(10, 5), Point::new(15, 10), Point::new(10, 15), Point::new(5, 10));
    for (x, y) in [(10, 5), (6, 10), (14, 10), (10, 6), (10, 9), (10, 10)] {
        assert!(bb.contains(Point::new(x, y)), "({}, {})", x, y);
    }
    for (x, y) in [(0, 0), (15, 15), (5, 11), (4, 8), (11, 5), (4, 10), (16, 10)] {
        assert!(!bb.contains(Point::new(x, y)), "({}, {})", x, y);
    }
}

#[test]
fn test_save_restore_save() {
    let mut d = panel();
    let img = panel_image(&d);
    d.calibrate_from_image(&img, "tot0087654").unwrap();
    for (good, bad) in [(3, 1), (0, 2), (5, 0), (1, 1)] {
        (0..good).for_each(|_| d.good());
        (0..bad).for_each(|_| d.bad());
        d.recalibrate();
    }

    let mut first = Vec::new();
    let written = d.save(&mut first, d.options().saved_levels).unwrap();
    assert!(written > 1);

    let mut other = panel();
    assert_eq!(other.restore(first.as_slice()).unwrap(), written);
    let mut second = Vec::new();
    other.save(&mut second, other.options().saved_levels).unwrap();
    assert_eq!(String::from_utf8(first).unwrap(), String::from_utf8(second).unwrap());
}

#[test]
fn test_save_restore_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calibration.txt");
    let mut d = single_digit(&[]);
    d.calibrate_from_image(&render(&d, (80, 110), &[0x7F], &[]), "8").unwrap();
    d.good();
    d.recalibrate();

    let written = d.save_to_path(&path).unwrap();
    let mut other = single_digit(&[]);
    assert_eq!(other.restore_from_path(&path).unwrap(), written);
    assert!(other.pick_calibration());
    assert_eq!(other.decode(&render(&other, (80, 110), &[M_TR | M_BR], &[])).text, "1");
}

proptest! {
    #[test]
    fn prop_moving_average_deterministic(
        capacity in 1usize..10,
        values in prop::collection::vec(0i32..0x10000, 1..50),
        split in 0usize..50,
    ) {
        let mut a = MovingAverage::new(capacity);
        let mut b = MovingAverage::new(capacity);
        let split = split.min(values.len());
        for &v in &values[..split] {
            a.add(v);
            b.add(v);
            prop_assert_eq!(a.value(), b.value());
        }

        let snapshot = a.clone();
        let copy_value = snapshot.value();
        for &v in &values[split..] {
            a.add(v);
            b.add(v);
            prop_assert_eq!(a.value(), b.value());
        }
        prop_assert_eq!(snapshot.value(), copy_value);
        prop_assert!(a.len() <= capacity);
    }

    #[test]
    fn prop_square_contains(x in 0i32..16, y in 0i32..16) {
        let bb = BBox::new(Point::new(5, 5), Point::new(10, 5), Point::new(10, 10), Point::new(5, 10));
        let inside = (5..=10).contains(&x) && (5..=10).contains(&y);
        prop_assert_eq!(bb.contains(Point::new(x, y)), inside);
    }

    #[test]
    fn prop_diamond_contains(x in -5i32..25, y in -5i32..25) {
        let bb = BBox::new(Point::new(10, 5), Point::new(15, 10), Point::new(10, 15), Point::new(5, 10));
        let inside = (x - 10).abs() + (y - 10).abs() <= 5;
        prop_assert_eq!(bb.contains(Point::new(x, y)), inside);
    }

    #[test]
    fn prop_extended_diamond_contains(x in -5i32..25, y in -5i32..25) {
        let bb = BBox::new(Point::new(8, 3), Point::new(15, 10), Point::new(10, 15), Point::new(3, 8));
        let inside = (11..=25).contains(&(x + y)) && (-5..=5).contains(&(x - y));
        prop_assert_eq!(bb.contains(Point::new(x, y)), inside);
    }

    #[test]
    fn prop_recalibrate_never_loses_best(
        rounds in prop::collection::vec((0u32..5, 0u32..5), 1..30),
    ) {
        let options = DecoderOptions { max_levels: 4, saved_levels: 4, ..Default::default() };
        let mut d = LcdDecoder::new(options).unwrap();
        d.add_template("A", &[60, 0, 60, 100, 0, 100], &[], 8).unwrap();
        d.add_digit("A", 0, 0, None).unwrap();

        for (good, bad) in rounds {
            let before = d.population().best_quality().unwrap_or(0);
            (0..good).for_each(|_| d.good());
            (0..bad).for_each(|_| d.bad());
            d.recalibrate();

            let quality = d.current_levels().quality;
            prop_assert!(quality >= before);
            prop_assert!(quality >= d.population().best_quality().unwrap_or(0));
            prop_assert!(d.population().len() <= 4);
        }
    }
}
