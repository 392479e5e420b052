use super::*;

fn frame_2x1() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![0, 0, 0, 0, 64, 32, 0, 128],
        premultiplied: true,
    }
}

#[test]
fn pixel_lookup_and_bounds() {
    let f = frame_2x1();
    assert_eq!(f.pixel(1, 0), Some([64, 32, 0, 128]));
    assert_eq!(f.pixel(2, 0), None);
    let coords: Vec<(u32, u32)> = f.pixels().map(|(x, y, _)| (x, y)).collect();
    assert_eq!(coords, [(0, 0), (1, 0)]);
}

#[test]
fn transparency_check() {
    let f = frame_2x1();
    assert!(!f.is_fully_transparent());
    let clear = FrameRGBA {
        data: vec![0; 8],
        ..f
    };
    assert!(clear.is_fully_transparent());
}

#[test]
fn to_image_unpremultiplies() {
    let img = frame_2x1().to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [128, 64, 0, 128]);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn save_png_writes_a_decodable_file() {
    let path = std::env::temp_dir()
        .join(format!("telop_frame_{}", std::process::id()))
        .join("f.png");
    frame_2x1().save_png(&path).unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (2, 1));
    let _ = std::fs::remove_file(&path);
}
