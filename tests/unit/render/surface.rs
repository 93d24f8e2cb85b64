use super::*;

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(3, 2);
    assert_eq!(s.data().len(), 24);
    assert!(s.data().iter().all(|&b| b == 0));
    assert_eq!(s.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 0), None);
}

#[test]
fn from_premul_checks_length() {
    assert!(Surface::from_premul(2, 2, vec![0; 15]).is_err());
    Surface::from_premul(2, 2, vec![0; 16]).unwrap();
}

#[test]
fn fill_rect_clips_to_bounds() {
    let mut s = Surface::new(4, 4);
    s.fill_rect(-2, 3, 4, 5, Rgb8::new(9, 8, 7));
    assert_eq!(s.pixel(0, 3), Some([9, 8, 7, 255]));
    assert_eq!(s.pixel(1, 3), Some([9, 8, 7, 255]));
    assert_eq!(s.pixel(2, 3), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(0, 2), Some([0, 0, 0, 0]));
}

#[test]
fn fill_rect_fully_outside_is_noop() {
    let mut s = Surface::new(4, 4);
    s.fill_rect(10, 10, 3, 3, Rgb8::new(1, 1, 1));
    s.fill_rect(-10, -10, 3, 3, Rgb8::new(1, 1, 1));
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn to_rgba_image_unpremultiplies() {
    let s = Surface::from_premul(1, 1, vec![50, 25, 100, 128]).unwrap();
    let img = s.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [100, 50, 199, 128]);
}
