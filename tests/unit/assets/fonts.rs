use super::*;

#[test]
fn empty_book_resolves_nothing() {
    let mut book = FontBook::new(false, &[]);
    assert_eq!(book.face_count(), 0);
    assert!(book.resolve("Noto Sans JP Black").is_none());
}

#[test]
fn missing_font_dir_is_ignored() {
    let book = FontBook::new(false, &[PathBuf::from("/no/such/font/dir")]);
    assert_eq!(book.face_count(), 0);
}

#[test]
fn unknown_family_falls_back_when_any_face_exists() {
    let mut book = FontBook::new(true, &[]);
    if book.face_count() == 0 {
        return;
    }
    let f = book
        .resolve("Definitely Not An Installed Family 9f2c")
        .expect("fallback face");
    assert!(f.fallback);
    assert!(!f.family.is_empty());
}

#[test]
fn generic_candidates_prefer_proportional_sans() {
    let names = [
        "DejaVu Sans",
        "DejaVu Sans Mono",
        "DejaVu Serif",
        "Liberation Mono",
    ];
    assert_eq!(
        generic_candidates(&names),
        (Some("DejaVu Sans"), Some("DejaVu Serif"))
    );

    let names = ["Fira Sans Mono", "Microsoft Sans Serif", "Noto Serif CJK JP"];
    assert_eq!(
        generic_candidates(&names),
        (Some("Microsoft Sans Serif"), Some("Noto Serif CJK JP"))
    );

    assert_eq!(generic_candidates(&["Courier"]), (None, None));
}

#[test]
fn fallback_choice_is_stable_across_books() {
    let mut first = FontBook::new(true, &[]);
    if first.face_count() == 0 {
        return;
    }
    let mut second = FontBook::new(true, &[]);
    let requested = "Definitely Not An Installed Family 9f2c";
    let a = first.resolve(requested).expect("fallback face");
    let b = second.resolve(requested).expect("fallback face");
    assert_eq!(a.family, b.family);
}
