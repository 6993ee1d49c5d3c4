use std::fs;
use std::path::Path;

use whitekey::{remove_white_background, Error, Pixel, Png, WHITE_THRESHOLD};

fn write_png(path: &Path, width: u32, height: u32, pixels: Vec<Pixel>) {
    let png = Png::from_pixels(width, height, pixels).unwrap();
    fs::write(path, png.encode()).unwrap();
}

#[test]
fn keys_white_and_keeps_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.png");
    write_png(
        &input,
        2,
        1,
        vec![Pixel::new(255, 255, 255, 255), Pixel::new(10, 10, 10, 255)],
    );

    remove_white_background(&input, &output, WHITE_THRESHOLD).unwrap();

    let result = Png::decode(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(result.width(), 2);
    assert_eq!(result.height(), 1);
    assert_eq!(
        result.pixels(),
        &[Pixel::new(255, 255, 255, 0), Pixel::new(10, 10, 10, 255)]
    );
}

#[test]
fn the_cutoff_is_strict_and_alpha_survives() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.png");
    write_png(
        &input,
        3,
        1,
        vec![
            Pixel::new(200, 200, 200, 255),
            Pixel::new(201, 201, 201, 255),
            Pixel::new(250, 250, 199, 128),
        ],
    );

    remove_white_background(&input, &output, WHITE_THRESHOLD).unwrap();

    let result = Png::decode(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(
        result.pixels(),
        &[
            Pixel::new(200, 200, 200, 255),
            Pixel::new(255, 255, 255, 0),
            Pixel::new(250, 250, 199, 128),
        ]
    );
}

#[test]
fn missing_input_reports_the_path_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("does-not-exist.png");
    let output = dir.path().join("output.png");

    let err = remove_white_background(&input, &output, WHITE_THRESHOLD).unwrap_err();
    match err {
        Error::InputNotFound(path) => assert_eq!(path, input),
        other => panic!("expected InputNotFound, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn garbage_input_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.png");
    fs::write(&input, b"not a png at all").unwrap();

    let err = remove_white_background(&input, &output, WHITE_THRESHOLD).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(!output.exists());
}

#[test]
fn running_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let once = dir.path().join("once.png");
    let twice = dir.path().join("twice.png");
    write_png(
        &input,
        2,
        2,
        vec![
            Pixel::new(255, 255, 255, 255),
            Pixel::new(210, 255, 230, 40),
            Pixel::new(0, 0, 0, 255),
            Pixel::new(200, 200, 200, 200),
        ],
    );

    remove_white_background(&input, &once, WHITE_THRESHOLD).unwrap();
    remove_white_background(&once, &twice, WHITE_THRESHOLD).unwrap();

    let first = Png::decode(&fs::read(&once).unwrap()).unwrap();
    let second = Png::decode(&fs::read(&twice).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn an_existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.png");
    write_png(&input, 1, 1, vec![Pixel::new(255, 255, 255, 255)]);
    fs::write(&output, b"stale bytes").unwrap();

    remove_white_background(&input, &output, WHITE_THRESHOLD).unwrap();

    let result = Png::decode(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(result.pixels(), &[Pixel::new(255, 255, 255, 0)]);
}

#[test]
fn no_temporary_files_are_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.png");
    write_png(&input, 1, 1, vec![Pixel::new(1, 2, 3, 4)]);

    remove_white_background(&input, &output, WHITE_THRESHOLD).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 2, "left over: {entries:?}");
}
