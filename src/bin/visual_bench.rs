use anyhow::Context;
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};
use whitekey::{key_out_white, Png, WHITE_THRESHOLD};

// Sweeps the PngSuite images (dropped into tests/png-suite/) through the
// keying pass and writes before/after pairs into benchmark/ for eyeballing.
// Files starting with 'x' are the suite's deliberately broken ones.
fn main() -> anyhow::Result<()> {
    let output_dir = Path::new("benchmark");
    fs::create_dir_all(output_dir).context("Failed to create benchmark folder")?;
    let test_images = fs::read_dir("tests/png-suite/")
        .context("Failed to read png-suite folder")?
        .filter_map(|entry| entry.ok())
        .filter(|p| {
            let path = p.path();
            path.is_file()
                && path.extension() == Some(OsStr::new("png"))
                && !path
                    .file_name()
                    .and_then(|file_name| file_name.to_str())
                    .map(|file_name| file_name.starts_with('x'))
                    .unwrap_or(true)
        });
    let mut processed_images = Vec::with_capacity(test_images.size_hint().1.unwrap_or(50));

    for image in test_images {
        let image_path = image.path();
        let test_name = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .context("Test image has an unreadable name")?
            .to_owned();
        let orig_name = PathBuf::from(format!("{test_name}-orig.png"));
        let keyed_name = PathBuf::from(format!("{test_name}-keyed.png"));
        fs::copy(&image_path, output_dir.join(orig_name))
            .context(format!("Failed to copy {}", image_path.display()))?;
        let mut png = Png::decode(&fs::read(&image_path)?)
            .context(format!("Failed to decode {}", image_path.display()))?;
        key_out_white(&mut png, WHITE_THRESHOLD);
        fs::write(output_dir.join(keyed_name), png.encode())?;
        processed_images.push(test_name);
    }
    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
    let results = serde_json::json!({
        "date": now,
        "threshold": WHITE_THRESHOLD,
        "processed_images": processed_images,
    });
    fs::write(output_dir.join("test_results.json"), results.to_string())?;
    Ok(())
}
