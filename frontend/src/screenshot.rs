use std::path::PathBuf;

/// Write an RGB24 framebuffer as a PNG next to the working directory,
/// named by an incrementing counter.
pub fn save(rgb: &[u8], width: u32, height: u32) -> std::io::Result<PathBuf> {
    let mut counter = 0u32;
    let path = loop {
        let candidate = PathBuf::from(format!("arnold-{counter:03}.png"));
        if !candidate.exists() {
            break candidate;
        }
        counter += 1;
    };

    let file = std::fs::File::create(&path)?;
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    writer
        .write_image_data(rgb)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(path)
}
