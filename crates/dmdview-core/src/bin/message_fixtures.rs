use std::fs;
use std::path::{Path, PathBuf};

const TAG_TERMINATOR: u8 = 0x00;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_basic_fixtures(&root.join("basic").join("messages"))?;
    write_palette_fixtures(&root.join("palette").join("messages"))?;
    write_rows_fixtures(&root.join("rows").join("messages"))?;
    Ok(())
}

fn write_basic_fixtures(dir: &Path) -> Result<(), String> {
    let frame = gray_planes(1, &[0xA5, 0xC3]);
    let repeat = gray_planes(2, &[0xA5, 0xC3]);
    let mut truncated = ints(&[8]);
    truncated.extend_from_slice(&[0x01, 0x00, 0x00]);
    let mut short_rgb = ints(&[3]);
    short_rgb.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);

    write_messages(
        dir,
        &[
            ("01_game_name.bin", string_message("gameName", "afm_113b")),
            ("02_dimensions.bin", message("dimensions", &ints(&[8, 1]))),
            ("03_color.bin", message("color", &ints(&[0x00FF_0000]))),
            ("04_gray2.bin", message("gray2Planes", &frame)),
            ("05_gray2_repeat.bin", message("gray2Planes", &repeat)),
            ("06_unknown.bin", message("bogus", &[0x01, 0x02, 0x03])),
            ("07_truncated_dimensions.bin", message("dimensions", &truncated)),
            ("08_short_rgb24.bin", message("rgb24", &short_rgb)),
        ],
    )
}

fn write_palette_fixtures(dir: &Path) -> Result<(), String> {
    let grays: Vec<i32> = (0..8).map(|i| i * 0x0011_1111).collect();
    let mut coloured = ints(&[4, 4, 0x0000_0000, 0x0000_00FF, 0x0000_FF00, 0x00FF_0000]);
    coloured.extend_from_slice(&[0xFF, 0x00]);
    let mut short_palette = ints(&[5, 2, 0x0000_00FF, 0x0000_FF00]);
    short_palette.extend_from_slice(&[0xFF, 0x00, 0x00, 0x00]);

    write_messages(
        dir,
        &[
            ("01_dimensions.bin", message("dimensions", &ints(&[8, 1]))),
            ("02_palette.bin", message("palette", &palette(&grays))),
            ("03_gray2.bin", message("gray2Planes", &gray_planes(1, &[0xA5, 0xC3]))),
            ("04_clear_palette.bin", message("clearPalette", &[])),
            ("05_coloured_gray2.bin", message("coloredGray2", &coloured)),
            ("06_short_palette.bin", message("coloredGray4", &short_palette)),
        ],
    )
}

fn write_rows_fixtures(dir: &Path) -> Result<(), String> {
    let pixels: [u32; 8] = [
        0xFF0000, 0x00FF00, 0x0000FF, 0x000000, 0xFFFFFF, 0x000000, 0x123456, 0x000001,
    ];
    let mut rgb = ints(&[0]);
    for pixel in pixels {
        let [_, r, g, b] = pixel.to_be_bytes();
        rgb.extend_from_slice(&[b, g, r]);
    }

    write_messages(
        dir,
        &[
            ("01_dimensions.bin", message("dimensions", &ints(&[4, 2]))),
            ("02_rgb24.bin", message("rgb24", &rgb)),
        ],
    )
}

fn write_messages(dir: &Path, messages: &[(&str, Vec<u8>)]) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;
    for (name, bytes) in messages {
        let path = dir.join(name);
        fs::write(&path, bytes)
            .map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    }
    Ok(())
}

fn message(tag: &str, payload: &[u8]) -> Vec<u8> {
    let mut bytes = tag.as_bytes().to_vec();
    bytes.push(TAG_TERMINATOR);
    bytes.extend_from_slice(payload);
    bytes
}

fn string_message(tag: &str, value: &str) -> Vec<u8> {
    let mut payload = value.as_bytes().to_vec();
    payload.push(TAG_TERMINATOR);
    message(tag, &payload)
}

fn gray_planes(timestamp: i32, planes: &[u8]) -> Vec<u8> {
    let mut payload = ints(&[timestamp]);
    payload.extend_from_slice(planes);
    payload
}

fn palette(colours: &[i32]) -> Vec<u8> {
    let mut payload = ints(&[colours.len() as i32]);
    payload.extend_from_slice(&ints(colours));
    payload
}

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
