use anyhow::{Context, Result};
use image::DynamicImage;

pub fn get_env(key: &str) -> Result<String> {
    std::env::var(key).context(format!("getting env variable `{key}`"))
}

/// Coarse ASCII rendering, one character per pixel.
pub fn show_image_terminal(img: &DynamicImage) {
    let gray = img.to_luma8();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            let c = (gray.get_pixel(x, y)[0] as f32 / 255.0 * 4.0) as i32;
            let c = match c {
                1 => ".",
                2 => "×",
                3 | 4 => "#",
                _ => " ",
            };
            print!("{c}");
        }
        println!();
    }
}

/// True-color rendering via terminal background cells.
pub fn show_image_terminal_color(img: &DynamicImage) {
    let rgb = img.to_rgb8();
    for y in 0..rgb.height() {
        for x in 0..rgb.width() {
            let p = rgb.get_pixel(x, y);
            let color = termion::color::Rgb(p[0], p[1], p[2]);
            print!("{} ", termion::color::Bg(color));
        }
        println!("{}", termion::color::Bg(termion::color::Reset));
    }
}

/// Pixel statistics over a set of images, in normalized `[0, 1]` units.
#[derive(Debug, Clone, Copy)]
pub struct Stats {
    pub count: usize,
    pub value_range: [f32; 2],
    pub mean: f32,
    pub var: f32,
    pub stddev: f32,
}

impl Stats {
    pub fn from_iter(iter: impl Iterator<Item = DynamicImage>) -> Self {
        let mut s = 0.0;
        let mut s2 = 0.0;
        let mut count = 0;
        let mut value_range = [f32::MAX, f32::MIN];
        for img in iter {
            let rgb = img.to_rgb8();
            let d = rgb.as_raw().len() as f64;
            let mut img_s = 0.0;
            let mut img_s2 = 0.0;
            for &value in rgb.as_raw() {
                let x = value as f32 / 255.0;
                value_range[0] = value_range[0].min(x);
                value_range[1] = value_range[1].max(x);
                img_s += x as f64;
                img_s2 += (x as f64) * (x as f64);
            }
            s += img_s / d;
            s2 += img_s2 / d;
            count += 1;
        }
        let count_f64 = count as f64;
        let mean = s / count_f64;
        let var = (s2 / count_f64) - mean * mean;
        Self {
            count,
            value_range,
            mean: mean as f32,
            var: var as f32,
            stddev: var.sqrt() as f32,
        }
    }
}
