extern crate anyhow;
extern crate image;
extern crate imageproc;
extern crate rusttype;
extern crate std;

use anyhow::Context;

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Thin,
    Bold,
}

/// A fixed-size pixel panel. Drawing goes to a back buffer; `swap`
/// presents it. Text is positioned by its baseline.
pub trait DisplaySurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn clear(&mut self);
    fn draw_pixel(&mut self, x: i32, y: i32, color: config::Color);
    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: config::Color);
    fn draw_text(&mut self, font: Font, x: i32, y: i32, color: config::Color, text: &str);
    fn swap(&mut self) -> anyhow::Result<()>;
}

// Pixel heights, matching the 4x6 / 5x8 bitmap fonts the panel uses.
const THIN_FONT_PX: f32 = 6.0;
const BOLD_FONT_PX: f32 = 8.0;

pub struct Fonts {
    pub thin: Option<rusttype::Font<'static>>,
    pub bold: Option<rusttype::Font<'static>>,
}

impl Fonts {
    #[cfg(test)]
    pub fn none() -> Fonts {
        return Fonts { thin: None, bold: None };
    }

    pub fn from_config(config: &config::Config) -> anyhow::Result<Fonts> {
        let thin = match config.font_thin {
            Some(ref path) => Some(load_font(path)?),
            None => None,
        };
        let bold = match config.font_bold {
            Some(ref path) => Some(load_font(path)?),
            None => None,
        };
        if thin.is_none() || bold.is_none() {
            warn!("No font configured for some text, it will not be drawn");
        }
        return Ok(Fonts { thin: thin, bold: bold });
    }
}

fn load_font(path: &std::path::Path) -> anyhow::Result<rusttype::Font<'static>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading font '{}'", path.display()))?;
    return rusttype::Font::try_from_vec(bytes)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not a usable font", path.display()));
}

/// Software stand-in for the LED matrix. Frames are rendered into an RGB
/// image; whenever a swapped-in frame differs from the one on "screen" it is
/// written to `png_out`, if set.
pub struct ImageSurface {
    back: image::RgbImage,
    front: image::RgbImage,
    fonts: Fonts,
    brightness: u8,
    png_out: Option<std::path::PathBuf>,
    frames_written: u64,
}

impl ImageSurface {
    pub fn new(panel: &config::PanelConfig, fonts: Fonts, png_out: Option<std::path::PathBuf>) -> ImageSurface {
        return ImageSurface {
            back: image::RgbImage::new(panel.cols, panel.rows),
            front: image::RgbImage::new(panel.cols, panel.rows),
            fonts: fonts,
            brightness: std::cmp::min(panel.brightness, 100),
            png_out: png_out,
            frames_written: 0,
        };
    }

    #[cfg(test)]
    pub fn front(&self) -> &image::RgbImage {
        return &self.front;
    }

    #[cfg(test)]
    pub fn frames_written(&self) -> u64 {
        return self.frames_written;
    }

    fn pixel(&self, color: config::Color) -> image::Rgb<u8> {
        let scale = |c: u8| (c as u32 * self.brightness as u32 / 100) as u8;
        return image::Rgb([scale(color.0), scale(color.1), scale(color.2)]);
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        return x >= 0 && y >= 0 && (x as u32) < self.back.width() && (y as u32) < self.back.height();
    }
}

impl DisplaySurface for ImageSurface {
    fn width(&self) -> u32 {
        return self.back.width();
    }

    fn height(&self) -> u32 {
        return self.back.height();
    }

    fn clear(&mut self) {
        for p in self.back.pixels_mut() {
            *p = image::Rgb([0, 0, 0]);
        }
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: config::Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let pixel = self.pixel(color);
        self.back.put_pixel(x as u32, y as u32, pixel);
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: config::Color) {
        let pixel = self.pixel(color);
        imageproc::drawing::draw_line_segment_mut(
            &mut self.back,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            pixel);
    }

    fn draw_text(&mut self, font: Font, x: i32, y: i32, color: config::Color, text: &str) {
        let pixel = self.pixel(color);
        let (face, px) = match font {
            Font::Thin => (self.fonts.thin.as_ref(), THIN_FONT_PX),
            Font::Bold => (self.fonts.bold.as_ref(), BOLD_FONT_PX),
        };
        let face = match face {
            Some(face) => face,
            None => return,
        };

        let scale = rusttype::Scale::uniform(px);
        let ascent = face.v_metrics(scale).ascent.round() as i32;
        imageproc::drawing::draw_text_mut(&mut self.back, pixel, x, y - ascent, scale, face, text);
    }

    fn swap(&mut self) -> anyhow::Result<()> {
        if self.back == self.front {
            return Ok(());
        }
        self.front = self.back.clone();

        if let Some(ref path) = self.png_out {
            self.front.save(path)
                .with_context(|| format!("writing frame to '{}'", path.display()))?;
            self.frames_written += 1;
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplaySurface, Fonts, ImageSurface};
    use crate::config::{Color, PanelConfig};

    fn panel(brightness: u8) -> PanelConfig {
        return PanelConfig { cols: 64, rows: 32, brightness: brightness };
    }

    #[test]
    fn pixels_appear_after_swap() {
        let mut surface = ImageSurface::new(&panel(100), Fonts::none(), None);

        surface.draw_pixel(63, 31, Color(0, 0, 255));
        assert_eq!(image::Rgb([0, 0, 0]), *surface.front().get_pixel(63, 31));

        surface.swap().expect("swap");
        assert_eq!(image::Rgb([0, 0, 255]), *surface.front().get_pixel(63, 31));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut surface = ImageSurface::new(&panel(100), Fonts::none(), None);

        surface.draw_pixel(-1, 0, Color(255, 255, 255));
        surface.draw_pixel(64, 0, Color(255, 255, 255));
        surface.draw_pixel(0, 32, Color(255, 255, 255));
        surface.draw_line((-10, 5), (100, 5), Color(255, 255, 255));
        surface.swap().expect("swap");

        assert_eq!(image::Rgb([255, 255, 255]), *surface.front().get_pixel(0, 5));
        assert_eq!(image::Rgb([255, 255, 255]), *surface.front().get_pixel(63, 5));
    }

    #[test]
    fn brightness_scales_colors() {
        let mut surface = ImageSurface::new(&panel(50), Fonts::none(), None);

        surface.draw_pixel(1, 1, Color(200, 100, 0));
        surface.swap().expect("swap");

        assert_eq!(image::Rgb([100, 50, 0]), *surface.front().get_pixel(1, 1));
    }

    #[test]
    fn clear_blanks_back_buffer() {
        let mut surface = ImageSurface::new(&panel(100), Fonts::none(), None);
        surface.draw_pixel(3, 3, Color(10, 20, 30));
        surface.swap().expect("swap");

        surface.clear();
        surface.swap().expect("swap");
        assert_eq!(image::Rgb([0, 0, 0]), *surface.front().get_pixel(3, 3));
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut surface = ImageSurface::new(&panel(100), Fonts::none(), None);
        surface.draw_text(super::Font::Thin, 17, 10, Color(180, 180, 180), "Grnblt");
        surface.swap().expect("swap");

        assert!(surface.front().pixels().all(|p| *p == image::Rgb([0, 0, 0])));
    }

    #[test]
    fn png_written_only_when_frame_changes() {
        let path = std::env::temp_dir().join(format!("metroboard-test-{}.png", std::process::id()));
        let mut surface = ImageSurface::new(&panel(100), Fonts::none(), Some(path.clone()));

        surface.draw_pixel(5, 5, Color(255, 0, 0));
        surface.swap().expect("swap");
        surface.swap().expect("swap");
        assert_eq!(1, surface.frames_written());

        let written = image::open(&path).expect("open png").to_rgb8();
        assert_eq!(image::Rgb([255, 0, 0]), *written.get_pixel(5, 5));

        surface.draw_pixel(6, 5, Color(255, 0, 0));
        surface.swap().expect("swap");
        assert_eq!(2, surface.frames_written());

        let _ = std::fs::remove_file(&path);
    }
}
