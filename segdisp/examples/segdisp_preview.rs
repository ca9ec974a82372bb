//! Renders text on a segmented display and prints the result to a terminal
//! supporting 24-bit colors.
use cgmath::Deg;
use rgb::RGBA8;
use segdisp::{
    charmap, composite, CellLayout, DisplayConfig, DisplayId, DisplayStyle, Layer, LitMask,
    Preview, RasterCache, SegmentType, Surface,
};
use std::{fmt::Write, time::Instant};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "segdisp_preview")]
struct Opt {
    /// The text to display.
    #[structopt(default_value = "HELLO 14.SEG")]
    text: String,

    /// The segment type (`numeric8`, `alnum14`, or `alnum16`).
    #[structopt(short = "t", long = "type", default_value = "alnum14")]
    segment_type: SegmentType,

    /// The width of a character cell, measured in pixels.
    #[structopt(short = "w", long = "width", default_value = "24")]
    width: usize,

    /// The height of a character cell, measured in pixels.
    #[structopt(long = "height", default_value = "36")]
    height: usize,

    /// The padding around a glyph, measured in pixels.
    #[structopt(short = "p", long = "padding", default_value = "3")]
    padding: f32,

    /// The skew angle in degrees.
    #[structopt(short = "s", long = "skew", default_value = "8")]
    skew: f32,

    /// Disable the glow layers.
    #[structopt(long = "no-glow")]
    no_glow: bool,

    /// Disable the unlit glyphs.
    #[structopt(long = "no-background")]
    no_background: bool,

    /// Render the single-cell settings preview instead of the text.
    #[structopt(long = "preview")]
    preview: bool,
}

fn main() {
    env_logger::init();

    // Parse command-line arguments
    let opt = Opt::from_args();

    let mut style = DisplayStyle::default().with_skew_angle(Deg(opt.skew));
    if opt.no_glow {
        for &layer in &[Layer::InnerGlow, Layer::OuterGlow] {
            style = style.with_layer(layer, style.layer(layer).with_enabled(false));
        }
    }
    if opt.no_background {
        style = style.with_layer(
            Layer::Background,
            style.background.with_enabled(false),
        );
    }

    let cell = CellLayout::new([opt.width, opt.height]).with_padding([opt.padding; 2]);
    let config = DisplayConfig::new(DisplayId(0), opt.segment_type, cell);

    let frame = if opt.preview {
        let preview = Preview::new(RasterCache::global(), config.for_preview(), style);
        let mut frame = Surface::new(cell.size);
        preview.redraw(&mut frame);
        frame
    } else {
        render_text(&config, &style, &opt.text)
    };

    print!("{}", to_ansi(&frame));
}

fn render_text(config: &DisplayConfig, style: &DisplayStyle, text: &str) -> Surface {
    let cache = RasterCache::with_builtin_geometry();

    let start = Instant::now();
    if let Err(e) = cache.rasterize_all(config, style) {
        eprintln!("warning: {}", e);
    }
    log::info!("rasterization took {:?}", start.elapsed());

    let masks: Vec<LitMask> = charmap::text_masks(config.segment_type, text);
    let [cell_w, cell_h] = config.cell.size;

    let mut frame = Surface::new([cell_w * masks.len().max(1), cell_h]);
    frame.clear(RGBA8::new(0, 0, 0, 255));

    let start = Instant::now();
    for (i, &lit) in masks.iter().enumerate() {
        composite(
            &cache,
            config.id,
            config.segment_type,
            lit,
            style,
            &mut frame,
            [(i * cell_w) as isize, 0],
        );
    }
    log::info!("compositing {} cell(s) took {:?}", masks.len(), start.elapsed());

    frame
}

/// Convert a frame into lines of half blocks, two pixel rows per line.
fn to_ansi(frame: &Surface) -> String {
    let mut out = String::new();
    for y in (0..frame.height()).step_by(2) {
        for x in 0..frame.width() {
            let top = frame.pixel(x, y);
            let bottom = if y + 1 < frame.height() {
                frame.pixel(x, y + 1)
            } else {
                RGBA8::new(0, 0, 0, 255)
            };
            write!(
                out,
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
            )
            .unwrap();
        }
        out.push_str("\x1b[0m\n");
    }
    out
}
