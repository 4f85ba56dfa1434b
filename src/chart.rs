use std::sync::Arc;

use chrono::{DateTime, Local};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::reading::Reading;
use crate::series::SamplePoint;

pub const CHART_KEY: &str = "sicaklik_trend.png";
pub const CHART_DPI: u32 = 300;

// 12in x 7in at 300 DPI, the bottom inch and a half holds the device info box
const WIDTH: u32 = 3600;
const HEIGHT: u32 = 2100;
const PLOT_HEIGHT: u32 = 1650;

const Y_RANGE: std::ops::Range<f64> = 30.0..40.0;
// points further out than this are off the plot anyway, plotters overflows on huge values
const PLOT_MARGIN: f64 = 10.0;
const FONT_FAMILY: &str = "sans-serif";

const LINE_COLOR: RGBColor = RGBColor(0x25, 0x63, 0xeb);
const GRID_COLOR: RGBColor = RGBColor(0xcb, 0xd5, 0xe1);
const INFO_COLOR: RGBColor = RGBColor(0xdb, 0xea, 0xfe);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("no font available for chart text, check CHART_FONT_PATH")]
    FontUnavailable,
    #[error("failed to load font {path}: {reason}")]
    InvalidFont { path: String, reason: String },
    #[error("cannot draw a chart without data points")]
    EmptySeries,
    #[error("failed to draw chart: {0}")]
    Drawing(String),
    #[error("failed to encode chart as png: {0}")]
    Encoding(#[from] png::EncodingError),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}

/// Everything that ends up on the trend chart image.
#[derive(Debug, Clone)]
pub struct TrendChart {
    pub device_id: String,
    pub last_temperature: f64,
    pub last_humidity: f64,
    pub motion: bool,
    pub series: Vec<SamplePoint>,
}

impl TrendChart {
    pub fn new(reading: &Reading, series: Vec<SamplePoint>) -> Self {
        TrendChart {
            device_id: reading.device_id.clone(),
            last_temperature: reading.sicaklik,
            last_humidity: reading.nem,
            motion: reading.hareket,
            series,
        }
    }

    pub fn info_lines(&self) -> Vec<String> {
        vec![
            "Cihaz Bilgileri:".to_string(),
            format!("Device ID: {}", self.device_id),
            format!("Son Sıcaklık: {}°C", self.last_temperature),
            format!("Son Nem: {}%", self.last_humidity),
            format!("Hareket Algılandı: {}", motion_label(self.motion)),
        ]
    }
}

pub fn motion_label(motion: bool) -> &'static str {
    if motion {
        "Evet"
    } else {
        "Hayır"
    }
}

/// Turns a [TrendChart] into encoded image bytes.
pub trait ChartRenderer: Send + Sync {
    fn render_png(&self, chart: &TrendChart) -> Result<Vec<u8>, ChartError>;
}

pub type DynChartRenderer = Arc<dyn ChartRenderer>;

/// Bitmap renderer backed by plotters. Text needs a TrueType font registered
/// with plotters, which happens once in [PlottersRenderer::with_font_file].
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    font_loaded: bool,
}

impl PlottersRenderer {
    /// Loads and registers the font at `path`. A missing or unreadable font is
    /// not fatal here; rendering reports [ChartError::FontUnavailable] instead.
    pub fn with_font_file(path: &str) -> Self {
        match load_font(path) {
            Ok(()) => {
                info!("registered chart font {}", path);
                PlottersRenderer { font_loaded: true }
            }
            Err(e) => {
                warn!("chart rendering disabled: {}", e);
                PlottersRenderer { font_loaded: false }
            }
        }
    }

    pub fn without_font() -> Self {
        PlottersRenderer { font_loaded: false }
    }

    fn draw(&self, chart: &TrendChart, buffer: &mut [u8]) -> Result<(), ChartError> {
        let (first, last) = match (chart.series.first(), chart.series.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => return Err(ChartError::EmptySeries),
        };

        let root = BitMapBackend::with_buffer(buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;
        let (upper, lower) = root.split_vertically(PLOT_HEIGHT);

        let mut plot = ChartBuilder::on(&upper)
            .caption(
                "Depo Sıcaklık Trendi",
                (FONT_FAMILY, 56).into_font().style(FontStyle::Bold),
            )
            .margin(60)
            .x_label_area_size(170)
            .y_label_area_size(190)
            .build_cartesian_2d(first..last, Y_RANGE)
            .map_err(drawing_error)?;

        plot.configure_mesh()
            .light_line_style(GRID_COLOR.mix(0.4))
            .bold_line_style(GRID_COLOR.mix(0.7))
            .x_labels(6)
            .y_labels(11)
            .x_label_formatter(&|t: &DateTime<Local>| t.format("%d.%m %H:%M").to_string())
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .x_desc("Zaman")
            .y_desc("Sıcaklık (°C)")
            .label_style((FONT_FAMILY, 36))
            .axis_desc_style((FONT_FAMILY, 42))
            .draw()
            .map_err(drawing_error)?;

        let points: Vec<(DateTime<Local>, f64)> = chart
            .series
            .iter()
            .map(|p| (p.time, plot_temperature(p.temperature)))
            .collect();

        plot.draw_series(LineSeries::new(
            points.iter().copied(),
            LINE_COLOR.stroke_width(6),
        ))
        .map_err(drawing_error)?
        .label("Sıcaklık")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 60, y)], LINE_COLOR.stroke_width(6)));

        plot.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 18, LINE_COLOR.filled())),
        )
        .map_err(drawing_error)?;

        plot.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT_FAMILY, 36))
            .draw()
            .map_err(drawing_error)?;

        let lines = chart.info_lines();
        let line_height = 70;
        let box_height = line_height * lines.len() as i32 + 40;
        lower
            .draw(&Rectangle::new(
                [(360, 20), (1800, 20 + box_height)],
                INFO_COLOR.mix(0.5).filled(),
            ))
            .map_err(drawing_error)?;
        for (i, line) in lines.iter().enumerate() {
            lower
                .draw(&Text::new(
                    line.as_str(),
                    (400, 40 + line_height * i as i32),
                    (FONT_FAMILY, 40).into_font().color(&BLACK),
                ))
                .map_err(drawing_error)?;
        }

        root.present().map_err(drawing_error)?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render_png(&self, chart: &TrendChart) -> Result<Vec<u8>, ChartError> {
        if !self.font_loaded {
            return Err(ChartError::FontUnavailable);
        }

        let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
        self.draw(chart, &mut buffer)?;
        let png = encode_png(&buffer, WIDTH, HEIGHT, CHART_DPI)?;
        debug!("rendered chart for {} ({} bytes)", chart.device_id, png.len());
        Ok(png)
    }
}

fn plot_temperature(temperature: f64) -> f64 {
    temperature.clamp(Y_RANGE.start - PLOT_MARGIN, Y_RANGE.end + PLOT_MARGIN)
}

fn load_font(path: &str) -> Result<(), ChartError> {
    let invalid = |reason: String| ChartError::InvalidFont {
        path: path.to_string(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| invalid(e.to_string()))?;
    // plotters keeps a reference to the font for the lifetime of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    for style in [FontStyle::Normal, FontStyle::Bold] {
        register_font(FONT_FAMILY, style, bytes)
            .map_err(|_| invalid("not a valid TrueType/OpenType font".to_string()))?;
    }
    Ok(())
}

/// Encodes an RGB buffer as PNG with a `pHYs` chunk for `dpi`.
pub fn encode_png(rgb: &[u8], width: u32, height: u32, dpi: u32) -> Result<Vec<u8>, ChartError> {
    let pixels_per_meter = (dpi as f64 / 0.0254).round() as u32;
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: pixels_per_meter,
            yppu: pixels_per_meter,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgb)?;
        writer.finish()?;
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::DEFAULT_CHART_FONT_PATH;
    use crate::series;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn chart(hareket: bool) -> TrendChart {
        let reading = Reading {
            device_id: "D1".to_string(),
            sicaklik: 35.0,
            nem: 50.0,
            hareket,
        };
        let points = series::generate(35.0, Local::now(), &mut StdRng::seed_from_u64(1));
        TrendChart::new(&reading, points)
    }

    #[test]
    fn test_info_lines() {
        assert_eq!(
            chart(true).info_lines(),
            vec![
                "Cihaz Bilgileri:",
                "Device ID: D1",
                "Son Sıcaklık: 35°C",
                "Son Nem: 50%",
                "Hareket Algılandı: Evet",
            ]
        );
        assert_eq!(chart(false).info_lines()[4], "Hareket Algılandı: Hayır");
    }

    #[test]
    fn test_encode_png_sets_dpi() {
        let rgb = vec![255u8; 4 * 2 * 3];
        let bytes = encode_png(&rgb, 4, 2, 300).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);

        let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 2));
        let dims = info.pixel_dims.expect("pHYs chunk");
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert!(matches!(dims.unit, png::Unit::Meter));
    }

    #[test]
    fn test_render_without_font() {
        let result = PlottersRenderer::without_font().render_png(&chart(true));
        assert!(matches!(result, Err(ChartError::FontUnavailable)));
    }

    #[test]
    fn test_missing_font_file_disables_rendering() {
        let renderer = PlottersRenderer::with_font_file("/nonexistent/font.ttf");
        let result = renderer.render_png(&chart(false));
        assert!(matches!(result, Err(ChartError::FontUnavailable)));
    }

    #[test]
    fn test_non_font_file_disables_rendering() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        assert!(matches!(
            load_font(path),
            Err(ChartError::InvalidFont { .. })
        ));

        let renderer = PlottersRenderer::with_font_file(path);
        let result = renderer.render_png(&chart(true));
        assert!(matches!(result, Err(ChartError::FontUnavailable)));
    }

    #[test]
    fn test_plot_temperature_clamp() {
        assert_eq!(plot_temperature(35.5), 35.5);
        assert_eq!(plot_temperature(20.0), 20.0);
        assert_eq!(plot_temperature(-1e100), 20.0);
        assert_eq!(plot_temperature(1e300), 50.0);
    }

    fn system_font() -> Option<String> {
        let path = std::env::var("CHART_FONT_PATH")
            .unwrap_or_else(|_| DEFAULT_CHART_FONT_PATH.to_string());
        if std::path::Path::new(&path).exists() {
            Some(path)
        } else {
            eprintln!("skipping chart render test, no font at {}", path);
            None
        }
    }

    #[test]
    fn test_render_with_system_font() {
        let Some(path) = system_font() else { return };

        let renderer = PlottersRenderer::with_font_file(&path);
        let bytes = renderer.render_png(&chart(true)).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);

        let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
        assert_eq!((reader.info().width, reader.info().height), (WIDTH, HEIGHT));
    }

    #[test]
    fn test_render_extreme_temperatures() {
        let Some(path) = system_font() else { return };

        let renderer = PlottersRenderer::with_font_file(&path);
        for temperature in [-1e100, 1e300, -1e300, -40.0] {
            let reading = Reading {
                device_id: "D1".to_string(),
                sicaklik: temperature,
                nem: 50.0,
                hareket: false,
            };
            let points = series::generate(temperature, Local::now(), &mut StdRng::seed_from_u64(3));
            let bytes = renderer
                .render_png(&TrendChart::new(&reading, points))
                .unwrap_or_else(|e| panic!("{} failed to render: {}", temperature, e));
            assert_eq!(bytes[..8], PNG_SIGNATURE);
        }
    }

    #[test]
    fn test_render_empty_series() {
        let mut empty = chart(true);
        empty.series.clear();
        let renderer = PlottersRenderer { font_loaded: true };
        assert!(matches!(
            renderer.render_png(&empty),
            Err(ChartError::EmptySeries)
        ));
    }
}
