//! Self-contained HTML rendition of the dashboard.
use super::page::{MetricCard, Page, load_page};
use super::ui;
use crate::core::DataSource;
use crate::core::clean::UnmappedCountry;
use crate::core::error::DashboardError;
use anyhow::{Context, Result};
use handlebars::Handlebars;
use plotters::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const PAGE_TEMPLATE: &str = include_str!("../../docs/dashboard.html.hbs");

/// Dark blue, the fill for bars and the country tiles at full intensity.
const CHART_COLOR: RGBColor = RGBColor(0, 0, 139);
const CHART_WIDTH: u32 = 760;
const ROW_HEIGHT: u32 = 32;
const TILE_SIZE: u32 = 112;

/// Reads the page stylesheet. A missing file is fatal.
pub fn read_stylesheet(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(DashboardError::StylesheetMissing(path.to_path_buf()).into());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read stylesheet: {}", path.display()))
}

#[derive(Serialize)]
struct PageContext<'a> {
    title: &'a str,
    stylesheet: &'a str,
    cards: Vec<MetricCard>,
    department_chart: String,
    country_chart: String,
    warnings: &'a [UnmappedCountry],
    fetched_at: String,
}

impl Page {
    /// Renders the page template. Text fields are HTML-escaped by the
    /// template engine; the stylesheet and the SVG charts are inserted raw.
    pub fn render_html(&self, stylesheet: &str) -> Result<String> {
        let context = PageContext {
            title: &self.title,
            stylesheet,
            cards: self.cards(),
            department_chart: self.department_chart()?,
            country_chart: self.country_chart()?,
            warnings: &self.warnings,
            fetched_at: self.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        };

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        let html = registry
            .render_template(PAGE_TEMPLATE, &context)
            .context("Failed to render page template")?;
        debug!(bytes = html.len(), "Rendered page");
        Ok(html)
    }

    /// Horizontal bar chart of headcount per department, largest on top.
    fn department_chart(&self) -> Result<String> {
        let distribution = &self.snapshot.department_distribution;
        let rows = distribution.len().max(1) as u32;
        let max = distribution.first().map_or(0, |(_, n)| *n) as u32;
        // Segment 0 is drawn at the bottom
        let names: Vec<&str> = distribution.iter().rev().map(|(d, _)| d.as_str()).collect();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, ROW_HEIGHT * rows + 50))
                .into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(180)
                .build_cartesian_2d(0u32..max + 1, (0u32..rows).into_segmented())?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(rows as usize)
                .y_label_formatter(&|v| match v {
                    SegmentValue::CenterOf(i) => names
                        .get(*i as usize)
                        .map_or_else(String::new, |name| name.to_string()),
                    _ => String::new(),
                })
                .x_desc("Employees")
                .draw()?;

            chart.draw_series(
                Histogram::horizontal(&chart)
                    .style(CHART_COLOR.filled())
                    .margin(4)
                    .data(
                        distribution
                            .iter()
                            .rev()
                            .enumerate()
                            .map(|(i, (_, count))| (i as u32, *count as u32)),
                    ),
            )?;
            root.present()?;
        }
        Ok(svg)
    }

    /// One tile per country code; fill intensity is proportional to count.
    fn country_chart(&self) -> Result<String> {
        let distribution = &self.snapshot.country_distribution;
        let max = distribution.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
        let columns = distribution.len().max(1);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (TILE_SIZE * columns as u32, TILE_SIZE))
                .into_drawing_area();
            root.fill(&WHITE)?;

            let tiles = root.split_evenly((1, columns));
            for ((code, count), tile) in distribution.iter().zip(tiles.iter()) {
                let intensity = 0.15 + 0.85 * (*count as f64 / max as f64);
                let tile = tile.margin(4, 4, 4, 4);
                tile.fill(&CHART_COLOR.mix(intensity))?;

                let label = ("sans-serif", 16).into_font().color(&WHITE);
                tile.draw(&Text::new(code.to_string(), (10, 16), label.clone()))?;
                tile.draw(&Text::new(count.to_string(), (10, 48), label))?;
            }
            root.present()?;
        }
        Ok(svg)
    }
}

/// Writes the dashboard as an HTML page with the stylesheet inlined.
pub async fn run(
    source: &dyn DataSource,
    sheet_url: &str,
    title: &str,
    stylesheet_path: &Path,
    output: &Path,
) -> Result<()> {
    let stylesheet = read_stylesheet(stylesheet_path)?;

    let pb = ui::new_spinner("Fetching employee data...");
    let page = load_page(source, sheet_url, title).await;
    pb.finish_and_clear();
    let page = page.context("Failed to render dashboard")?;

    let html = page.render_html(&stylesheet)?;
    fs::write(output, html)
        .with_context(|| format!("Failed to write dashboard to {}", output.display()))?;

    info!("Wrote dashboard to {}", output.display());
    println!(
        "Dashboard written to {}",
        ui::style_text(&output.display().to_string(), ui::StyleType::Heading)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::page::tests::sample_source;
    use tempfile::TempDir;

    /// Contents of every `<text>` element, trimmed.
    fn svg_labels(svg: &str) -> Vec<String> {
        svg.split("<text")
            .skip(1)
            .filter_map(|chunk| {
                let body = &chunk[chunk.find('>')? + 1..];
                Some(body[..body.find("</text>")?].trim().to_string())
            })
            .collect()
    }

    #[test]
    fn test_missing_stylesheet_is_fatal() {
        let err = read_stylesheet(Path::new("/nonexistent/style.css")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::StylesheetMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_render_html() {
        let page = load_page(&sample_source(), "https://example.com/s.csv", "R&D <Staff>")
            .await
            .unwrap();

        let html = page.render_html("body { color: #333; }").unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>\nbody { color: #333; }\n</style>"));
        assert!(html.contains("<title>R&amp;D &lt;Staff&gt;</title>"));
        assert!(html.contains("<div class=\"metric-value\">$3K</div>"));
        assert!(html.contains("<div class=\"metric-value\">66.67%</div>"));
        assert!(html.contains("Employees by Department"));
        assert!(html.contains("<li>2: France</li>"));
        assert!(html.contains("Data as of "));
    }

    #[tokio::test]
    async fn test_charts_are_svg() {
        let mut page = load_page(&sample_source(), "https://example.com/s.csv", "Staff")
            .await
            .unwrap();
        page.snapshot
            .department_distribution
            .push(("<script>".to_string(), 1));

        let departments = page.department_chart().unwrap();
        assert!(departments.starts_with("<svg"));
        assert!(departments.contains("<rect"));
        assert!(!departments.contains("<script>"));
        let labels = svg_labels(&departments);
        assert!(labels.iter().any(|l| l == "Eng"));
        assert!(labels.iter().any(|l| l == "Sales"));
        assert!(labels.iter().any(|l| l == "Employees"));

        let countries = page.country_chart().unwrap();
        assert!(countries.starts_with("<svg"));
        let labels = svg_labels(&countries);
        for code in ["BRA", "CHN", "Unknown"] {
            assert!(labels.iter().any(|l| l == code), "missing tile for {code}");
        }
    }

    #[tokio::test]
    async fn test_run_writes_page() -> Result<()> {
        let dir = TempDir::new()?;
        let stylesheet = dir.path().join("style.css");
        let output = dir.path().join("dashboard.html");
        fs::write(&stylesheet, ".metric { padding: 4px; }")?;

        run(
            &sample_source(),
            "https://example.com/s.csv",
            "Staff",
            &stylesheet,
            &output,
        )
        .await?;

        let html = fs::read_to_string(&output)?;
        assert!(html.contains(".metric { padding: 4px; }"));
        assert!(html.contains("Number of Business Units"));
        Ok(())
    }

    #[tokio::test]
    async fn test_run_without_stylesheet_writes_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let output = dir.path().join("dashboard.html");

        let result = run(
            &sample_source(),
            "https://example.com/s.csv",
            "Staff",
            &dir.path().join("missing.css"),
            &output,
        )
        .await;

        assert!(result.is_err());
        assert!(!output.exists());
        Ok(())
    }
}
