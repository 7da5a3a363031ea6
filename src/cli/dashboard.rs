use super::page::{Page, load_page};
use super::ui;
use crate::core::DataSource;
use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};
use std::time::Duration;
use tracing::debug;

const BAR_WIDTH: usize = 40;

impl Page {
    pub fn display_as_text(&self) -> String {
        let mut output = format!("{}\n\n", ui::style_text(&self.title, ui::StyleType::Title));

        let cards = self.cards();
        let mut metrics = ui::new_styled_table();
        metrics.set_header(cards.iter().map(|c| ui::header_cell(c.label)));
        metrics.add_row(cards.iter().map(|c| {
            Cell::new(ui::style_text(&c.value, ui::StyleType::MetricValue))
                .set_alignment(CellAlignment::Center)
        }));
        output.push_str(&metrics.to_string());

        output.push_str(&format!(
            "\n\n{}\n",
            ui::style_text("Employees by Department", ui::StyleType::Heading)
        ));
        output.push_str(&self.department_table().to_string());

        output.push_str(&format!(
            "\n\n{}\n",
            ui::style_text("Number of Employees by Country", ui::StyleType::Heading)
        ));
        output.push_str(&self.country_map().to_string());

        if !self.warnings.is_empty() {
            output.push_str("\n\n");
            for warning in &self.warnings {
                output.push_str(&ui::style_text(
                    &format!(
                        "Employee {} is in an unmapped country ({}), counted as Unknown\n",
                        warning.eeid, warning.country
                    ),
                    ui::StyleType::Warning,
                ));
            }
        }

        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Data as of {}", self.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
                ui::StyleType::Subtle,
            )
        ));
        output
    }

    fn department_table(&self) -> comfy_table::Table {
        let distribution = &self.snapshot.department_distribution;
        let max = distribution.first().map_or(0, |(_, n)| *n);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Department"),
            ui::header_cell("# of Employees"),
            ui::header_cell(""),
        ]);
        for (department, count) in distribution {
            table.add_row(vec![
                Cell::new(department),
                ui::count_cell(*count),
                Cell::new(ui::bar(*count, max, BAR_WIDTH)).fg(comfy_table::Color::DarkBlue),
            ]);
        }
        table
    }

    fn country_map(&self) -> comfy_table::Table {
        let distribution = &self.snapshot.country_distribution;
        let max = distribution.iter().map(|(_, n)| *n).max().unwrap_or(0);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Country"),
            ui::header_cell("# of employees"),
            ui::header_cell(""),
        ]);
        for (code, count) in distribution {
            table.add_row(vec![
                Cell::new(code),
                ui::count_cell(*count),
                Cell::new(ui::shade(*count, max).repeat(4)),
            ]);
        }
        table
    }
}

/// Renders the dashboard to stdout, optionally re-rendering every
/// `refresh` seconds until interrupted.
pub async fn run(
    source: &dyn DataSource,
    sheet_url: &str,
    title: &str,
    json: bool,
    refresh: Option<u64>,
) -> Result<()> {
    loop {
        let pb = ui::new_spinner("Fetching employee data...");
        let page = load_page(source, sheet_url, title).await;
        pb.finish_and_clear();
        let page = page.context("Failed to render dashboard")?;

        if json {
            println!("{}", serde_json::to_string_pretty(&page.snapshot)?);
        } else {
            println!("{}", page.display_as_text());
        }

        let Some(secs) = refresh else {
            return Ok(());
        };
        debug!("Next refresh in {secs}s");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
        }
        ui::print_separator();
    }
}
