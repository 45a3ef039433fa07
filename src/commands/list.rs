//! One-shot collection listing: fetch, run the view pipeline, print a page.

use crate::cli::OutputFormat;
use crate::config::RiskboardConfig;
use crate::core::{RiskLevel, Student};
use crate::store::{default_view, Collection};
use crate::view::summary::RiskSummary;
use crate::view::{
    compute_view, empty_state_message, schemas, SortDirection, ViewResult, ViewSchema, ViewState,
};
use anyhow::Result;
use colored::Colorize;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{Cell, Color as CellColor, Table};
use serde::Serialize;
use serde_json::json;

pub struct ListArgs {
    pub collection: Collection,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub sort: Option<String>,
    pub desc: bool,
    pub page: usize,
    pub page_size: Option<usize>,
    pub format: OutputFormat,
    pub api_url: Option<String>,
    pub demo: bool,
}

pub async fn run_list(config: &RiskboardConfig, args: ListArgs) -> Result<()> {
    let client = super::build_client(config, args.api_url.as_deref(), args.demo)?;
    let page_size = args.page_size.unwrap_or(config.view.page_size);

    match args.collection {
        Collection::Users => {
            print_listing(client.fetch_users().await?, &schemas::user_schema(), &args, page_size)
        }
        Collection::Students => {
            let records = client.fetch_students().await?;
            if matches!(args.format, OutputFormat::Table) {
                print_risk_summary(&records, config.risk.widen_high_in_summary);
            }
            print_listing(
                records,
                &schemas::student_schema(config.risk.widen_high_in_lists),
                &args,
                page_size,
            )
        }
        Collection::Advisors => print_listing(
            client.fetch_advisors().await?,
            &schemas::advisor_schema(),
            &args,
            page_size,
        ),
        Collection::Notifications => print_listing(
            client.fetch_notifications().await?,
            &schemas::notification_schema(),
            &args,
            page_size,
        ),
        Collection::Interventions => print_listing(
            client.fetch_interventions().await?,
            &schemas::intervention_schema(),
            &args,
            page_size,
        ),
        Collection::Meetings => print_listing(
            client.fetch_meetings().await?,
            &schemas::meeting_schema(),
            &args,
            page_size,
        ),
    }
}

/// Builds the view state the pipeline runs under. Explicit sort flags
/// override the collection's default; the page is applied last because
/// search and filter edits reset it.
fn view_state(args: &ListArgs, page_size: usize) -> ViewState {
    let mut state = default_view(args.collection, page_size);
    if let Some(search) = &args.search {
        state.set_search(search.clone());
    }
    for (category, value) in &args.filters {
        state.set_filter(category.clone(), value.clone());
    }
    if let Some(sort) = &args.sort {
        state.sort_key = sort.clone();
        state.sort_direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
    } else if args.desc {
        state.sort_direction = SortDirection::Desc;
    }
    state.set_page(args.page);
    state
}

fn print_risk_summary(students: &[Student], widen_high: bool) {
    let summary = RiskSummary::from_students(students);
    println!(
        "{}  critical {}  high {}  medium {}  low {}  unknown {}",
        format!("{} high risk", summary.high_risk_total(widen_high))
            .red()
            .bold(),
        summary.critical,
        summary.high,
        summary.medium,
        summary.low,
        summary.unknown,
    );
}

fn print_listing<R: Clone + Serialize>(
    records: Vec<R>,
    schema: &ViewSchema<R>,
    args: &ListArgs,
    page_size: usize,
) -> Result<()> {
    let state = view_state(args, page_size);
    let result = compute_view(&records, &state, schema);

    match args.format {
        OutputFormat::Json => print_json(&result, &state),
        OutputFormat::Table => {
            print_table(&result, &state, schema);
            Ok(())
        }
    }
}

fn print_json<R: Serialize>(result: &ViewResult<R>, state: &ViewState) -> Result<()> {
    let payload = json!({
        "page": state.page,
        "page_items": &result.page_items,
        "filtered_count": result.filtered_count,
        "total_count": result.total_count,
        "total_pages": result.total_pages,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn print_table<R>(result: &ViewResult<R>, state: &ViewState, schema: &ViewSchema<R>) {
    if result.page_items.is_empty() {
        if result.filtered_count > 0 {
            println!(
                "{}",
                format!("Page {} of {} is empty", state.page, result.total_pages).yellow()
            );
        } else {
            println!(
                "{}",
                empty_state_message(schema.entity(), state.search_active()).dimmed()
            );
        }
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(schema.fields().iter().map(|field| {
        if field.name == state.sort_key {
            format!("{} {}", field.name, state.sort_direction.indicator())
        } else {
            field.name.to_string()
        }
    }));

    for record in &result.page_items {
        table.add_row(schema.fields().iter().map(|field| {
            let value = (field.accessor)(record);
            let rendered = value.to_string();
            if field.name == "risk_level" {
                Cell::new(&rendered).fg(risk_cell_color(RiskLevel::from_wire(&rendered)))
            } else {
                Cell::new(&rendered)
            }
        }));
    }

    println!("{table}");
    println!(
        "Page {}/{} · {} of {} {}",
        state.page,
        result.total_pages,
        result.filtered_count,
        result.total_count,
        schema.entity()
    );
}

fn risk_cell_color(level: RiskLevel) -> CellColor {
    match level {
        RiskLevel::Critical => CellColor::Red,
        RiskLevel::High => CellColor::Yellow,
        RiskLevel::Medium => CellColor::Blue,
        RiskLevel::Low => CellColor::Green,
        RiskLevel::Unknown => CellColor::Grey,
    }
}
