//! Frame rendering for the dashboard.
//!
//! Layout, top to bottom: tab bar, summary cards (students tab), the
//! search/filter status line, an inline banner when one is raised, the
//! table page, and a footer with pagination and key hints. Menus, delete
//! confirmation, and help render as overlays.

use super::app::{DashboardApp, TableSnapshot, ViewMode};
use super::theme::Theme;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Tabs};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

const MAX_CELL_WIDTH: usize = 28;

pub fn render(frame: &mut Frame, app: &DashboardApp) {
    let theme = Theme::default_theme();
    let snapshot = app.snapshot();
    let meta = app.store.meta(app.active());

    let summary_height = u16::from(app.risk_summary().is_some());
    let banner_height = u16::from(meta.banner.is_some() || meta.notice.is_some());

    let [tabs_area, summary_area, status_area, banner_area, table_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(summary_height),
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_tabs(frame, app, &theme, tabs_area);
    render_summary(frame, app, &theme, summary_area);
    render_status(frame, app, &theme, status_area);
    render_banner(frame, app, &theme, banner_area);
    render_table(frame, app, &snapshot, &theme, table_area);
    render_footer(frame, app, &snapshot, &theme, footer_area);

    match app.mode {
        ViewMode::FilterMenu | ViewMode::SortMenu | ViewMode::AssignMenu => {
            render_menu(frame, app, &theme);
        }
        ViewMode::ConfirmDelete => render_confirm(frame, app, &theme, footer_area),
        ViewMode::Help => render_help(frame, &theme),
        _ => {}
    }
}

fn render_tabs(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let titles: Vec<Line> = app
        .tabs()
        .iter()
        .map(|collection| Line::from(collection.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab())
        .style(theme.inactive_tab())
        .highlight_style(theme.active_tab());
    frame.render_widget(tabs, area);
}

fn render_summary(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let Some((summary, widen)) = app.risk_summary() else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            format!("{} high risk", summary.high_risk_total(widen)),
            Style::new()
                .fg(theme.risk(crate::core::RiskLevel::Critical))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "   critical {}  high {}  medium {}  low {}  unknown {}",
            summary.critical, summary.high, summary.medium, summary.low, summary.unknown
        )),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let meta = app.store.meta(app.active());
    let view = &meta.view;

    let mut spans = Vec::new();
    if app.mode == ViewMode::Search {
        spans.push(Span::styled("Search: ", theme.active_tab()));
        spans.push(Span::raw(view.search_term.clone()));
        spans.push(Span::styled("▌", theme.active_tab()));
    } else {
        if view.search_active() {
            spans.push(Span::raw(format!("/{}  ", view.search_term)));
        }
        for (category, value) in view.active_filters() {
            spans.push(Span::styled(
                format!("{category}={value}  "),
                Style::new().fg(theme.primary),
            ));
        }
        if spans.is_empty() {
            spans.push(Span::styled(
                "press / to search, f to filter, s to sort",
                theme.empty(),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_banner(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let meta = app.store.meta(app.active());
    if let Some(banner) = &meta.banner {
        let hint = if banner.retryable { " (r to retry, x to dismiss)" } else { " (x to dismiss)" };
        let line = Line::from(vec![
            Span::styled(banner.message.clone(), theme.banner()),
            Span::styled(hint, theme.empty()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    } else if let Some(notice) = &meta.notice {
        frame.render_widget(
            Paragraph::new(Span::styled(notice.clone(), theme.notice())),
            area,
        );
    }
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 1 >= max_width {
            out.push('…');
            return out;
        }
        out.push(c);
    }
    out
}

fn render_table(
    frame: &mut Frame,
    app: &DashboardApp,
    snapshot: &TableSnapshot,
    theme: &Theme,
    area: Rect,
) {
    if let Some(message) = &snapshot.empty_message {
        let paragraph = Paragraph::new(message.clone())
            .style(theme.empty())
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from(" "))
            .chain(snapshot.headers.iter().map(|h| Cell::from(h.clone()))),
    )
    .style(Style::new().add_modifier(Modifier::BOLD));

    let rows = snapshot.rows.iter().map(|row| {
        let marker = if row.selected { "▪" } else { " " };
        let cells = std::iter::once(Cell::from(marker)).chain(row.cells.iter().enumerate().map(
            |(column, text)| {
                let cell = Cell::from(truncate(text, MAX_CELL_WIDTH));
                let is_risk_column = snapshot
                    .headers
                    .get(column)
                    .is_some_and(|h| h.starts_with("risk_level"));
                match (is_risk_column, row.risk) {
                    (true, Some(level)) => cell.style(Style::new().fg(theme.risk(level))),
                    _ => cell,
                }
            },
        ));
        Row::new(cells)
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(1))
        .chain(snapshot.headers.iter().map(|_| Constraint::Fill(1)))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(theme.cursor_row());

    let mut state = TableState::default();
    state.select(Some(app.cursor));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(
    frame: &mut Frame,
    app: &DashboardApp,
    snapshot: &TableSnapshot,
    theme: &Theme,
    area: Rect,
) {
    let meta = app.store.meta(app.active());
    let busy = if meta.busy { "● " } else { "" };
    let line = Line::from(vec![
        Span::styled(busy, theme.active_tab()),
        Span::raw(format!(
            "Page {}/{} · {} of {} {}",
            snapshot.page,
            snapshot.total_pages,
            snapshot.filtered_count,
            snapshot.total_count,
            app.active().entity()
        )),
        Span::styled(
            "   q quit · ←/→ page · space select · d delete · ? help",
            theme.empty(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_menu(frame: &mut Frame, app: &DashboardApp, theme: &Theme) {
    let Some((title, items, selected)) = app.menu() else {
        return;
    };

    let height = items.len() as u16 + 2;
    let width = items
        .iter()
        .map(|item| item.width())
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or(10) as u16
        + 6;
    let area = centered(frame.area(), width, height);

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if index == selected {
                Line::from(Span::styled(format!("▸ {item}"), theme.cursor_row()))
            } else {
                Line::from(format!("  {item}"))
            }
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(title)),
        area,
    );
}

fn render_confirm(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let meta = app.store.meta(app.active());
    let Some(id) = meta.pending_delete else {
        return;
    };
    let entity = app.active().entity().trim_end_matches('s');
    let line = Line::from(Span::styled(
        format!("Delete {entity} {id}? (y/n)"),
        theme.banner(),
    ));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(frame: &mut Frame, theme: &Theme) {
    let lines = vec![
        Line::from("Tab / Shift-Tab   switch collection"),
        Line::from("j/k or ↑/↓        move cursor"),
        Line::from("←/→ or p/n        previous / next page"),
        Line::from("/                 search (Enter keeps, Esc clears)"),
        Line::from("f                 filter menu"),
        Line::from("s                 sort menu"),
        Line::from("space             toggle row selection"),
        Line::from("m                 mark selected notifications read"),
        Line::from("a                 assign advisor to selected students"),
        Line::from("d                 delete row (asks to confirm)"),
        Line::from("r                 refetch collection"),
        Line::from("x                 dismiss banner"),
        Line::from("q                 quit"),
    ];
    let height = lines.len() as u16 + 2;
    let area = centered(frame.area(), 52, height);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::new().fg(theme.text))
            .block(Block::bordered().title("Keys")),
        area,
    );
}
