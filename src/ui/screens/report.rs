use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::report::chart_data;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.breakdown.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expenses to generate report",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add an expense, or H/L to change month",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Report for {} ", app.month.label()),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_breakdown(f, chunks[0], app);
    render_chart(f, chunks[1], app);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let total = chart_data(&app.breakdown).total;

    let items: Vec<ListItem> = app
        .breakdown
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, share)| {
            let ratio = (share.share / rust_decimal::Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);

            let style = if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let bar = share_bar(ratio, 16);

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14}", truncate(share.category.as_str(), 13)),
                    style,
                ),
                Span::styled(
                    format!("{:>12} ", format_amount(share.amount)),
                    theme::normal_style(),
                ),
                Span::styled(bar, Style::default().fg(theme::ACCENT)),
                Span::styled(
                    format!(" {:>6}", format_percent(share.share)),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Category Breakdown | Total {} ",
                    format_amount(total)
                ),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let chart = chart_data(&app.breakdown);

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(chart.values.iter())
        .take(12)
        .map(|(label, value)| {
            Bar::default()
                .value(value.to_u64().unwrap_or(0))
                .label(Line::from(truncate(label, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    " Expense Distribution by Category ",
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(widget, area);
}

fn share_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
