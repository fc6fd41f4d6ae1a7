//! Fiscal year comparison table.

use std::sync::Arc;

use shared::TableModel;
use shared::table::{COLUMNS, ColumnAlign, ColumnSpec};
use zoon::*;

use crate::dashboard::Dashboard;
use crate::theme::*;

const ROW_HEIGHT: u32 = 36;

#[derive(Clone, Debug, PartialEq)]
struct TableSnapshot {
    table: Arc<TableModel>,
    period: String,
    periods: Vec<String>,
}

pub fn table_panel(dashboard: &Dashboard) -> impl Element + use<> {
    let snapshot_signal = dashboard
        .view_signal()
        .map(|view| {
            view.map(|view| TableSnapshot {
                table: Arc::clone(&view.table),
                period: view.table_period.clone(),
                periods: view.table_periods.clone(),
            })
        })
        .dedupe_cloned();

    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(16))
        .s(Padding::all(24))
        .s(Background::new().color(SURFACE))
        .s(RoundedCorners::all(RADIUS))
        .s(Borders::all(Border::new().color(BORDER)))
        .item_signal(snapshot_signal.map({
            let dashboard = dashboard.clone();
            move |snapshot| snapshot.map(|snapshot| table_card(&dashboard, &snapshot))
        }))
}

fn table_card(dashboard: &Dashboard, snapshot: &TableSnapshot) -> impl Element + use<> {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(12))
        .item(fiscal_year_selector(dashboard, snapshot))
        .item(
            Column::new()
                .s(Width::fill())
                .s(Borders::all(Border::new().color(BORDER)))
                .s(Scrollbars::x_and_clip_y())
                .item(header_row())
                .items(snapshot.table.rows.iter().enumerate().map(|(index, row)| {
                    let cells = [
                        row.sequence_no.to_string(),
                        row.label.clone(),
                        row.formatted_value.clone(),
                        row.formatted_percent_var.clone(),
                    ];
                    body_row(index, cells)
                })),
        )
}

fn fiscal_year_selector(dashboard: &Dashboard, snapshot: &TableSnapshot) -> impl Element + use<> {
    Row::new()
        .s(Gap::new().x(8))
        .item(
            El::new()
                .s(Font::new().size(14).weight(FontWeight::SemiBold).color(TEXT_PRIMARY))
                .child("Fiscal Year"),
        )
        .items(snapshot.periods.iter().map(|period| {
            let selected = *period == snapshot.period;
            let table_period_selected_relay = dashboard.table_period_selected_relay.clone();
            let period = period.clone();
            Button::new()
                .s(Padding::new().x(12).y(6))
                .s(RoundedCorners::all(RADIUS))
                .s(Font::new()
                    .size(13)
                    .color(if selected { ACCENT_TEXT } else { TEXT_PRIMARY }))
                .s(Background::new().color(if selected { ACCENT } else { SURFACE }))
                .s(Borders::all(Border::new().color(if selected { ACCENT } else { BORDER })))
                .label(period.clone())
                .on_press(move || table_period_selected_relay.send(period.clone()))
        }))
}

fn header_row() -> impl Element + use<> {
    Row::new()
        .s(Background::new().color(TABLE_HEADER_BACKGROUND))
        .s(Height::exact(ROW_HEIGHT))
        .items(COLUMNS.iter().map(|column| {
            cell(
                column,
                column.label.to_string(),
                Font::new().size(14).weight(FontWeight::Bold).color(TEXT_PRIMARY),
            )
        }))
}

fn body_row(index: usize, cells: [String; 4]) -> impl Element + use<> {
    Row::new()
        .s(Height::exact(ROW_HEIGHT))
        .s(Background::new().color(if index % 2 == 1 {
            TABLE_ROW_ALT_BACKGROUND
        } else {
            SURFACE
        }))
        .s(Borders::new().top(Border::new().color(BORDER)))
        .items(COLUMNS.iter().zip(cells).map(|(column, text)| {
            cell(column, text, Font::new().size(14).color(TEXT_PRIMARY))
        }))
}

fn cell(column: &ColumnSpec, text: String, font: Font<'static>) -> impl Element + use<> {
    let align = match column.align {
        ColumnAlign::Left => Align::new().left().center_y(),
        ColumnAlign::Center => Align::new().center_x().center_y(),
        ColumnAlign::Right => Align::new().right().center_y(),
    };
    El::new()
        .s(Width::growable().min(column.min_width))
        .s(Height::fill())
        .s(Padding::new().x(12))
        .s(font)
        .child(El::new().s(align).child(text))
}
