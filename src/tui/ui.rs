//! Terminal setup, the main loop, and rendering.

use super::app::App;
use super::constants::{
    DESCRIPTION_WIDTH, MIN_HEIGHT, MIN_WIDTH, PRICE_WIDTH, TABLE_CHROME_ROWS,
};
use super::events::{Event, EventHandler, handle_key_event};
use super::theme::{Styles, Theme, colors, mode_badge, render_footer_hints, set_theme};
use super::traits::{footer_shortcuts, shortcut_groups};
use super::viewmodel::{FilterField, OverlayKind};
use crate::grid::{EditSession, Focusable, GridState, ToastLevel, format_decimal};
use crate::model::{ColorTag, InstallmentTier, PriceList, Product};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use std::io::{self, stdout};

/// Run the dashboard until the user quits.
///
/// The caller queues the first reload; it is dispatched before the first
/// draw.
pub fn run_tui(app: &mut App) -> io::Result<()> {
    set_theme(Theme::from_name(&app.preferences().theme));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::default();
    app.dispatch();

    let result = (|| -> io::Result<()> {
        loop {
            terminal.draw(|frame| render(frame, app))?;

            match events.next()? {
                Event::Key(key) => handle_key_event(app, key),
                Event::Resize(_, _) => {}
                Event::Tick => app.on_tick(),
            }
            // Keys can arrive faster than ticks
            app.drain_outcomes();

            if app.should_quit {
                return Ok(());
            }
        }
    })();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main render function
fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_size_warning(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Stats
            Constraint::Min(5),    // Grid
            Constraint::Length(1), // Toast
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_stats_bar(frame, chunks[1], app);
    render_grid(frame, chunks[2], app);
    render_toast(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);

    if let Some(session) = app.grid.edit() {
        render_edit_popup(frame, chunks[2], app, session);
    }
    if app.filter_panel.is_open() {
        render_filter_panel(frame, area, app);
    }
    if app.color_picker.is_open() {
        render_color_picker(frame, area, app);
    }
    match app.overlays.current() {
        Some(OverlayKind::Help) => render_help_overlay(frame, area),
        Some(OverlayKind::Info) => render_info_overlay(frame, area, app),
        Some(OverlayKind::Config) => render_config_overlay(frame, area, app),
        None => {}
    }
}

// ============================================================================
// Header and status lines
// ============================================================================

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let scheme = colors();
    let mut spans = vec![
        Span::styled("pricedesk", Styles::header_title()),
        Span::raw(" "),
        mode_badge(app.grid.page().title()),
        Span::styled(" │ ", Style::default().fg(scheme.muted)),
        Span::styled(app.backend_name(), Styles::text()),
        Span::styled(" │ ", Style::default().fg(scheme.muted)),
        Span::styled("view: ", Styles::label()),
        Span::styled(app.grid.view().label(), Styles::value()),
    ];

    if app.grid.is_loading() || app.in_flight() > 0 {
        const SPINNER: [char; 4] = ['⠋', '⠙', '⠹', '⠸'];
        let frame_idx = (app.tick % SPINNER.len() as u64) as usize;
        spans.push(Span::styled(" │ ", Style::default().fg(scheme.muted)));
        spans.push(Span::styled(
            format!("{} {} pending", SPINNER[frame_idx], app.in_flight()),
            Styles::info(),
        ));
    }

    if app.grid.permissions() == crate::model::Permissions::read_only() {
        spans.push(Span::styled(" │ ", Style::default().fg(scheme.muted)));
        spans.push(Span::styled("read-only", Styles::warning()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_stats_bar(frame: &mut Frame, area: Rect, app: &App) {
    let scheme = colors();
    let sep = || Span::styled(" │ ", Style::default().fg(scheme.muted));

    let mut spans = vec![
        Span::styled(" Products: ", Styles::text_muted()),
        Span::styled(app.grid.total().to_string(), Styles::header_title()),
    ];

    if let Some(stats) = app.grid.stats() {
        for (label, value) in [
            ("in stock", stats.with_stock),
            ("no price", stats.without_price),
            ("rebate", stats.with_rebate),
            ("out of cards", stats.out_of_cards),
        ] {
            spans.push(sep());
            spans.push(Span::styled(format!("{label}: "), Styles::text_muted()));
            spans.push(Span::styled(value.to_string(), Styles::value()));
        }
    }

    let selected = app.grid.selection().len();
    if selected > 0 {
        spans.push(sep());
        spans.push(Span::styled(
            format!("{selected} selected"),
            Style::default().fg(scheme.accent).bold(),
        ));
    }

    spans.push(sep());
    spans.push(Span::styled(app.grid.filter().to_string(), Styles::text_muted()));

    if !app.grid.settings().auto_recalculate_installments {
        spans.push(sep());
        spans.push(Span::styled("manual installments", Styles::warning()));
    }

    let status =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(scheme.background_alt));
    frame.render_widget(status, area);
}

fn render_toast(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some((level, message)) = app.grid.toast_mut().message() else {
        return;
    };
    let (icon, style) = match level {
        ToastLevel::Success => ("✓ ", Styles::success()),
        ToastLevel::Info => ("ℹ ", Styles::info()),
        ToastLevel::Warning => ("! ", Styles::warning()),
        ToastLevel::Error => ("✗ ", Styles::error()),
    };
    let line = Line::from(vec![
        Span::styled(icon, style),
        Span::styled(message.to_string(), style.bold()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints: Vec<(String, String)> = if app.grid.state() == GridState::Editing {
        vec![
            ("Tab".to_string(), "next".to_string()),
            ("Enter".to_string(), "save".to_string()),
            ("Esc".to_string(), "discard".to_string()),
        ]
    } else {
        footer_shortcuts()
            .into_iter()
            .map(|s| (s.key, s.description))
            .collect()
    };
    let hints: Vec<(&str, &str)> = hints
        .iter()
        .map(|(k, d)| (k.as_str(), d.as_str()))
        .collect();

    let footer = Paragraph::new(Line::from(render_footer_hints(&hints)))
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors().text_muted));
    frame.render_widget(footer, area);
}

// ============================================================================
// Grid
// ============================================================================

/// Columns before the price columns: marker, code, brand, description,
/// stock, flags.
const FIXED_COLUMNS: usize = 6;

fn render_grid(frame: &mut Frame, area: Rect, app: &mut App) {
    let body_height = area.height.saturating_sub(TABLE_CHROME_ROWS) as usize;
    app.grid.set_viewport_height(body_height);

    let scheme = colors();
    let columns = app.grid.columns();
    let cursor = app.grid.cursor();
    let viewport = app.grid.viewport();

    let mut header_cells = vec![
        Cell::from(""),
        Cell::from("Código"),
        Cell::from("Marca"),
        Cell::from("Descripción"),
        Cell::from(Line::from("Stock").alignment(Alignment::Right)),
        Cell::from("Flags"),
    ];
    header_cells.extend(
        columns
            .iter()
            .map(|c| Cell::from(Line::from(c.header()).alignment(Alignment::Right))),
    );
    let header = Row::new(header_cells).style(Style::default().fg(scheme.primary).bold());

    let rows: Vec<Row> = app
        .grid
        .products()
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take_while(|(idx, _)| viewport.contains(*idx))
        .map(|(idx, product)| {
            let selected = app.grid.selection().contains(product.id);
            let active_col = cursor.filter(|c| c.row == idx).map(|c| c.col);

            let mut cells = vec![
                marker_cell(product, selected),
                Cell::from(product.code.clone()),
                Cell::from(product.brand.clone().unwrap_or_default()),
                Cell::from(truncate(&product.description, DESCRIPTION_WIDTH as usize)),
                Cell::from(Line::from(product.stock.to_string()).alignment(Alignment::Right)),
                Cell::from(flags(product)),
            ];
            cells.extend(columns.iter().enumerate().map(|(col, kind)| {
                let text = kind.value(product).map(format_money).unwrap_or_else(|| "-".to_string());
                let cell = Cell::from(Line::from(text).alignment(Alignment::Right));
                if active_col == Some(col) {
                    cell.style(Styles::active_cell())
                } else if kind.edit_field().is_none() {
                    cell.style(Styles::text_muted())
                } else {
                    cell
                }
            }));

            let row = Row::new(cells);
            if selected {
                row.style(Style::default().bg(scheme.selected_row_bg))
            } else if active_col.is_some() {
                row.style(Style::default().bg(scheme.active_row_bg))
            } else {
                row
            }
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(3),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(DESCRIPTION_WIDTH),
        Constraint::Length(6),
        Constraint::Length(5),
    ];
    widths.extend(std::iter::repeat_n(Constraint::Length(PRICE_WIDTH), columns.len()));
    debug_assert_eq!(widths.len(), FIXED_COLUMNS + columns.len());

    let focused = app.grid.state() != GridState::Idle;
    let title = if app.grid.products().is_empty() && !app.grid.is_loading() {
        " No products match the filter ".to_string()
    } else {
        format!(
            " {}-{} of {} ",
            (viewport.offset + 1).min(app.grid.products().len()),
            (viewport.offset + body_height).min(app.grid.products().len()),
            app.grid.products().len()
        )
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if focused {
                Styles::border_focused()
            } else {
                Styles::border()
            }),
    );
    frame.render_widget(table, area);
}

fn marker_cell(product: &Product, selected: bool) -> Cell<'static> {
    let scheme = colors();
    let mark = if selected { "▸" } else { " " };
    let swatch = if product.color == ColorTag::None {
        Span::raw(" ")
    } else {
        Span::styled("█", Style::default().fg(scheme.tag_color(product.color)))
    };
    Cell::from(Line::from(vec![
        Span::styled(mark, Style::default().fg(scheme.accent).bold()),
        swatch,
    ]))
}

/// `R` rebate, `W` web transfer, `O` out of cards.
fn flags(product: &Product) -> String {
    let flag = |on: bool, c: char| if on { c } else { '·' };
    [
        flag(product.rebate.enabled, 'R'),
        flag(product.web_transfer.enabled, 'W'),
        flag(product.out_of_cards, 'O'),
    ]
    .iter()
    .collect()
}

fn truncate(text: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 2 > width {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

/// Format a price the way the catalog shows it: `$ 1.234,50`.
pub(crate) fn format_money(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{sign}$ {grouped},{:02}", cents % 100)
}

// ============================================================================
// Popups
// ============================================================================

fn render_edit_popup(frame: &mut Frame, area: Rect, app: &App, session: &EditSession) {
    let popup = bottom_rect(56, 7, area);
    frame.render_widget(Clear, popup);

    let code = app
        .grid
        .products()
        .iter()
        .find(|p| p.id == session.product())
        .map_or("?", |p| p.code.as_str());

    let value_style = if session.focused() == Focusable::Value {
        Styles::focused_control()
    } else {
        Styles::value()
    };
    let mut controls = Vec::new();
    for focusable in session.focusables() {
        let text = match focusable {
            Focusable::Value => continue,
            Focusable::Preserve => format!(
                "[{}] {}",
                if session.preserve() { "x" } else { " " },
                focusable.label()
            ),
            Focusable::Save | Focusable::Cancel => format!("[ {} ]", focusable.label()),
        };
        let style = if session.focused() == *focusable {
            Styles::focused_control()
        } else {
            Styles::text()
        };
        controls.push(Span::styled(text, style));
        controls.push(Span::raw("  "));
    }

    let mut hint = "Tab next · Enter save · Esc discard".to_string();
    if session.field() == crate::grid::EditField::Rebate {
        hint.push_str(" · r turns rebate off");
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(code.to_string(), Styles::header_title()),
            Span::styled(" · ", Styles::label()),
            Span::styled(session.field().label(), Styles::text()),
        ]),
        Line::from(vec![
            Span::styled("Value: ", Styles::label()),
            Span::styled(format!("{}▏", session.buffer()), value_style),
        ]),
        Line::from(controls),
        Line::styled(hint, Styles::text_muted()),
    ];

    let block = Block::default()
        .title(" Edit ")
        .borders(Borders::ALL)
        .border_style(Styles::border_focused());
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_filter_panel(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect_fixed(60, FilterField::ALL.len() as u16 + 4, area);
    frame.render_widget(Clear, popup);

    let panel = &app.filter_panel;
    let mut lines: Vec<Line> = FilterField::ALL
        .iter()
        .map(|field| {
            let focused = panel.focused() == *field;
            let mut value = panel.value_text(*field);
            if focused && field.is_text() {
                value.push('▏');
            }
            Line::from(vec![
                Span::styled(
                    format!("{:>14}: ", field.label()),
                    if focused {
                        Style::default().fg(colors().accent).bold()
                    } else {
                        Styles::label()
                    },
                ),
                Span::styled(
                    value,
                    if focused {
                        Styles::value()
                    } else {
                        Styles::text()
                    },
                ),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Tab field · Space change · Enter apply · Esc close",
        Styles::text_muted(),
    ));

    let block = Block::default()
        .title(" Filters ")
        .borders(Borders::ALL)
        .border_style(Styles::border_focused());
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_color_picker(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect_fixed(30, ColorTag::PALETTE.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let scheme = colors();
    let lines: Vec<Line> = ColorTag::PALETTE
        .iter()
        .map(|tag| {
            let style = if app.color_picker.highlighted() == *tag {
                Styles::focused_control()
            } else {
                Styles::text()
            };
            Line::from(vec![
                Span::styled(format!(" {} ", tag.digit()), Styles::shortcut_key()),
                Span::styled("██ ", Style::default().fg(scheme.tag_color(*tag))),
                Span::styled(tag.label(), style),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Paint {} ", app.grid.selection().len()))
        .borders(Borders::ALL)
        .border_style(Styles::border_focused());
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn overlay_block(kind: OverlayKind) -> Block<'static> {
    Block::default()
        .title(kind.title())
        .title_style(Style::default().fg(colors().accent).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors().accent))
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 85, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = Vec::new();
    for group in shortcut_groups() {
        lines.push(Line::styled(
            group.title,
            Style::default().fg(colors().primary).bold(),
        ));
        for shortcut in group.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<24}", shortcut.key), Styles::shortcut_key()),
                Span::styled(shortcut.description, Styles::text()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::styled("Esc to close", Styles::text_muted()));

    let help = Paragraph::new(lines)
        .block(overlay_block(OverlayKind::Help))
        .style(Styles::text());
    frame.render_widget(help, popup_area);
}

fn render_info_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, popup_area);

    let lines = app
        .grid
        .active_product()
        .map_or_else(
            || vec![Line::styled("No active product. Press Enter to enter the grid.", Styles::text_muted())],
            product_lines,
        );

    let info = Paragraph::new(lines)
        .block(overlay_block(OverlayKind::Info))
        .wrap(Wrap { trim: false });
    frame.render_widget(info, popup_area);
}

fn product_lines(product: &Product) -> Vec<Line<'static>> {
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:>18}: "), Styles::label()),
            Span::styled(value, Styles::value()),
        ])
    };
    let money = |value: Option<f64>| value.map_or_else(|| "-".to_string(), format_money);
    let participation = |enabled: bool, pct: Option<f64>| {
        let pct = pct.map_or_else(|| "-".to_string(), |p| format!("{}%", format_decimal(p)));
        format!("{} ({pct})", if enabled { "on" } else { "off" })
    };

    let mut lines = vec![
        row("Code", product.code.clone()),
        row("Brand", product.brand.clone().unwrap_or_default()),
        row("Description", product.description.clone()),
        row("Stock", product.stock.to_string()),
        row("Color", product.color.label().to_string()),
        row(
            "Updated",
            product
                .updated_at
                .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
        ),
        Line::from(""),
        row("Classic", money(product.classic_price)),
        row("Rebate price", money(product.rebate_price)),
        row("Gremio", money(product.gremio_price)),
        row("Best offer", money(product.best_offer)),
        row("Web transfer", money(product.web_transfer_price)),
        row("Web card", money(product.web_card_price)),
    ];
    for tier in InstallmentTier::ALL {
        lines.push(row(
            &tier.to_string(),
            format!(
                "{}  /  PVP {}",
                money(product.installment(PriceList::Web, tier)),
                money(product.installment(PriceList::Pvp, tier))
            ),
        ));
    }
    lines.extend([
        row("PVP", money(product.price(PriceList::Pvp))),
        Line::from(""),
        row(
            "Rebate",
            participation(product.rebate.enabled, product.rebate.percentage),
        ),
        row(
            "Web transfer %",
            participation(product.web_transfer.enabled, product.web_transfer.percentage),
        ),
        row(
            "Out of cards",
            if product.out_of_cards { "yes" } else { "no" }.to_string(),
        ),
    ]);
    lines
}

fn render_config_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);

    let config = &app.config;
    let settings = app.grid.settings();
    let perms = app.grid.permissions();
    let allowed: Vec<&str> = [
        (perms.edit_prices, "prices"),
        (perms.edit_rebate, "rebate"),
        (perms.edit_web_transfer, "web transfer"),
        (perms.edit_colors, "colors"),
        (perms.edit_out_of_cards, "out of cards"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:>26}: "), Styles::label()),
            Span::styled(value, Styles::value()),
        ])
    };

    let lines = vec![
        row("API", config.api.base_url.clone()),
        row("Backend", app.backend_name().to_string()),
        row(
            "May edit",
            if allowed.is_empty() {
                "nothing (read-only)".to_string()
            } else {
                allowed.join(", ")
            },
        ),
        Line::from(""),
        row(
            "Default rebate",
            format!("{}%", format_decimal(settings.defaults.rebate_percentage)),
        ),
        row(
            "Default web transfer",
            format!("{}%", format_decimal(settings.defaults.web_transfer_percentage)),
        ),
        row("Listing link", settings.listing_url.clone()),
        row("Search link", settings.search_url.clone()),
        Line::from(""),
        row("Theme", app.preferences().theme.clone()),
        row(
            "Auto-recalculate installments",
            if settings.auto_recalculate_installments {
                "on"
            } else {
                "off"
            }
            .to_string(),
        ),
        Line::from(""),
        Line::styled(
            "a toggle auto-recalculate · t next theme · Esc close",
            Styles::text_muted(),
        ),
    ];

    let block = overlay_block(OverlayKind::Config);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn render_size_warning(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(
            "Terminal too small",
            Style::default().fg(colors().warning).bold(),
        ),
        Line::from(""),
        Line::from(vec![
            Span::raw("Current: "),
            Span::styled(format!("{}x{}", area.width, area.height), Styles::text()),
        ]),
        Line::from(vec![
            Span::raw("Required: "),
            Span::styled(format!("{MIN_WIDTH}x{MIN_HEIGHT}"), Styles::shortcut_key()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

// ============================================================================
// Layout helpers
// ============================================================================

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` rectangle centered in `r`, shrunk to fit.
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// A `width` x `height` rectangle centered horizontally at the bottom of `r`.
fn bottom_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + r.height - height,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryPricingApi;
    use crate::config::{AppConfig, TuiPreferences};
    use crate::grid::{ClipboardSink, GridController, GridSettings, PageVariant};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use std::time::Duration;

    struct NoClipboard;

    impl ClipboardSink for NoClipboard {
        fn write_text(&mut self, _text: &str) -> bool {
            false
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "$ 0,00");
        assert_eq!(format_money(1234.5), "$ 1.234,50");
        assert_eq!(format_money(150_000.0), "$ 150.000,00");
        assert_eq!(format_money(1_234_567.891), "$ 1.234.567,89");
        assert_eq!(format_money(-42.0), "-$ 42,00");
    }

    #[test]
    fn test_flags() {
        let mut p = Product::new(1, "A");
        assert_eq!(flags(&p), "···");
        p.rebate.enabled = true;
        p.out_of_cards = true;
        assert_eq!(flags(&p), "R·O");
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate("Heladera no frost 400 litros", 10);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= 10);
    }

    #[test]
    fn test_fixed_rects_fit_inside() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect_fixed(60, 20, area);
        assert_eq!((r.width, r.height), (40, 10));

        let b = bottom_rect(20, 4, area);
        assert_eq!(b.y + b.height, area.height);
        assert_eq!(b.x, 10);
    }

    #[test]
    fn test_grid_draws_only_rows_in_viewport() {
        let products = (1..=40).map(|n| Product::new(n, format!("Q{n:03}"))).collect();
        let grid = GridController::new(
            PageVariant::Catalog,
            GridSettings::default(),
            Box::new(NoClipboard),
        );
        let mut app = App::new(
            grid,
            Arc::new(MemoryPricingApi::new(products)),
            AppConfig::default(),
            TuiPreferences::default(),
        )
        .with_preferences_path(None);
        app.grid.reload();
        assert!(app.wait_idle(Duration::from_secs(5)));

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let first = screen_text(&terminal);
        assert!(first.contains("Q001"));
        assert!(!first.contains("Q040"));

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        for _ in 0..39 {
            handle_key_event(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let scrolled = screen_text(&terminal);
        assert!(scrolled.contains("Q040"));
        assert!(!scrolled.contains("Q001"));
        let viewport = app.grid.viewport();
        assert!(viewport.contains(39));
        assert!(!viewport.contains(0));
    }
}
