//! Rendering. Everything here reads `App` and draws; no state changes.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use super::app::{App, MENU_ITEMS, SETTINGS, Screen, WRITABLE};
use super::browser::Entry;
use super::theme;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn render(frame: &mut Frame, app: &App) {
    let [header, body, help] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let logo = Line::from(vec![
        Span::styled(" ⚛ PHOTON", theme::logo()),
        Span::raw("  "),
        Span::styled("Image Format Converter", theme::subtitle()),
    ]);
    frame.render_widget(Paragraph::new(logo), header);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(theme::PRIMARY))
        .padding(Padding::new(2, 2, 1, 1));
    frame.render_widget(
        Paragraph::new(body_lines(app))
            .block(block)
            .wrap(Wrap { trim: false }),
        body,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(help_text(app.screen), theme::help())),
        help,
    );
}

fn body_lines(app: &App) -> Vec<Line<'static>> {
    match app.screen {
        Screen::Menu => menu(app),
        Screen::SelectInput => browser(app, "Select Input Image"),
        Screen::SelectFormat => format_select(app),
        Screen::Quality => quality(app),
        Screen::Confirm => confirm(app),
        Screen::Converting => vec![
            title("Converting..."),
            Line::default(),
            Line::from(format!(
                "{} Processing {}",
                spinner(app),
                file_name(&app.input_file)
            )),
        ],
        Screen::Complete => complete(app),
        Screen::Settings => settings(app),
        Screen::SelectOutputDir => output_dir(app),
        Screen::BatchSelect => batch_select(app),
        Screen::BatchConfirm => batch_confirm(app),
        Screen::BatchConverting => vec![
            title("Converting..."),
            Line::default(),
            Line::from(format!(
                "{} Processing {} images...",
                spinner(app),
                app.selected.len()
            )),
        ],
        Screen::BatchComplete => batch_complete(app),
        Screen::RecentFiles => recent(app),
    }
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Menu => "↑/↓: navigate • enter: select • q: quit",
        Screen::SelectInput => "↑/↓: navigate • enter: select • tab: toggle hidden • esc: back",
        Screen::SelectFormat => "←/→: select format • enter: confirm • esc: back",
        Screen::Quality => "←/→: adjust quality • enter: confirm • esc: back",
        Screen::Settings => "↑/↓: navigate • ←/→: adjust • enter: toggle • esc: back",
        Screen::SelectOutputDir => "↑/↓: navigate • enter: open dir • s: select current • esc: back",
        Screen::BatchSelect => {
            "↑/↓: navigate • space: select • a: all • n: none • c: continue • esc: back"
        }
        Screen::Confirm | Screen::BatchConfirm => "y: confirm • n: cancel",
        Screen::RecentFiles => "↑/↓: navigate • enter: select • esc: back",
        Screen::Converting | Screen::BatchConverting => "ctrl+c: quit",
        Screen::Complete | Screen::BatchComplete => "q/esc: back to menu",
    }
}

fn title(text: &'static str) -> Line<'static> {
    Line::styled(text, theme::title())
}

fn subtitle(text: String) -> Line<'static> {
    Line::styled(text, theme::subtitle())
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.tick % SPINNER.len()]
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Cursor marker plus the row's style.
fn cursor(active: bool, style: Style) -> (Span<'static>, Style) {
    if active {
        (Span::styled("▸ ", theme::selected()), theme::selected())
    } else {
        (Span::raw("  "), style)
    }
}

fn menu(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![title("Main Menu"), Line::default()];
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let (marker, style) = cursor(i == app.menu_index, theme::item());
        lines.push(Line::from(vec![marker, Span::styled(*item, style)]));
    }
    lines
}

fn entry_style(entry: &Entry) -> (&'static str, Style) {
    if entry.is_dir {
        ("📁 ", theme::dir())
    } else if entry.is_image {
        ("🖼  ", theme::image_file())
    } else {
        ("📄 ", theme::item())
    }
}

fn position_line(lines: &mut Vec<Line<'static>>, app: &App, rows: usize) {
    let total = app.browser.entries.len();
    if total > rows {
        lines.push(Line::default());
        lines.push(subtitle(format!("({}/{})", app.browser.index + 1, total)));
    }
}

fn browser(app: &App, heading: &'static str) -> Vec<Line<'static>> {
    let rows = app.browser_rows();
    let mut lines = vec![
        title(heading),
        subtitle(app.browser.dir.display().to_string()),
        Line::default(),
    ];
    for (i, entry) in app.browser.visible(rows) {
        let (icon, style) = entry_style(entry);
        let (marker, style) = cursor(i == app.browser.index, style);
        lines.push(Line::from(vec![
            marker,
            Span::raw(icon),
            Span::styled(entry.name.clone(), style),
        ]));
    }
    position_line(&mut lines, app, rows);
    lines
}

fn format_select(app: &App) -> Vec<Line<'static>> {
    let badges: Vec<Span<'static>> = WRITABLE
        .iter()
        .enumerate()
        .flat_map(|(i, format)| {
            let style = if i == app.format_index {
                theme::badge_selected()
            } else {
                theme::badge()
            };
            [
                Span::styled(
                    format!(" {} ", format.primary_extension().to_uppercase()),
                    style,
                ),
                Span::raw(" "),
            ]
        })
        .collect();

    let input = if app.batch_mode {
        format!("Input: {} images", app.selected.len())
    } else {
        format!("Input: {}", file_name(&app.input_file))
    };

    vec![
        title("Select Output Format"),
        Line::default(),
        subtitle(input),
        Line::default(),
        Line::from(badges),
        Line::default(),
        subtitle(app.target_format().description().to_string()),
    ]
}

pub fn quality_hint(quality: u8) -> &'static str {
    match quality {
        0..30 => "Very low quality, small file size",
        30..60 => "Low quality, reduced file size",
        60..80 => "Good balance of quality and size",
        80..95 => "High quality, larger file size",
        _ => "Maximum quality, largest file size",
    }
}

fn quality(app: &App) -> Vec<Line<'static>> {
    const WIDTH: usize = 40;
    let filled = app.quality as usize * WIDTH / 100;
    vec![
        title("Set Quality"),
        Line::default(),
        Line::from(vec![
            Span::raw("["),
            Span::styled("=".repeat(filled), theme::slider_filled()),
            Span::styled("-".repeat(WIDTH - filled), theme::slider_track()),
            Span::raw(format!("]  {}%", app.quality)),
        ]),
        Line::default(),
        subtitle(quality_hint(app.quality).to_string()),
    ]
}

fn confirm(app: &App) -> Vec<Line<'static>> {
    let format = app.target_format().primary_extension().to_uppercase();
    let mut lines = vec![
        title("Confirm Conversion"),
        Line::default(),
        Line::from(vec![
            Span::raw("🖼  Input:   "),
            Span::styled(file_name(&app.input_file), theme::image_file()),
        ]),
        Line::from(vec![
            Span::raw("📄 Output:  "),
            Span::styled(app.output_file.display().to_string(), theme::image_file()),
        ]),
        Line::from(vec![
            Span::raw("📁 Format:  "),
            Span::styled(format!(" {format} "), theme::badge()),
        ]),
        Line::from(format!("⚙  Quality: {}%", app.quality)),
        Line::default(),
    ];
    if app.overwrite {
        lines.push(Line::styled(
            "⚠ Output file already exists and will be overwritten",
            theme::error(),
        ));
    }
    lines.push(Line::styled(
        "Proceed with conversion? (y/n)",
        theme::warning(),
    ));
    lines
}

fn complete(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match &app.outcome {
        Some(Ok(done)) => {
            lines.push(Line::styled("✓ Conversion Complete", theme::success()));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::raw("📄 Output: "),
                Span::styled(done.report.output.display().to_string(), theme::image_file()),
            ]));
            lines.push(Line::from(format!(
                "📊 Size:   {:.1} KB",
                done.report.output_size as f64 / 1024.0
            )));
            if let Some((w, h)) = done.dimensions {
                lines.push(Line::from(format!("📐 Pixels: {w}x{h}")));
            }
        }
        Some(Err(message)) => {
            lines.push(Line::styled("✗ Conversion Failed", theme::error()));
            lines.push(Line::default());
            lines.push(Line::from(message.clone()));
        }
        None => {}
    }
    lines.push(Line::default());
    lines.push(Line::from("Press any key to continue..."));
    lines
}

fn bool_icon(value: bool) -> Span<'static> {
    if value {
        Span::styled("●", theme::success())
    } else {
        Span::styled("○", Style::new().fg(theme::MUTED))
    }
}

fn settings(app: &App) -> Vec<Line<'static>> {
    let config = &app.config;
    let mut lines = vec![title("Settings"), Line::default()];
    for (i, name) in SETTINGS.iter().enumerate() {
        let (marker, style) = cursor(i == app.setting_index, theme::item());
        let value = match i {
            0 => Span::raw(format!("◀ {}% ▶", config.default_quality)),
            1 => Span::raw(format!("◀ {} ▶", config.default_format)),
            2 => Span::raw(config.output_dir.display().to_string()),
            3 => bool_icon(config.show_hidden_files),
            4 => bool_icon(config.confirm_overwrite),
            _ => Span::raw(""),
        };
        let label = if value.content.is_empty() {
            (*name).to_string()
        } else {
            format!("{name:<20} ")
        };
        lines.push(Line::from(vec![marker, Span::styled(label, style), value]));
    }
    lines
}

fn output_dir(app: &App) -> Vec<Line<'static>> {
    let mut lines = browser(app, "Select Output Directory");
    lines.push(Line::default());
    lines.push(subtitle("Press 's' to select this directory".to_string()));
    lines
}

fn batch_select(app: &App) -> Vec<Line<'static>> {
    let rows = app.browser_rows();
    let mut lines = vec![
        title("Batch Select Images"),
        subtitle(app.browser.dir.display().to_string()),
        Line::styled(
            format!("Selected: {} images", app.selected.len()),
            theme::warning(),
        ),
        Line::default(),
    ];
    for (i, entry) in app.browser.visible(rows) {
        let (icon, style) = entry_style(entry);
        let (marker, style) = cursor(i == app.browser.index, style);
        let checkbox = if !entry.is_image {
            Span::raw("    ")
        } else if app.selected.contains(&entry.path) {
            Span::styled("[✓] ", theme::success())
        } else {
            Span::raw("[ ] ")
        };
        lines.push(Line::from(vec![
            marker,
            checkbox,
            Span::raw(icon),
            Span::styled(entry.name.clone(), style),
        ]));
    }
    position_line(&mut lines, app, rows);
    lines
}

fn batch_confirm(app: &App) -> Vec<Line<'static>> {
    let format = app.target_format().primary_extension().to_uppercase();
    vec![
        title("Confirm Batch Conversion"),
        Line::default(),
        Line::from(vec![
            Span::raw("🖼  Files:   "),
            Span::styled(format!("{} images", app.selected.len()), theme::warning()),
        ]),
        Line::from(vec![
            Span::raw("📄 Format:  "),
            Span::styled(format!(" {format} "), theme::badge()),
        ]),
        Line::from(format!("⚙  Quality: {}%", app.quality)),
        Line::from(vec![
            Span::raw("📁 Output:  "),
            Span::styled(app.config.output_dir.display().to_string(), theme::subtitle()),
        ]),
        Line::default(),
        Line::styled("Proceed with batch conversion? (y/n)", theme::warning()),
    ]
}

fn batch_complete(app: &App) -> Vec<Line<'static>> {
    let total = app.batch_results.len();
    let converted = app.batch_results.iter().filter(|r| r.is_ok()).count();

    let mut lines = vec![
        if converted == total {
            Line::styled("✓ Batch Complete", theme::success())
        } else {
            Line::styled("⚠ Batch Complete (with errors)", theme::warning())
        },
        Line::default(),
        Line::from(format!("🖼  Converted: {converted}/{total} images")),
        Line::from(vec![
            Span::raw("📁 Output:    "),
            Span::styled(app.batch_output_dir.display().to_string(), theme::subtitle()),
        ]),
        Line::default(),
    ];
    for failed in app.batch_results.iter().filter(|r| !r.is_ok()) {
        lines.push(Line::from(vec![
            Span::styled("✗ ", theme::error()),
            Span::raw(format!(
                "{}: {}",
                file_name(&failed.input),
                failed.error.as_deref().unwrap_or_default()
            )),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from("Press any key to continue..."));
    lines
}

fn recent(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![title("Recent Files"), Line::default()];
    if app.config.recent_files.is_empty() {
        lines.push(subtitle("No recent files".to_string()));
        return lines;
    }
    for (i, path) in app.config.recent_files.iter().enumerate() {
        let exists = app.recent_exists.get(i).copied().unwrap_or(false);
        let base = if exists {
            theme::image_file()
        } else {
            theme::dimmed()
        };
        let (marker, style) = cursor(i == app.recent_index, base);
        let style = if exists { style } else { theme::dimmed() };
        lines.push(Line::from(vec![
            marker,
            Span::styled(path.display().to_string(), style),
        ]));
    }
    lines
}
