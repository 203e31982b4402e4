//! Drawing. Reads [`App`] state only.

use super::app::{App, InputMode};
use super::dialog::{DialogKind, MessageDialog, PathPrompt};
use crate::desktop::{Desktop, PROGRAM_NAME};
use crate::editor::{EditTarget, EditorState, FieldId, FieldKind, Section, LIST_PLACEHOLDER};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

const CURSOR: &str = "▏";
const KEYS_PANE_WIDTH: u16 = 26;

pub fn draw<D: Desktop>(frame: &mut Frame, app: &App<D>) {
    let general = &app.config().general;
    let full = frame.area();
    let area = Rect {
        width: full.width.min(general.window_width),
        height: full.height.min(general.window_height),
        ..full
    };

    let [toolbar, tabs, subtabs, form, help, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_toolbar(frame, toolbar, app);
    draw_tabs(frame, tabs, subtabs, app.editor().section());
    if app.editor().section() == Section::References {
        draw_references(frame, form, app.editor());
    } else {
        let fields = app.editor().section().fields();
        draw_fields(frame, form, app.editor(), fields);
    }
    draw_help(frame, help, app);
    draw_status(frame, status, app);

    if let Some(prompt) = app.prompt() {
        draw_prompt(frame, area, prompt);
    }
    if let Some(dialog) = app.dialog() {
        draw_dialog(frame, area, dialog);
    }
}

fn draw_toolbar<D: Desktop>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let mut spans = vec![Span::styled(
        format!(" {} ", PROGRAM_NAME),
        Style::new().add_modifier(Modifier::BOLD),
    )];
    for item in app.toolbar() {
        let style = if item.enabled {
            Style::new()
        } else {
            Style::new().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(item.key, style.fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {}", item.label), style));
    }
    frame.render_widget(Line::from(spans), area);
}

fn draw_tabs(frame: &mut Frame, tabs: Rect, subtabs: Rect, section: Section) {
    let widget = Tabs::new(Section::TABS)
        .select(section.tab_index())
        .highlight_style(Style::new().reversed())
        .divider("|");
    frame.render_widget(widget, tabs);

    if section.is_related_work() {
        let selected = usize::from(section == Section::Synthesis);
        let widget = Tabs::new([Section::References.title(), Section::Synthesis.title()])
            .select(selected)
            .highlight_style(Style::new().underlined())
            .padding("   ", " ");
        frame.render_widget(widget, subtabs);
    }
}

fn field_height(editor: &EditorState, field: FieldId) -> u16 {
    match field.kind() {
        FieldKind::Line => 3,
        FieldKind::Text => 6,
        FieldKind::List | FieldKind::Keys => {
            let entries = editor.list(field).map_or(0, |l| l.entries().len());
            (entries as u16).clamp(1, 6) + 2
        }
    }
}

/// First field to draw so that the focused one is visible.
fn scroll_start(heights: &[u16], focus: usize, available: u16) -> usize {
    let mut start = 0;
    while start < focus && heights[start..=focus].iter().sum::<u16>() > available {
        start += 1;
    }
    start
}

fn draw_fields(frame: &mut Frame, area: Rect, editor: &EditorState, fields: &[FieldId]) {
    let heights: Vec<u16> = fields.iter().map(|f| field_height(editor, *f)).collect();
    let focus = editor
        .focused()
        .and_then(|f| fields.iter().position(|x| *x == f))
        .unwrap_or(0);

    let mut y = area.y;
    for (field, height) in fields
        .iter()
        .zip(&heights)
        .skip(scroll_start(&heights, focus, area.height))
    {
        let remaining = area.bottom().saturating_sub(y);
        if remaining < 3 {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, (*height).min(remaining));
        draw_field(frame, rect, editor, *field);
        y += rect.height;
    }
}

fn field_block(editor: &EditorState, field: FieldId) -> Block<'static> {
    let editing = editor
        .edit()
        .is_some_and(|e| edit_field(&e.target) == Some(field));
    let style = if editing {
        Style::new().fg(Color::Cyan)
    } else if editor.focused() == Some(field) {
        Style::new().fg(Color::Yellow)
    } else {
        Style::new()
    };
    Block::bordered()
        .title(format!(" {} ", field.label()))
        .border_style(style)
}

fn edit_field(target: &EditTarget) -> Option<FieldId> {
    match target {
        EditTarget::Field(field) | EditTarget::ListEntry(field, _) => Some(*field),
        EditTarget::ReferenceKey(_) => Some(FieldId::ReferenceKeys),
    }
}

fn draw_field(frame: &mut Frame, area: Rect, editor: &EditorState, field: FieldId) {
    let block = field_block(editor, field);
    let edit = editor.edit();

    let text: Text = match field.kind() {
        FieldKind::Line | FieldKind::Text => {
            let value = match edit {
                Some(e) if e.target == EditTarget::Field(field) => format!("{}{}", e.text, CURSOR),
                _ => editor.text(field).unwrap_or_default().to_string(),
            };
            Text::from(value)
        }
        FieldKind::List => {
            let Some(list) = editor.list(field) else {
                return;
            };
            if list.shows_placeholder() {
                Text::from(Line::from(LIST_PLACEHOLDER.dim().italic()))
            } else {
                let lines: Vec<Line> = list
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(idx, entry)| {
                        let selected = list.selected() == Some(idx);
                        let content = match edit {
                            Some(e) if e.target == EditTarget::ListEntry(field, idx) => {
                                format!("{}{}", e.text, CURSOR)
                            }
                            _ => entry.clone(),
                        };
                        let marker = if selected { "› " } else { "  " };
                        let line = Line::from(format!("{}{}", marker, content));
                        if selected {
                            line.bold()
                        } else {
                            line
                        }
                    })
                    .collect();
                Text::from(lines)
            }
        }
        FieldKind::Keys => return draw_keys(frame, area, editor),
    };

    let inner_height = area.height.saturating_sub(2);
    let scroll = match field.kind() {
        FieldKind::List => editor
            .list(field)
            .and_then(|l| l.selected())
            .map_or(0, |idx| (idx as u16 + 1).saturating_sub(inner_height)),
        _ => 0,
    };
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

fn draw_keys(frame: &mut Frame, area: Rect, editor: &EditorState) {
    let references = editor.references();
    let edit = editor.edit();
    let lines: Vec<Line> = if references.is_empty() {
        vec![Line::from("Press 'a' to add a reference".dim().italic())]
    } else {
        references
            .keys()
            .iter()
            .map(|key| {
                let selected = references.current() == Some(key.as_str());
                match edit {
                    Some(e) if selected && matches!(e.target, EditTarget::ReferenceKey(_)) => {
                        Line::from(format!("› {}{}", e.text, CURSOR)).fg(Color::Cyan)
                    }
                    _ if selected => Line::from(format!("› {}", key)).reversed(),
                    _ => Line::from(format!("  {}", key)),
                }
            })
            .collect()
    };
    let block = field_block(editor, FieldId::ReferenceKeys)
        .title_bottom(format!(" {} ", references.len()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_references(frame: &mut Frame, area: Rect, editor: &EditorState) {
    let [keys, detail] = Layout::horizontal([
        Constraint::Length(KEYS_PANE_WIDTH),
        Constraint::Min(10),
    ])
    .areas(area);
    draw_keys(frame, keys, editor);

    match editor.references().current() {
        Some(key) => {
            let fields = &Section::References.fields()[1..];
            let [title, rest] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(detail);
            frame.render_widget(Line::from(Span::from(format!(" Reference {}", key)).bold()), title);
            draw_fields(frame, rest, editor, fields);
        }
        None => frame.render_widget(
            Paragraph::new("No reference selected.".dim()).block(Block::bordered()),
            detail,
        ),
    }
}

fn draw_help<D: Desktop>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let text = match app.input_mode() {
        InputMode::Dialog => "↑/↓ scroll · c copy · Esc close".to_string(),
        InputMode::Prompt => "Tab complete · Enter confirm · Esc cancel".to_string(),
        InputMode::Editing => "Enter commit · Alt-Enter new line · Esc cancel".to_string(),
        InputMode::Normal => app
            .editor()
            .focused()
            .map(|f| f.tooltip().to_string())
            .unwrap_or_default(),
    };
    frame.render_widget(Line::from(Span::from(text).italic()), area);
}

fn draw_status<D: Desktop>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let line = match app.status() {
        Some(status) => Line::from(vec![
            Span::styled(
                status.at.format("[%H:%M:%S] ").to_string(),
                Style::new().add_modifier(Modifier::DIM),
            ),
            Span::raw(status.text.clone()),
        ]),
        None => Line::from("F1 help · Ctrl-Q quit".dim()),
    };
    frame.render_widget(line.reversed(), area);
}

fn centered_rect(percent_x: u16, height: Constraint, r: Rect) -> Rect {
    let [_, row, _] =
        Layout::vertical([Constraint::Fill(1), height, Constraint::Fill(1)]).areas(r);
    let [_, rect, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(row);
    rect
}

fn draw_dialog(frame: &mut Frame, area: Rect, dialog: &MessageDialog) {
    let rect = centered_rect(80, Constraint::Percentage(70), area);
    let color = match dialog.kind {
        DialogKind::Info => Color::Green,
        DialogKind::Warning => Color::Yellow,
        DialogKind::Error => Color::Red,
    };
    let hint = if dialog.can_copy() {
        " Esc close · c copy "
    } else {
        " Esc close "
    };
    let block = Block::bordered()
        .title(format!(" {} ", dialog.title))
        .title_bottom(hint)
        .border_style(Style::new().fg(color));

    let mut lines = Vec::new();
    if !dialog.heading.is_empty() {
        lines.push(Line::from(Span::from(dialog.heading.clone()).bold()));
        lines.push(Line::default());
    }
    lines.extend(dialog.body.lines().map(|l| Line::from(l.to_string())));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((dialog.scroll, 0)),
        rect,
    );
}

fn draw_prompt(frame: &mut Frame, area: Rect, prompt: &PathPrompt) {
    let rect = centered_rect(70, Constraint::Length(3), area);
    let block = Block::bordered()
        .title(prompt.purpose.title())
        .title_bottom(" Tab complete · Enter confirm · Esc cancel ")
        .border_style(Style::new().fg(Color::Cyan));
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(format!("{}{}", prompt.input, CURSOR)).block(block),
        rect,
    );
}
