use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::avatar::Avatar;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::selection::{LoadState, View};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use mlb_api::{Game, StatRow};

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_header(f, layout.header, app);
            }

            let mut main = layout.main;
            if app.state.show_logs && main.height > 10 {
                let [content, logs] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]).areas(main);
                main = content;
                draw_log_pane(f, logs);
            }

            if app.state.show_help {
                draw_help(f, main);
            } else {
                match app.state.selection.view() {
                    View::Schedule => draw_schedule(f, main, app),
                    View::Matchup => draw_matchup(f, main, app),
                }
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let title = Line::from(vec![
        Span::styled(" MLB ", Style::default().fg(Color::Black).bg(Color::Blue).add_modifier(Modifier::BOLD)),
        Span::raw(" dugout — matchups & batting logs  "),
        Span::styled(
            app.state.selection.date.format("%a %Y-%m-%d").to_string(),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let left = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(left, header[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

// ---------------------------------------------------------------------------
// Schedule view — date axis + slate of games
// ---------------------------------------------------------------------------

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Schedule ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: h/l=day  H/L=week  t=today  j/k=move  Enter=matchup  r=refresh")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let selection = &app.state.selection;
    let games = match &selection.schedule {
        LoadState::Idle | LoadState::Loading => {
            return draw_placeholder(f, content, "Loading games...");
        }
        LoadState::Failed(message) => {
            return draw_placeholder(f, content, &format!("Schedule load failed:\n{message}"));
        }
        LoadState::Loaded(games) => games,
    };

    if games.is_empty() {
        draw_placeholder(
            f,
            content,
            &format!("No games scheduled for {}.", selection.date.format("%Y-%m-%d")),
        );
        return;
    }

    let visible = content.height as usize;
    let skip = selection.schedule_cursor.saturating_sub(visible.saturating_sub(1));
    let mut lines = Vec::with_capacity(games.len());
    for (idx, game) in games.iter().enumerate().skip(skip).take(visible) {
        let marker = if idx == selection.schedule_cursor { ">" } else { " " };
        let line = format!(
            "{marker} {:<8} {:>3} @ {:<3}  {:<24} {}",
            start_time_label(game),
            game.away.badge(),
            game.home.badge(),
            clip(&game.venue, 24),
            game.pitchers_label(),
        );
        let style = if idx == selection.schedule_cursor {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(line, style)));
    }

    f.render_widget(Paragraph::new(lines), content);
}

// ---------------------------------------------------------------------------
// Matchup view — game header + roster grid + batting-log table
// ---------------------------------------------------------------------------

fn draw_matchup(f: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.state.selection.current_game() else {
        return;
    };

    let [header, content] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(area);
    draw_matchup_header(f, header, game);

    let (roster_area, log_area) = if content.width >= 90 {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(content);
        (left, right)
    } else {
        let [top, bottom] =
            Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)]).areas(content);
        (top, bottom)
    };

    draw_roster(f, roster_area, app);
    draw_recent_games(f, log_area, app);
}

fn draw_matchup_header(f: &mut Frame, area: Rect, game: &Game) {
    let block = default_border(Color::White);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} @ {} ", game.away.badge(), game.home.badge()),
                Style::default().fg(Color::Black).bg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", game.matchup_label())),
        ]),
        Line::from(Span::styled(
            format!(
                "{} • {}  |  {}  |  Esc=change game  j/k=move  Enter=batting log",
                game.venue,
                start_time_label(game),
                game.pitchers_label()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_roster(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Roster (this game only) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some((roster, cursor)) = app.state.selection.roster() else {
        return;
    };

    let players = match roster {
        LoadState::Idle | LoadState::Loading => {
            return draw_placeholder(f, inner, "Loading players...");
        }
        LoadState::Failed(message) => {
            return draw_placeholder(f, inner, &format!("Roster load failed:\n{message}"));
        }
        LoadState::Loaded(players) => players,
    };

    if players.is_empty() {
        draw_placeholder(f, inner, "No roster available for this game.");
        return;
    }

    let visible = inner.height as usize;
    let skip = cursor.saturating_sub(visible.saturating_sub(1));
    let selected_id = app.state.selection.selected_player().and_then(|p| p.id);
    let mut lines = Vec::with_capacity(players.len());
    for (idx, player) in players.iter().enumerate().skip(skip).take(visible) {
        let marker = if idx == cursor { ">" } else { " " };
        let badge = Avatar::resolve(player);
        let text = format!(
            "{marker} [{:<2}] {:<3} {:<24} {}",
            badge.label(),
            player.team_abbr,
            clip(&player.name, 24),
            player.pos,
        );
        let style = if idx == cursor {
            Style::default().fg(Color::Yellow)
        } else if player.id.is_some() && player.id == selected_id {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_recent_games(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Recent Games ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(player) = app.state.selection.selected_player() else {
        draw_placeholder(f, inner, "Pick a player from the roster.");
        return;
    };

    let mut lines = Vec::new();
    let avatar = Avatar::resolve(player);
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} ", player.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} • {}", player.pos, player.team_abbr),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    if let Some(url) = avatar.link() {
        lines.push(Line::from(Span::styled(
            format!("headshot: {url}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    match app.state.selection.logs() {
        Some(LoadState::Idle | LoadState::Loading) | None => {
            lines.push(Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Some(LoadState::Failed(message)) => {
            lines.push(Line::from(Span::styled(
                format!("Game log load failed: {message}"),
                Style::default().fg(Color::Red),
            )));
        }
        Some(LoadState::Loaded(rows)) if rows.is_empty() => {
            lines.push(Line::from(Span::styled(
                "No games logged this season.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Some(LoadState::Loaded(_)) => {
            lines.push(Line::from(Span::styled(
                format!(
                    "{:<10}  {:<20}  {:>2} {:>2} {:>2} {:>2} {:>2}",
                    "Date", "Opp", "AB", "H", "HR", "BB", "TB"
                ),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            for row in app.state.selection.visible_log_rows() {
                lines.push(Line::from(format_stat_row(row)));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn format_stat_row(row: &StatRow) -> String {
    format!(
        "{:<10}  {:<20}  {:>2} {:>2} {:>2} {:>2} {:>2}",
        clip(&row.date, 10),
        clip(&row.opp, 20),
        row.ab,
        row.h,
        row.hr,
        row.bb,
        row.tb,
    )
}

// ---------------------------------------------------------------------------
// Overlays and shared bits
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    draw_placeholder(
        f,
        area,
        "dugout keys\n\n\
         q=quit  ?=help  f=full screen  \"=log pane\n\
         Schedule: h/l=day  H/L=week  t=today  j/k=move  Enter=open matchup  r=refresh\n\
         Matchup:  j/k=move  Enter=batting log  Esc=back to schedule\n\n\
         Esc or ? to close",
    );
}

fn draw_log_pane(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Logs ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(TuiLoggerWidget::default(), inner);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn start_time_label(game: &Game) -> String {
    game.time
        .map(|t| t.with_timezone(&Local).format("%I:%M%p").to_string())
        .unwrap_or_else(|| "TBD".to_owned())
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
