use std::path::PathBuf;
use std::time::Duration;

use termstack::core::event::{Key, KeyCode, KeyEvent};
use termstack::settings;
use termstack::tui::terminal_guard::install_termination_signals;
use termstack::tui::TerminalDriver;
use termstack::ui::core::geom::{Pos, Rect};
use termstack::ui::core::id::Id;
use termstack::ui::core::painter::Painter;
use termstack::ui::core::style::{Color, Style};
use termstack::ui::menu::{
    CheckStyle, MenuBar, MenuEntry, MenuGroup, MenuKey, MenuOptions, MenuTree,
};
use termstack::ui::widgets::label::Label;
use termstack::{Application, EventCx, EventResult, Result, TopLevel, View};

fn main_id() -> Id {
    Id::named("termstack-demo.main")
}

/// Dialog body: shows its lines and stops its dialog on Enter or Esc.
struct Message {
    lines: Vec<String>,
}

impl View for Message {
    fn render(&mut self, painter: &mut Painter, area: Rect) {
        let style = Style::colors(Color::Indexed(0), Color::Indexed(7));
        painter.fill_rect(area, style);
        for (row, line) in self.lines.iter().enumerate().take(area.h as usize) {
            let pos = Pos::new(area.x + 1, area.y + row as u16);
            painter.text_clipped(pos, line.clone(), style, area);
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, cx: &mut EventCx) -> EventResult {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                cx.request_stop();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}

fn message_dialog(title: &str, lines: &[&str]) -> TopLevel {
    let width = lines.iter().map(|l| l.len() as u16).max().unwrap_or(0) + 4;
    let height = lines.len() as u16 + 2;
    TopLevel::dialog(title, width.max(24), height).with_child(
        Message {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        },
        Rect::new(0, 0, width.max(24), lines.len() as u16),
    )
}

fn find_entry(tree: &MenuTree, title: &str) -> Option<MenuKey> {
    let mut pending: Vec<MenuKey> = tree.bar().to_vec();
    while let Some(key) = pending.pop() {
        if tree.entry(key).is_some_and(|e| e.title() == title) {
            return Some(key);
        }
        pending.extend_from_slice(tree.children(key));
    }
    None
}

fn toggle_single_frame(app: &mut Application) -> Result<()> {
    app.with_menu_bar(main_id(), |bar, _| {
        let on = !bar.options().single_frame_submenus();
        bar.options_mut().set_single_frame_submenus(on);
        if let Some(key) = find_entry(bar.tree(), "_Single-frame submenus") {
            bar.tree_mut().set_checked(key, on);
        }
    })?;
    Ok(())
}

fn select_speed(app: &mut Application, title: &'static str) -> Result<()> {
    app.with_menu_bar(main_id(), |bar, _| {
        if let Some(key) = find_entry(bar.tree(), title) {
            bar.tree_mut().check_radio(key);
        }
    })?;
    Ok(())
}

fn build_menu(specifier: char) -> MenuTree {
    let file = MenuGroup::new("_File")
        .entry(
            MenuEntry::new("_About...")
                .help("Show a modal dialog")
                .on_action(|app| {
                    app.run(message_dialog(
                        "About",
                        &["termstack demo", "", "Enter or Esc closes this dialog."],
                    ))?;
                    Ok(())
                }),
        )
        .entry(MenuEntry::new("_Disabled").enabled(false))
        .separator()
        .entry(
            MenuEntry::new("_Quit")
                .shortcut(Key::ctrl('q'))
                .on_action(|app| {
                    app.request_stop(Some(main_id()))?;
                    Ok(())
                }),
        );

    let speed = MenuGroup::new("_Speed")
        .entry(
            MenuEntry::new("_Slow")
                .check_style(CheckStyle::Radio)
                .on_action(|app| select_speed(app, "_Slow")),
        )
        .entry(
            MenuEntry::new("_Normal")
                .check_style(CheckStyle::Radio)
                .checked(true)
                .on_action(|app| select_speed(app, "_Normal")),
        )
        .entry(
            MenuEntry::new("_Fast")
                .check_style(CheckStyle::Radio)
                .on_action(|app| select_speed(app, "_Fast")),
        );

    let options = MenuGroup::new("_Options")
        .entry(
            MenuEntry::new("_Single-frame submenus")
                .check_style(CheckStyle::Checkbox)
                .on_action(toggle_single_frame),
        )
        .group(speed);

    let help = MenuGroup::command(MenuEntry::new("_Help").on_action(|app| {
        app.run(message_dialog(
            "Help",
            &["F9 opens the menu.", "Alt+letter jumps to a menu.", "Ctrl+Q quits."],
        ))?;
        Ok(())
    }));

    MenuTree::with_specifier(vec![file, options, help], specifier)
}

fn parse_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--settings" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let settings_path = parse_args();
    let settings = settings::load_or_default(settings_path.as_deref());
    let _logging = termstack::logging::init(None, &settings.log_filter);

    let driver = TerminalDriver::new(&settings)?;
    let restorer = driver.restorer();
    let mut app = Application::new(Box::new(driver), settings.clone());
    app.set_error_handler(|err| {
        tracing::error!(error = %err, "demo callback failed");
        !err.is_invariant_violation()
    });

    #[cfg(unix)]
    {
        let invoker = app.invoker();
        install_termination_signals(restorer, move |_| {
            let _ = invoker.try_invoke(|app| {
                for id in app.stack_ids().into_iter().rev() {
                    app.request_stop(Some(id))?;
                }
                Ok(())
            });
        })?;
    }
    #[cfg(not(unix))]
    let _ = restorer;

    let ticker = app.invoker();
    std::thread::spawn(move || {
        let mut ticks: u64 = 0;
        loop {
            std::thread::sleep(Duration::from_secs(1));
            ticks += 1;
            let sent = ticker.invoke(move |app| {
                if let Some(view) = app.view_mut(main_id()) {
                    view.set_title(format!("termstack demo, {ticks}s"));
                }
                Ok(())
            });
            if sent.is_err() {
                break;
            }
        }
    });

    let bar = MenuBar::new(build_menu(settings.menu.hotkey_specifier))
        .with_options(MenuOptions::from_settings(&settings.menu));
    let main = TopLevel::new("termstack demo")
        .with_id(main_id())
        .bordered(true)
        .with_menu_bar(bar)
        .with_child(
            Label::new("F9 or a click opens the menu bar.\nCtrl+Q quits."),
            Rect::new(1, 1, 60, 2),
        );

    app.run(main)?;
    Ok(())
}
