use super::*;
use crate::core::event::MouseEvent;
use crate::ui::menu::model::{MenuEntry, MenuGroup};
use crate::ui::mouse::MouseGrab;
use crate::ui::view::Effect;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const SCREEN: Rect = Rect::new(0, 0, 60, 20);

fn file_menu() -> MenuGroup {
    MenuGroup::new("_File")
        .entry(MenuEntry::new("_Open").on_action(|_| Ok(())))
        .entry(MenuEntry::new("_Save").enabled(false).on_action(|_| Ok(())))
        .separator()
        .group(
            MenuGroup::new("_Recent")
                .entry(MenuEntry::new("_One").on_action(|_| Ok(())))
                .entry(MenuEntry::new("_Two").on_action(|_| Ok(()))),
        )
        .entry(MenuEntry::new("_Quit").on_action(|_| Ok(())))
}

fn edit_menu() -> MenuGroup {
    MenuGroup::new("_Edit")
        .entry(MenuEntry::new("_Copy").on_action(|_| Ok(())))
        .entry(MenuEntry::new("C_ut").on_action(|_| Ok(())))
}

fn bar_with(groups: Vec<MenuGroup>) -> MenuBar {
    let mut bar = MenuBar::new(MenuTree::new(groups));
    bar.layout(Rect::new(0, 0, SCREEN.w, 1), SCREEN);
    bar
}

fn bar() -> MenuBar {
    bar_with(vec![file_menu(), edit_menu()])
}

fn cx() -> EventCx {
    EventCx::new(SCREEN)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::plain(code)
}

fn alt(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::ALT)
}

/// Replays grab/release effects onto a capture slot.
fn replay(effects: &[Effect], grab: &mut MouseGrab) {
    for effect in effects {
        match effect {
            Effect::GrabMouse(id) => {
                grab.grab(*id);
            }
            Effect::ReleaseMouse(id) => {
                grab.release_if(*id);
            }
            _ => {}
        }
    }
}

fn scheduled(cx: &EventCx) -> usize {
    cx.effects()
        .iter()
        .filter(|e| matches!(e, Effect::Idle(_)))
        .count()
}

fn mouse(bar: &mut MenuBar, kind: MouseEventKind, x: u16, y: u16, cx: &mut EventCx) -> EventResult {
    let event = ViewMouse::from_event(&MouseEvent::new(kind, x, y), bar.frame());
    bar.handle_mouse(&event, cx)
}

#[test]
fn open_menu_enters_popup_state_and_grabs_the_mouse() {
    let mut bar = bar();
    let mut cx = cx();
    assert_eq!(bar.state(), MenuState::Closed);

    assert!(bar.open_menu(0, &mut cx));
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    assert_eq!(bar.selected(), Some(0));

    let mut grab = MouseGrab::new();
    replay(cx.effects(), &mut grab);
    assert_eq!(grab.owner(), Some(bar.popups()[0].id()));
}

#[test]
fn popup_is_placed_under_its_title() {
    let mut bar = bar();
    bar.open_menu(1, &mut cx());
    let (x, _) = bar.spans()[1];
    let rect = bar.popups()[0].rect();
    assert_eq!((rect.x, rect.y), (x, 1));
    assert!(SCREEN.intersect(rect) == rect);
}

#[test]
fn opening_a_submenu_twice_is_idempotent() {
    let mut bar = bar();
    let opened = Rc::new(Cell::new(0));
    let count = opened.clone();
    bar.events_mut().opened.subscribe(move |_| count.set(count.get() + 1));
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    let recent_row = bar.popups()[0].row_rect(3).unwrap();
    let recent = bar.popups()[0].rows()[3];

    mouse(&mut bar, MouseEventKind::Moved, recent_row.x + 1, recent_row.y, &mut cx);
    assert_eq!(bar.popups().len(), 2);
    let submenu = bar.popups()[1].id();

    mouse(&mut bar, MouseEventKind::Moved, recent_row.x + 2, recent_row.y, &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 2 });
    assert_eq!(bar.popups().len(), 2);
    assert_eq!(bar.popups()[1].id(), submenu);
    let PopupRow::Node(group) = recent else {
        panic!("Recent row is not a menu node");
    };
    assert_eq!(bar.popups().iter().filter(|p| p.group() == group).count(), 1);
    assert_eq!(opened.get(), 2);
}

#[test]
fn close_all_from_depth_two_releases_the_grab() {
    let mut bar = bar();
    let mut cx = cx();
    let mut grab = MouseGrab::new();
    bar.open_menu(0, &mut cx);
    bar.move_down(&mut cx);
    bar.open_submenu(&mut cx);
    replay(&cx.take_effects(), &mut grab);
    assert_eq!(grab.owner(), Some(bar.popups()[1].id()));

    let closed = Rc::new(Cell::new(0));
    let counter = closed.clone();
    bar.events_mut()
        .all_closed
        .subscribe(move |_| counter.set(counter.get() + 1));

    assert!(bar.close_all(&mut cx));
    replay(&cx.take_effects(), &mut grab);
    assert_eq!(bar.state(), MenuState::Closed);
    assert_eq!(grab.owner(), None);
    assert_eq!(closed.get(), 1);
}

#[test]
fn esc_closes_one_level_at_a_time() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.move_down(&mut cx);
    bar.open_submenu(&mut cx);

    bar.handle_key(&key(KeyCode::Esc), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    bar.handle_key(&key(KeyCode::Esc), &mut cx);
    assert_eq!(bar.state(), MenuState::BarFocused);

    let mut grab = MouseGrab::new();
    replay(cx.effects(), &mut grab);
    assert_eq!(grab.owner(), Some(bar.id()));

    bar.handle_key(&key(KeyCode::Esc), &mut cx);
    assert_eq!(bar.state(), MenuState::Closed);
}

#[test]
fn closing_can_be_vetoed() {
    let mut bar = bar();
    let mut cx = cx();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    bar.events_mut().closing.subscribe(move |args| {
        log.borrow_mut().push((args.reopen, args.is_submenu));
        args.cancel = true;
    });
    bar.open_menu(0, &mut cx);
    assert!(!bar.close_innermost(false, &mut cx));
    assert!(!bar.close_all(&mut cx));
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    assert_eq!(seen.borrow().first(), Some(&(false, false)));
}

#[test]
fn opening_can_be_vetoed_or_replaced() {
    let mut bar = bar();
    let mut cx = cx();
    bar.events_mut().opening.subscribe(|args| args.cancel = true);
    assert!(!bar.open_menu(0, &mut cx));
    assert_eq!(bar.state(), MenuState::Closed);

    let mut bar = self::bar();
    bar.events_mut().opening.subscribe(|args| {
        args.replacement = Some(
            MenuGroup::new("_File")
                .entry(MenuEntry::new("_Fresh").on_action(|_| Ok(()))),
        );
    });
    let opened = Rc::new(Cell::new(0usize));
    let depth = opened.clone();
    bar.events_mut().opened.subscribe(move |args| depth.set(args.depth));

    assert!(bar.open_menu(0, &mut cx));
    let popup = &bar.popups()[0];
    assert_eq!(popup.rows().len(), 1);
    assert_eq!(
        popup.current_key().and_then(|k| bar.tree().entry(k)).map(|e| e.title()),
        Some("_Fresh")
    );
    assert_eq!(opened.get(), 1);
}

#[test]
fn selecting_a_leaf_closes_everything_and_defers_the_action() {
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let mut bar = bar_with(vec![MenuGroup::new("_Run").entry(
        MenuEntry::new("_Go").on_action(move |_| {
            flag.set(true);
            Ok(())
        }),
    )]);
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    assert!(bar.activate_current(&mut cx));

    assert_eq!(bar.state(), MenuState::Closed);
    assert!(!ran.get());
    assert_eq!(scheduled(&cx), 1);

    let mut grab = MouseGrab::new();
    replay(cx.effects(), &mut grab);
    assert_eq!(grab.owner(), None);
}

#[test]
fn up_from_the_first_entry_wraps_past_disabled_and_separators() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.handle_key(&key(KeyCode::Up), &mut cx);
    let current = bar.popups()[0].current_key().and_then(|k| bar.tree().entry(k));
    assert_eq!(current.map(|e| e.title()), Some("_Quit"));
    bar.handle_key(&key(KeyCode::Home), &mut cx);
    assert_eq!(bar.popups()[0].current(), Some(0));
    bar.handle_key(&key(KeyCode::End), &mut cx);
    assert_eq!(bar.popups()[0].current(), Some(4));
}

#[test]
fn left_and_right_switch_bar_menus_at_depth_one() {
    let mut bar = bar();
    let mut cx = cx();
    let reopen = Rc::new(Cell::new(false));
    let flag = reopen.clone();
    bar.events_mut()
        .closing
        .subscribe(move |args| flag.set(args.reopen));

    bar.open_menu(0, &mut cx);
    bar.handle_key(&key(KeyCode::Right), &mut cx);
    assert_eq!(bar.selected(), Some(1));
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    assert!(reopen.get());

    bar.handle_key(&key(KeyCode::Right), &mut cx);
    assert_eq!(bar.selected(), Some(0));
    bar.handle_key(&key(KeyCode::Left), &mut cx);
    assert_eq!(bar.selected(), Some(1));
}

#[test]
fn right_opens_a_submenu_and_left_closes_it() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.move_down(&mut cx);
    bar.handle_key(&key(KeyCode::Right), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 2 });
    let parent = bar.popups()[0].rect();
    assert_eq!(bar.popups()[1].rect().x, parent.right());

    bar.handle_key(&key(KeyCode::Left), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    assert_eq!(bar.selected(), Some(0));
}

#[test]
fn unique_letter_in_a_popup_activates() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.handle_key(&key(KeyCode::Char('q')), &mut cx);
    assert_eq!(bar.state(), MenuState::Closed);
    assert_eq!(scheduled(&cx), 1);
}

#[test]
fn ambiguous_letter_in_a_popup_only_selects() {
    let mut bar = bar_with(vec![MenuGroup::new("_Edit")
        .entry(MenuEntry::new("_Alpha").on_action(|_| Ok(())))
        .entry(MenuEntry::new("_Copy").on_action(|_| Ok(())))
        .entry(MenuEntry::new("_Cut").on_action(|_| Ok(())))]);
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.handle_key(&key(KeyCode::Char('C')), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    assert_eq!(bar.popups()[0].current(), Some(1));
    assert_eq!(scheduled(&cx), 0);
}

#[test]
fn ambiguous_bar_hotkey_activates_nothing() {
    let mut bar = bar_with(vec![
        file_menu(),
        MenuGroup::new("_Format").entry(MenuEntry::new("x")),
    ]);
    let mut cx = cx();
    assert!(bar.handle_hot_key(&alt('f'), &mut cx).is_ignored());
    assert_eq!(bar.state(), MenuState::Closed);
}

#[test]
fn unique_bar_hotkey_opens_its_menu() {
    let mut bar = bar();
    let mut cx = cx();
    assert!(bar.handle_hot_key(&alt('e'), &mut cx).is_consumed());
    assert_eq!(bar.selected(), Some(1));
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
}

#[test]
fn shortcut_chord_beats_hotkey_letters() {
    let mut bar = bar_with(vec![
        file_menu(),
        MenuGroup::new("_Tools").entry(
            MenuEntry::new("_Find")
                .shortcut(Key::alt('f'))
                .on_action(|_| Ok(())),
        ),
    ]);
    let mut cx = cx();
    assert!(bar.handle_hot_key(&alt('f'), &mut cx).is_consumed());
    assert_eq!(bar.state(), MenuState::Closed);
    assert_eq!(scheduled(&cx), 1);
}

#[test]
fn punctuation_shortcut_fires_with_the_shift_terminals_report() {
    let mut bar = bar_with(vec![MenuGroup::new("_Help").entry(
        MenuEntry::new("_Keys")
            .shortcut(Key::simple(KeyCode::Char('?')))
            .on_action(|_| Ok(())),
    )]);
    let mut cx = cx();
    let question = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
    assert!(bar.handle_hot_key(&question, &mut cx).is_consumed());
    assert_eq!(scheduled(&cx), 1);
}

#[test]
fn activation_key_toggles_the_bar() {
    let mut bar = bar();
    let mut cx = cx();
    assert!(bar.handle_hot_key(&key(KeyCode::F(9)), &mut cx).is_consumed());
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    assert_eq!(bar.selected(), Some(0));
    assert!(bar.handle_hot_key(&key(KeyCode::F(9)), &mut cx).is_consumed());
    assert_eq!(bar.state(), MenuState::Closed);

    bar.options_mut().set_activation_key(Key::simple(KeyCode::F(10)));
    assert!(bar.handle_hot_key(&key(KeyCode::F(9)), &mut cx).is_ignored());
    assert!(bar.handle_hot_key(&key(KeyCode::F(10)), &mut cx).is_consumed());
    assert!(bar.is_active());
}

#[test]
fn bar_focus_navigation() {
    let mut bar = bar_with(vec![
        file_menu(),
        edit_menu(),
        MenuGroup::command(MenuEntry::new("_Help").on_action(|_| Ok(()))),
    ]);
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.handle_key(&key(KeyCode::Esc), &mut cx);
    assert_eq!(bar.state(), MenuState::BarFocused);

    bar.handle_key(&key(KeyCode::Left), &mut cx);
    assert_eq!(bar.selected(), Some(2));
    assert_eq!(bar.state(), MenuState::BarFocused);
    bar.handle_key(&key(KeyCode::Right), &mut cx);
    assert_eq!(bar.selected(), Some(0));
    bar.handle_key(&key(KeyCode::Down), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
}

#[test]
fn bar_commands_run_instead_of_opening() {
    let mut bar = bar_with(vec![MenuGroup::command(
        MenuEntry::new("_Help").on_action(|_| Ok(())),
    )]);
    let mut cx = cx();
    assert!(bar.open_menu(0, &mut cx));
    assert_eq!(bar.state(), MenuState::Closed);
    assert_eq!(scheduled(&cx), 1);
}

#[test]
fn disabled_bar_entries_do_not_open() {
    let mut bar = bar_with(vec![file_menu().enabled(false), edit_menu()]);
    let mut cx = cx();
    assert!(!bar.open_menu(0, &mut cx));
    bar.handle_hot_key(&key(KeyCode::F(9)), &mut cx);
    assert_eq!(bar.selected(), Some(1));
}

#[test]
fn up_down_as_left_right_opens_submenus_on_landing() {
    let mut bar = bar();
    bar.options_mut().set_up_down_as_left_right(true);
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.handle_key(&key(KeyCode::Down), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 2 });
}

#[test]
fn menu_options_exclude_each_other() {
    let mut options = MenuOptions::default();
    options.set_single_frame_submenus(true);
    options.set_up_down_as_left_right(true);
    assert!(!options.single_frame_submenus());
    assert!(options.up_down_as_left_right());
    options.set_single_frame_submenus(true);
    assert!(options.single_frame_submenus());
    assert!(!options.up_down_as_left_right());
}

#[test]
fn options_from_settings_prefer_single_frame() {
    let settings = MenuSettings {
        single_frame_submenus: true,
        up_down_as_left_right: true,
        activation_key: "ctrl+m".to_string(),
        hotkey_specifier: '_',
    };
    let options = MenuOptions::from_settings(&settings);
    assert!(options.single_frame_submenus());
    assert!(!options.up_down_as_left_right());
    assert_eq!(options.activation_key(), Key::ctrl('m'));

    let bad = MenuSettings {
        activation_key: "not a key".to_string(),
        ..MenuSettings::default()
    };
    assert_eq!(
        MenuOptions::from_settings(&bad).activation_key(),
        DEFAULT_ACTIVATION_KEY
    );
}

#[test]
fn single_frame_submenus_replace_the_frame_with_a_back_row() {
    let mut bar = bar();
    bar.options_mut().set_single_frame_submenus(true);
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    bar.move_down(&mut cx);
    bar.open_submenu(&mut cx);

    let inner = &bar.popups()[1];
    assert_eq!(inner.rows()[0], PopupRow::Back);
    assert_eq!(inner.current(), Some(1));
    assert_eq!(inner.rect().origin(), bar.popups()[0].rect().origin());

    bar.handle_key(&key(KeyCode::Up), &mut cx);
    assert_eq!(bar.popups()[1].current_row(), Some(PopupRow::Back));
    bar.handle_key(&key(KeyCode::Enter), &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
}

#[test]
fn clicking_a_title_opens_and_clicking_it_again_closes() {
    let mut bar = bar();
    let mut cx = cx();
    let (x, _) = bar.spans()[0];
    mouse(&mut bar, MouseEventKind::Down(MouseButton::Left), x + 1, 0, &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
    mouse(&mut bar, MouseEventKind::Down(MouseButton::Left), x + 1, 0, &mut cx);
    assert_eq!(bar.state(), MenuState::Closed);
}

#[test]
fn hovering_another_title_switches_menus() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    let (x, _) = bar.spans()[1];
    mouse(&mut bar, MouseEventKind::Moved, x + 1, 0, &mut cx);
    assert_eq!(bar.selected(), Some(1));
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });
}

#[test]
fn click_outside_closes_the_innermost_popup_then_the_bar() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    let down = MouseEventKind::Down(MouseButton::Left);
    assert!(mouse(&mut bar, down, 50, 15, &mut cx).is_consumed());
    assert_eq!(bar.state(), MenuState::BarFocused);
    assert!(mouse(&mut bar, down, 50, 15, &mut cx).is_consumed());
    assert_eq!(bar.state(), MenuState::Closed);
    assert!(mouse(&mut bar, down, 50, 15, &mut cx).is_ignored());
}

#[test]
fn hover_highlights_rows_and_release_activates() {
    let mut bar = bar();
    let mut cx = cx();
    bar.open_menu(0, &mut cx);
    let quit_row = bar.popups()[0].row_rect(4).unwrap();

    mouse(&mut bar, MouseEventKind::Moved, quit_row.x + 1, quit_row.y, &mut cx);
    assert_eq!(bar.popups()[0].current(), Some(4));

    let recent_row = bar.popups()[0].row_rect(3).unwrap();
    mouse(&mut bar, MouseEventKind::Moved, recent_row.x + 1, recent_row.y, &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 2 });

    mouse(&mut bar, MouseEventKind::Moved, quit_row.x + 1, quit_row.y, &mut cx);
    assert_eq!(bar.state(), MenuState::PopupOpen { depth: 1 });

    mouse(
        &mut bar,
        MouseEventKind::Up(MouseButton::Left),
        quit_row.x + 1,
        quit_row.y,
        &mut cx,
    );
    assert_eq!(bar.state(), MenuState::Closed);
    assert_eq!(scheduled(&cx), 1);
}
