use super::*;
use crate::core::event::Key;
use crate::ui::core::painter::{PaintCmd, Painter};
use crate::ui::core::tree::UiTree;
use crate::ui::menu::model::{MenuEntry, MenuGroup};
use crate::ui::view::EventCx;

const SCREEN: Rect = Rect::new(0, 0, 40, 12);

fn menu_bar() -> MenuBar {
    let file = MenuGroup::new("_File")
        .entry(
            MenuEntry::new("_Open")
                .shortcut(Key::ctrl('q'))
                .on_action(|_| Ok(())),
        )
        .separator()
        .group(MenuGroup::new("_Recent").entry(MenuEntry::new("_One")))
        .entry(MenuEntry::new("_Gone").enabled(false));
    let edit = MenuGroup::new("_Edit").enabled(false);
    let mut bar = MenuBar::new(MenuTree::new(vec![file, edit]));
    bar.layout(Rect::new(0, 0, SCREEN.w, 1), SCREEN);
    bar
}

fn texts(painter: &Painter) -> Vec<String> {
    painter
        .cmds()
        .iter()
        .filter_map(|cmd| match cmd {
            PaintCmd::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn popup_size_covers_check_column_shortcut_and_arrow() {
    let mut bar = menu_bar();
    bar.open_menu(0, &mut EventCx::new(SCREEN));
    let popup = &bar.popups()[0];
    // "Open" + "  Ctrl+Q" beside the check column, plus the submenu arrow.
    let inner = 2 + 4 + ("Ctrl+Q".len() + 2) + 2;
    assert_eq!(
        popup_size(bar.tree(), popup),
        (inner as u16 + 2, popup.rows().len() as u16 + 2)
    );
    assert_eq!(popup.rect().w, inner as u16 + 2);
}

#[test]
fn bar_registers_one_node_above_its_view() {
    let bar = menu_bar();
    let mut painter = Painter::new();
    let mut tree = UiTree::new();
    let owner = Id::named("owner");
    {
        let mut ui = Ui::new(SCREEN, &mut painter, &mut tree);
        ui.layer = 4;
        MenuBarWidget { bar: &bar, owner }.ui(&mut ui);
    }

    let node = tree.node(bar.id()).copied().unwrap();
    assert_eq!(node.owner, owner);
    assert_eq!(node.layer, 6);
    assert_eq!(node.kind, NodeKind::MenuBar);

    let texts = texts(&painter);
    assert!(texts.iter().any(|t| t == "F"));
    assert!(texts.iter().any(|t| t == "ile"));
}

#[test]
fn disabled_and_selected_titles_use_their_styles() {
    let mut bar = menu_bar();
    bar.open_menu(0, &mut EventCx::new(SCREEN));
    let mut painter = Painter::new();
    let mut tree = UiTree::new();
    {
        let mut ui = Ui::new(SCREEN, &mut painter, &mut tree);
        MenuBarWidget {
            bar: &bar,
            owner: Id::named("owner"),
        }
        .ui(&mut ui);
    }
    let styles = *bar.styles();
    let fills: Vec<(Rect, Style)> = painter
        .cmds()
        .iter()
        .filter_map(|cmd| match cmd {
            PaintCmd::FillRect { rect, style } => Some((*rect, *style)),
            _ => None,
        })
        .collect();
    let (file_x, file_w) = bar.spans()[0];
    let (edit_x, edit_w) = bar.spans()[1];
    assert!(fills.contains(&(Rect::new(file_x, 0, file_w, 1), styles.bar_selected)));
    assert!(fills.contains(&(Rect::new(edit_x, 0, edit_w, 1), styles.disabled)));
}

#[test]
fn popup_paints_rows_separator_and_registers_at_popup_layer() {
    let mut bar = menu_bar();
    bar.open_menu(0, &mut EventCx::new(SCREEN));
    let popup = &bar.popups()[0];
    let mut painter = Painter::new();
    let mut tree = UiTree::new();
    {
        let mut ui = Ui::new(SCREEN, &mut painter, &mut tree);
        PopupWidget {
            bar: &bar,
            popup,
            owner: Id::named("owner"),
        }
        .ui(&mut ui);
    }

    let node = tree.node(popup.id()).copied().unwrap();
    assert_eq!(node.layer, POPUP_LAYER + 1);
    assert_eq!(node.kind, NodeKind::Popup { depth: 1 });
    assert_eq!(node.rect, popup.rect());

    assert!(painter
        .cmds()
        .iter()
        .any(|c| matches!(c, PaintCmd::Border { rect, .. } if *rect == popup.rect())));
    let separator_y = popup.rect().y + 2;
    assert!(painter
        .cmds()
        .iter()
        .any(|c| matches!(c, PaintCmd::HLine { pos, ch: '─', .. } if pos.y == separator_y)));

    let texts = texts(&painter);
    assert!(texts.iter().any(|t| t == "Ctrl+Q"));
    assert!(texts.iter().any(|t| t == " ►"));
    assert!(texts.iter().any(|t| t == "ecent"));
}

#[test]
fn selected_row_uses_the_selected_style() {
    let mut bar = menu_bar();
    bar.open_menu(0, &mut EventCx::new(SCREEN));
    let popup = &bar.popups()[0];
    let mut painter = Painter::new();
    let mut tree = UiTree::new();
    {
        let mut ui = Ui::new(SCREEN, &mut painter, &mut tree);
        PopupWidget {
            bar: &bar,
            popup,
            owner: Id::named("owner"),
        }
        .ui(&mut ui);
    }
    let first = popup.row_rect(0).unwrap();
    let last = popup.row_rect(3).unwrap();
    let styles = bar.styles();
    assert!(painter.cmds().contains(&PaintCmd::FillRect {
        rect: first,
        style: styles.selected,
    }));
    assert!(painter.cmds().contains(&PaintCmd::FillRect {
        rect: last,
        style: styles.disabled,
    }));
}

#[test]
fn back_row_shows_the_group_title() {
    let mut bar = menu_bar();
    bar.options_mut().set_single_frame_submenus(true);
    let mut cx = EventCx::new(SCREEN);
    bar.open_menu(0, &mut cx);
    bar.move_down(&mut cx);
    assert!(bar.open_submenu(&mut cx));

    let popup = &bar.popups()[1];
    let mut painter = Painter::new();
    let mut tree = UiTree::new();
    {
        let mut ui = Ui::new(SCREEN, &mut painter, &mut tree);
        PopupWidget {
            bar: &bar,
            popup,
            owner: Id::named("owner"),
        }
        .ui(&mut ui);
    }
    let texts = texts(&painter);
    assert!(texts.iter().any(|t| t == "◄ "));
    assert!(texts.iter().any(|t| t == "R"));
}

#[test]
fn nodes_are_skipped_when_hit_testing_is_off() {
    let mut bar = menu_bar();
    bar.open_menu(0, &mut EventCx::new(SCREEN));
    let mut painter = Painter::new();
    let mut tree = UiTree::new();
    {
        let mut ui = Ui::new(SCREEN, &mut painter, &mut tree);
        ui.hit_testing = false;
        bar.paint(&mut ui, Id::named("owner"));
        bar.paint_popups(&mut ui, Id::named("owner"));
    }
    assert!(tree.nodes().is_empty());
    assert!(!painter.is_empty());
}
