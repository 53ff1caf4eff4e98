//! Menu bar and cascading popup menus.

pub mod bar;
pub mod events;
pub mod hotkey;
pub mod model;
pub mod popup;

pub use bar::{MenuBar, MenuOptions, MenuState};
pub use events::{MenuAllClosed, MenuClosing, MenuEvents, MenuOpened, MenuOpening};
pub use model::{CheckStyle, MenuEntry, MenuGroup, MenuItem, MenuKey, MenuNode, MenuTree};
pub use popup::{Popup, PopupRow};
