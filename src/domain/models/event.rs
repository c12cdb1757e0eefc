use tui_textarea::Input;

use super::ClientSnapshot;

pub enum Event {
    ClientUpdate(ClientSnapshot),
    KeyboardInput(Input),
    KeyboardPaste(String),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
