use tui_textarea::Input;

use super::ContactPage;
use super::MirrorMessage;

pub enum Event {
    AuthAccepted(),
    AuthRejected(String),
    ContactsLoaded { revision: u64, page: ContactPage },
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    LoggedOut(),
    MessageStored { revision: u64, message: MirrorMessage },
    ThreadLoaded { revision: u64, contact_id: String, messages: Vec<MirrorMessage> },
    UIListDown(),
    UIListUp(),
    UIPageNext(),
    UIPagePrev(),
    UITick(),
    WorkerError { revision: u64, message: String },
}
