use fltk::{
    app::Sender,
    button::CheckButton,
    enums::{Align, Color},
    frame::Frame,
    group::{Pack, PackType, Scroll, ScrollType},
    prelude::*,
};

use crate::app::messages::Message;

const ROW_HEIGHT: i32 = 26;

/// Scrollable checkbox list over the saved names. Rebuilt from the store
/// after every roster mutation; checkbox state mirrors the selection.
pub struct NameList {
    scroll: Scroll,
    pack: Pack,
    sender: Sender<Message>,
}

impl NameList {
    pub fn new(sender: Sender<Message>) -> Self {
        let mut scroll = Scroll::default();
        scroll.set_type(ScrollType::Vertical);
        scroll.set_color(Color::White);
        let mut pack = Pack::default()
            .with_pos(scroll.x(), scroll.y())
            .with_size(scroll.w() - 18, 0);
        pack.set_type(PackType::Vertical);
        pack.set_spacing(2);
        pack.end();
        scroll.end();
        Self { scroll, pack, sender }
    }

    pub fn rebuild(&mut self, names: &[String], selected: &[bool]) {
        self.pack.clear();
        self.pack.begin();

        if names.is_empty() {
            let mut hint = Frame::default().with_size(0, ROW_HEIGHT);
            hint.set_label("No names saved yet. Add a name above.");
            hint.set_label_color(Color::from_rgb(120, 120, 120));
            hint.set_align(Align::Left | Align::Inside);
        } else {
            for (index, name) in names.iter().enumerate() {
                let mut check = CheckButton::default().with_size(0, ROW_HEIGHT);
                check.set_label(name);
                check.set_checked(selected.get(index).copied().unwrap_or(false));
                let sender = self.sender;
                check.set_callback(move |b| {
                    sender.send(Message::ToggleName {
                        index,
                        on: b.is_checked(),
                    });
                });
            }
        }

        self.pack.end();
        let height = names.len().max(1) as i32 * (ROW_HEIGHT + 2);
        self.pack.resize(
            self.scroll.x() + 2,
            self.scroll.y() + 2,
            self.scroll.w() - 20,
            height,
        );
        self.scroll.redraw();
    }
}
