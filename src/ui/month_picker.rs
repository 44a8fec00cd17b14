use fltk::{
    app::Sender,
    button::Button,
    enums::{Color, FrameType},
    frame::Frame,
    group::Flex,
    prelude::*,
};

use crate::app::messages::Message;

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const PICKER_HEIGHT: i32 = 150;
const HEADER_HEIGHT: i32 = 26;

/// Year navigation plus a 4x3 month grid. Picking a month commits the
/// (shown year, month) pair; year navigation keeps the chosen month.
pub struct MonthPicker {
    pub group: Flex,
    year_frame: Frame,
    month_buttons: Vec<Button>,
}

impl MonthPicker {
    pub fn new(sender: Sender<Message>) -> Self {
        let mut group = Flex::default().column();
        group.set_spacing(4);

        let mut header = Flex::default().row();
        let mut prev_btn = Button::default().with_label("@<");
        prev_btn.emit(sender, Message::PrevYear);
        let year_frame = Frame::default();
        let mut next_btn = Button::default().with_label("@>");
        next_btn.emit(sender, Message::NextYear);
        header.fixed(&prev_btn, 32);
        header.fixed(&next_btn, 32);
        header.end();
        group.fixed(&header, HEADER_HEIGHT);

        let mut month_buttons = Vec::with_capacity(12);
        for row in 0..4 {
            let mut button_row = Flex::default().row();
            button_row.set_spacing(4);
            for col in 0..3 {
                let month = (row * 3 + col) as u32 + 1;
                let mut btn =
                    Button::default().with_label(MONTH_ABBREVS[month as usize - 1]);
                btn.set_frame(FrameType::FlatBox);
                btn.emit(sender, Message::PickMonth(month));
                month_buttons.push(btn);
            }
            button_row.end();
        }

        group.end();

        Self {
            group,
            year_frame,
            month_buttons,
        }
    }

    pub fn refresh(
        &mut self,
        picker_year: i32,
        selected: Option<(i32, u32)>,
        today: (i32, u32),
    ) {
        self.year_frame.set_label(&picker_year.to_string());

        for (i, btn) in self.month_buttons.iter_mut().enumerate() {
            let month = i as u32 + 1;
            let is_active = selected == Some((picker_year, month));
            let is_current = (picker_year, month) == today;

            if is_active {
                btn.set_color(Color::from_rgb(27, 94, 32));
                btn.set_label_color(Color::White);
            } else if is_current {
                btn.set_color(Color::from_rgb(220, 237, 222));
                btn.set_label_color(Color::Black);
            } else {
                btn.set_color(Color::from_rgb(240, 240, 240));
                btn.set_label_color(Color::Black);
            }
            btn.redraw();
        }
    }
}
