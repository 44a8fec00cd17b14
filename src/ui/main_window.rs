use fltk::{
    app::Sender,
    button::Button,
    enums::{Align, CallbackTrigger, Color, Font},
    frame::Frame,
    group::Flex,
    image::PngImage,
    input::Input,
    prelude::*,
    window::Window,
};

use crate::app::messages::Message;
use super::month_picker::{MonthPicker, PICKER_HEIGHT};
use super::name_list::NameList;
use super::sheet_view::SheetView;

const WINDOW_W: i32 = 1100;
const WINDOW_H: i32 = 800;
const PANEL_W: i32 = 320;

pub struct MainWidgets {
    pub wind: Window,
    pub name_input: Input,
    pub name_list: NameList,
    pub month_picker: MonthPicker,
    pub sheet_view: SheetView,
}

pub fn build_main_window(sender: Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, WINDOW_W, WINDOW_H, "AttendancePad");
    wind.set_xclass("AttendancePad");

    let icon_data = include_bytes!("../../assets/icon.png");
    if let Ok(mut icon) = PngImage::from_data(icon_data) {
        icon.scale(32, 32, true, true);
        #[cfg(target_os = "linux")]
        wind.set_icon(Some(icon));
    }

    let mut outer = Flex::new(0, 0, WINDOW_W, WINDOW_H, None).row();
    outer.set_margin(10);
    outer.set_spacing(10);

    // Roster + month panel on the left
    let mut panel = Flex::default().column();
    panel.set_spacing(6);

    let mut names_label = Frame::default().with_label("Names");
    names_label.set_label_font(Font::HelveticaBold);
    names_label.set_align(Align::Left | Align::Inside);
    panel.fixed(&names_label, 20);

    let mut input_row = Flex::default().row();
    input_row.set_spacing(6);
    let mut name_input = Input::default();
    name_input.set_tooltip("Add one name, or several separated by commas");
    name_input.set_trigger(CallbackTrigger::EnterKeyAlways);
    name_input.emit(sender, Message::AddNames);
    let mut add_btn = Button::default().with_label("Add");
    add_btn.emit(sender, Message::AddNames);
    input_row.fixed(&add_btn, 60);
    input_row.end();
    panel.fixed(&input_row, 28);

    let name_list = NameList::new(sender);

    let mut selection_row = Flex::default().row();
    selection_row.set_spacing(6);
    let mut select_all_btn = Button::default().with_label("Select All");
    select_all_btn.emit(sender, Message::SelectAll);
    let mut clear_btn = Button::default().with_label("Clear");
    clear_btn.emit(sender, Message::ClearSelection);
    let mut delete_btn = Button::default().with_label("Delete Selected");
    delete_btn.emit(sender, Message::DeleteSelected);
    selection_row.end();
    panel.fixed(&selection_row, 28);

    let mut month_label = Frame::default().with_label("Month");
    month_label.set_label_font(Font::HelveticaBold);
    month_label.set_align(Align::Left | Align::Inside);
    panel.fixed(&month_label, 20);

    let month_picker = MonthPicker::new(sender);
    panel.fixed(&month_picker.group, PICKER_HEIGHT);

    let mut generate_btn = Button::default().with_label("Generate");
    generate_btn.set_color(Color::from_rgb(27, 94, 32));
    generate_btn.set_label_color(Color::White);
    generate_btn.emit(sender, Message::Generate);
    panel.fixed(&generate_btn, 34);

    let mut download_btn = Button::default().with_label("Download PDF");
    download_btn.emit(sender, Message::DownloadPdf);
    panel.fixed(&download_btn, 34);

    panel.end();
    outer.fixed(&panel, PANEL_W);

    // Sheet preview fills the rest
    let sheet_view = SheetView::new();

    outer.end();
    wind.end();
    // Closing the only window quits the app
    wind.emit(sender, Message::Quit);
    wind.show();

    MainWidgets {
        wind,
        name_input,
        name_list,
        month_picker,
        sheet_view,
    }
}
