use fltk::{
    app::Sender,
    button::Button,
    enums::{Color, Font},
    frame::Frame,
    group::Flex,
    misc::Progress,
    prelude::*,
    window::Window,
};

use crate::app::messages::Message;

const WIDTH: i32 = 420;
const HEIGHT: i32 = 190;

/// The secondary update-progress window. At most one exists at a time;
/// the orchestrator refocuses it instead of opening a second one. Buttons
/// only send messages; the dispatch loop decides what they mean.
pub struct UpdateWindow {
    window: Window,
    version_frame: Frame,
    progress: Progress,
    status_frame: Frame,
    download_btn: Button,
    restart_btn: Button,
}

impl UpdateWindow {
    pub fn new(parent: &Window, sender: Sender<Message>) -> Self {
        let x = parent.x() + (parent.w() - WIDTH) / 2;
        let y = parent.y() + (parent.h() - HEIGHT) / 2;
        let mut window = Window::new(x, y, WIDTH, HEIGHT, "Update Available");
        window.set_border(false);
        window.make_modal(true);

        let mut flex = Flex::new(12, 12, WIDTH - 24, HEIGHT - 24, None).column();
        flex.set_spacing(8);

        let mut title = Frame::default().with_label("Update Available");
        title.set_label_size(16);
        title.set_label_font(Font::HelveticaBold);
        flex.fixed(&title, 24);

        let mut version_frame = Frame::default().with_label("Checking version\u{2026}");
        version_frame.set_label_size(13);
        flex.fixed(&version_frame, 22);

        let mut progress = Progress::default();
        progress.set_minimum(0.0);
        progress.set_maximum(1.0);
        progress.set_selection_color(Color::from_rgb(27, 94, 32));
        progress.hide();
        flex.fixed(&progress, 22);

        let mut status_frame = Frame::default();
        status_frame.set_label_size(11);
        status_frame.hide();
        flex.fixed(&status_frame, 18);

        let mut button_row = Flex::default().row();
        button_row.set_spacing(8);
        let mut download_btn = Button::default().with_label("Download");
        let mut restart_btn = Button::default().with_label("Restart Now");
        let mut cancel_btn = Button::default().with_label("Later");
        restart_btn.hide();
        button_row.end();
        flex.fixed(&button_row, 30);

        flex.end();
        window.end();

        download_btn.emit(sender, Message::StartDownload);
        restart_btn.emit(sender, Message::RestartApp);
        cancel_btn.emit(sender, Message::CloseUpdateWindow);
        // Esc on a borderless window lands here
        window.set_callback(move |_| sender.send(Message::CloseUpdateWindow));

        window.show();
        // The window can receive messages from here on; deliver the held
        // version payload through the normal dispatch path.
        sender.send(Message::UpdateWindowReady);

        Self {
            window,
            version_frame,
            progress,
            status_frame,
            download_btn,
            restart_btn,
        }
    }

    pub fn set_version(&mut self, version: &str) {
        self.version_frame
            .set_label(&format!("AttendancePad {} is ready to download.", version));
    }

    pub fn set_progress(&mut self, fraction: f32) {
        self.progress.show();
        self.status_frame.show();
        self.download_btn.deactivate();
        self.progress.set_value(fraction as f64);
        self.status_frame
            .set_label(&format!("Downloading: {:.0}%", fraction * 100.0));
    }

    pub fn show_downloaded(&mut self) {
        self.progress.show();
        self.progress.set_value(1.0);
        self.status_frame.show();
        self.status_frame
            .set_label("Download complete. Restart to install.");
        self.download_btn.hide();
        self.restart_btn.show();
    }

    pub fn focus(&mut self) {
        self.window.show();
    }

    pub fn hide(&mut self) {
        self.window.hide();
    }
}
