use chrono::Datelike;
use fltk::{app, app::Sender, dialog, prelude::*, window::Window};

use super::export::{self, ExportFlag};
use super::messages::Message;
use super::sheet::{self, Page};
use super::store::RosterStore;
use super::update_flow::{ShellCommand, SurfaceRequest, UpdateEvent, UpdateOrchestrator};
use super::updater::{self, ReleaseInfo, UpdateCheckResult};
use crate::ui::dialogs::update::UpdateWindow;
use crate::ui::main_window::MainWidgets;
use crate::ui::month_picker::MonthPicker;
use crate::ui::name_list::NameList;
use crate::ui::sheet_view::SheetView;

/// Main application coordinator. Owns the store, the generated pages, the
/// update flow, and every widget handle; the dispatch loop in main calls
/// one method per message.
pub struct AppState {
    pub store: RosterStore,
    pub pages: Vec<Page>,
    pub export_flag: ExportFlag,
    pub update_flow: UpdateOrchestrator,
    /// Release payload carried from "available" until install or dismissal.
    pending_release: Option<ReleaseInfo>,

    /// Year currently shown in the picker (navigable without committing).
    pub picker_year: i32,
    /// The committed (year, month) choice, persisted as last-used.
    pub selected_month: Option<(i32, u32)>,

    pub sender: Sender<Message>,
    pub window: Window,
    pub name_input: fltk::input::Input,
    pub name_list: NameList,
    pub month_picker: MonthPicker,
    pub sheet_view: SheetView,
    update_window: Option<UpdateWindow>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, sender: Sender<Message>, store: RosterStore) -> Self {
        let today = chrono::Local::now().date_naive();
        let (picker_year, selected_month) = match store.month() {
            Some((year, month)) => (year, Some((year, month))),
            None => (today.year(), Some((today.year(), today.month()))),
        };

        let mut state = Self {
            store,
            pages: Vec::new(),
            export_flag: ExportFlag::default(),
            update_flow: UpdateOrchestrator::new(),
            pending_release: None,
            picker_year,
            selected_month,
            sender,
            window: widgets.wind,
            name_input: widgets.name_input,
            name_list: widgets.name_list,
            month_picker: widgets.month_picker,
            sheet_view: widgets.sheet_view,
            update_window: None,
        };
        state.refresh_name_list();
        state.refresh_month_picker();
        state
    }

    // --- Roster ---

    pub fn refresh_name_list(&mut self) {
        let names: Vec<String> = self.store.names().to_vec();
        let selected: Vec<bool> = names.iter().map(|n| self.store.is_selected(n)).collect();
        self.name_list.rebuild(&names, &selected);
    }

    pub fn add_names_from_input(&mut self) {
        let raw = self.name_input.value();
        if raw.trim().is_empty() {
            return;
        }
        self.store.add_names(&raw);
        let _ = self.store.save();
        self.name_input.set_value("");
        self.refresh_name_list();
    }

    pub fn toggle_name(&mut self, index: usize, on: bool) {
        let Some(name) = self.store.names().get(index).cloned() else {
            return;
        };
        self.store.toggle(&name, on);
        let _ = self.store.save();
    }

    pub fn select_all(&mut self) {
        self.store.select_all();
        let _ = self.store.save();
        self.refresh_name_list();
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
        let _ = self.store.save();
        self.refresh_name_list();
    }

    pub fn delete_selected(&mut self) {
        let count = self.store.selected_count();
        if count == 0 {
            return;
        }
        let choice = dialog::choice2_default(
            &format!("Are you sure you want to delete {} name(s)?", count),
            "Delete",
            "Cancel",
            "",
        );
        if choice != Some(0) {
            return;
        }
        self.store.delete_selected();
        let _ = self.store.save();
        self.refresh_name_list();
    }

    // --- Month picker ---

    pub fn refresh_month_picker(&mut self) {
        let today = chrono::Local::now().date_naive();
        self.month_picker.refresh(
            self.picker_year,
            self.selected_month,
            (today.year(), today.month()),
        );
    }

    pub fn prev_year(&mut self) {
        self.picker_year -= 1;
        self.shift_selected_year();
    }

    pub fn next_year(&mut self) {
        self.picker_year += 1;
        self.shift_selected_year();
    }

    /// Year navigation keeps the chosen month, moving it into the shown year.
    fn shift_selected_year(&mut self) {
        if let Some((_, month)) = self.selected_month {
            self.selected_month = Some((self.picker_year, month));
            self.store.set_month(self.picker_year, month);
            let _ = self.store.save();
        }
        self.refresh_month_picker();
    }

    pub fn pick_month(&mut self, month: u32) {
        self.selected_month = Some((self.picker_year, month));
        self.store.set_month(self.picker_year, month);
        let _ = self.store.save();
        self.refresh_month_picker();
    }

    // --- Sheets ---

    pub fn generate(&mut self) {
        let Some((year, month)) = self.selected_month else {
            dialog::alert_default("Please select a month!");
            return;
        };
        self.store.set_month(year, month);
        let _ = self.store.save();

        let names = self.store.selected_in_order();
        if names.is_empty() {
            dialog::alert_default("Please select at least one name!");
            return;
        }

        match sheet::generate(year, month, &names) {
            Ok(pages) => {
                self.pages = pages;
                self.sheet_view.render(&self.pages);
            }
            Err(e) => dialog::alert_default(&format!("Failed to generate sheets: {}", e)),
        }
    }

    pub fn download_pdf(&mut self) {
        if self.pages.is_empty() {
            dialog::alert_default("Please generate the attendance sheet first.");
            return;
        }
        match export::export_pdf(&self.pages, &self.export_flag) {
            Ok(path) => dialog::message_default(&format!("Saved {}", path.display())),
            Err(e) => dialog::alert_default(&format!("Failed to export PDF: {}", e)),
        }
    }

    // --- Update flow ---

    /// Kick off the once-per-launch background version check.
    pub fn start_update_check(&mut self) {
        if !self.update_flow.begin_check() {
            return;
        }
        let sender = self.sender;
        std::thread::spawn(move || {
            let result = updater::check_for_updates(env!("CARGO_PKG_VERSION"));
            sender.send(Message::UpdateCheckFinished(result));
        });
    }

    pub fn handle_check_finished(&mut self, result: UpdateCheckResult) {
        let event = match result {
            UpdateCheckResult::UpdateAvailable(release) => {
                let version = release.version();
                self.pending_release = Some(release);
                UpdateEvent::Available { version }
            }
            UpdateCheckResult::NoUpdate => UpdateEvent::UpToDate,
            UpdateCheckResult::Error(message) => UpdateEvent::Failed { message },
        };
        self.handle_update_event(event);
    }

    pub fn handle_update_event(&mut self, event: UpdateEvent) {
        let commands = self.update_flow.on_event(event);
        self.run_commands(commands);
    }

    pub fn handle_surface_ready(&mut self) {
        let commands = self.update_flow.on_surface_ready();
        self.run_commands(commands);
    }

    pub fn handle_surface_request(&mut self, request: SurfaceRequest) {
        let commands = self.update_flow.on_request(request);
        self.run_commands(commands);
    }

    fn run_commands(&mut self, commands: Vec<ShellCommand>) {
        for command in commands {
            match command {
                ShellCommand::OpenProgressWindow => {
                    self.update_window = Some(UpdateWindow::new(&self.window, self.sender));
                }
                ShellCommand::FocusProgressWindow => {
                    if let Some(win) = &mut self.update_window {
                        win.focus();
                    }
                }
                ShellCommand::SendVersion(version) => {
                    if let Some(win) = &mut self.update_window {
                        win.set_version(&version);
                    }
                }
                ShellCommand::SendProgress(fraction) => {
                    if let Some(win) = &mut self.update_window {
                        win.set_progress(fraction);
                    }
                }
                ShellCommand::NotifyDownloaded => {
                    if let Some(win) = &mut self.update_window {
                        win.show_downloaded();
                    }
                }
                ShellCommand::BeginDownload => self.begin_download(),
                ShellCommand::QuitAndInstall => self.quit_and_install(),
                ShellCommand::CloseProgressWindow => {
                    if let Some(mut win) = self.update_window.take() {
                        win.hide();
                    }
                }
                ShellCommand::ShowError(message) => {
                    dialog::alert_default(&format!(
                        "Update failed:\n\n{}\n\nPlease try again after the next launch.",
                        message
                    ));
                }
            }
        }
    }

    fn begin_download(&mut self) {
        let asset_url = self
            .pending_release
            .as_ref()
            .and_then(|r| r.platform_asset())
            .map(|a| a.browser_download_url.clone());

        let Some(url) = asset_url else {
            self.handle_update_event(UpdateEvent::Failed {
                message: "no downloadable build for this platform".to_string(),
            });
            return;
        };

        let sender = self.sender;
        std::thread::spawn(move || {
            let dest = updater::download_dest();
            let result = updater::download_file(&url, &dest, |fraction| {
                sender.send(Message::Update(UpdateEvent::Progress { percent: fraction }));
            });
            match result {
                Ok(()) => sender.send(Message::Update(UpdateEvent::Downloaded)),
                Err(e) => sender.send(Message::Update(UpdateEvent::Failed { message: e })),
            }
        });
    }

    fn quit_and_install(&mut self) {
        if let Some(mut win) = self.update_window.take() {
            win.hide();
        }
        match updater::install_update(&updater::download_dest()) {
            Ok(()) => {
                dialog::message_default(
                    "Update installed successfully!\n\nAttendancePad will now restart.",
                );
                if let Ok(current_exe) = std::env::current_exe() {
                    let _ = std::process::Command::new(current_exe).spawn();
                }
                app::quit();
            }
            Err(e) => dialog::alert_default(&format!("Failed to install update: {}", e)),
        }
    }
}
