use fltk::app;

use attendance_pad::app::messages::Message;
use attendance_pad::app::state::AppState;
use attendance_pad::app::store::RosterStore;
use attendance_pad::app::update_flow::SurfaceRequest;
use attendance_pad::ui::main_window::build_main_window;

fn main() {
    let fltk_app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let store = RosterStore::load();
    let widgets = build_main_window(sender);
    let mut state = AppState::new(widgets, sender, store);

    // Update checks only run from installed builds, never development runs
    if !cfg!(debug_assertions) {
        state.start_update_check();
    }

    while fltk_app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                Message::AddNames => state.add_names_from_input(),
                Message::ToggleName { index, on } => state.toggle_name(index, on),
                Message::SelectAll => state.select_all(),
                Message::ClearSelection => state.clear_selection(),
                Message::DeleteSelected => state.delete_selected(),

                Message::PrevYear => state.prev_year(),
                Message::NextYear => state.next_year(),
                Message::PickMonth(month) => state.pick_month(month),

                Message::Generate => state.generate(),
                Message::DownloadPdf => state.download_pdf(),

                Message::UpdateCheckFinished(result) => state.handle_check_finished(result),
                Message::Update(event) => state.handle_update_event(event),

                Message::UpdateWindowReady => state.handle_surface_ready(),
                Message::StartDownload => {
                    state.handle_surface_request(SurfaceRequest::StartDownload)
                }
                Message::RestartApp => state.handle_surface_request(SurfaceRequest::Restart),
                Message::CloseUpdateWindow => {
                    state.handle_surface_request(SurfaceRequest::Close)
                }

                Message::Quit => app::quit(),
            }
        }
    }
}
