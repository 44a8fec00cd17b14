use super::update_flow::UpdateEvent;
use super::updater::UpdateCheckResult;

/// All messages that can be sent through the FLTK channel.
/// Each widget callback sends one of these; the dispatch loop in main
/// handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // Roster
    AddNames,
    ToggleName { index: usize, on: bool },
    SelectAll,
    ClearSelection,
    DeleteSelected,

    // Month picker
    PrevYear,
    NextYear,
    PickMonth(u32),

    // Sheets
    Generate,
    DownloadPdf,

    // Background update check (worker thread -> dispatch loop)
    UpdateCheckFinished(UpdateCheckResult),
    // Download worker events
    Update(UpdateEvent),

    // Update progress window
    UpdateWindowReady,
    StartDownload,
    RestartApp,
    CloseUpdateWindow,

    Quit,
}
