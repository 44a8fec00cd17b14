//! Update flow orchestration, kept as a pure state machine so transition
//! legality can be tested without a release server or a window system.
//!
//! Events from the update client and requests from the progress window go
//! in; an ordered list of shell commands comes out. The shell executes the
//! commands against real windows and threads; this module never touches
//! either.

/// Lifecycle of one update cycle. A fresh check only happens on the next
/// application launch, so there is no transition back out of `Installing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Checking,
    Available,
    Downloading,
    Downloaded,
    Installing,
}

/// Events emitted by the update client (over the channel, from a worker
/// thread).
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    Available { version: String },
    UpToDate,
    Progress { percent: f32 },
    Downloaded,
    Failed { message: String },
}

/// Requests originating from the progress window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRequest {
    StartDownload,
    Restart,
    Close,
}

/// What the shell should do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    OpenProgressWindow,
    FocusProgressWindow,
    SendVersion(String),
    SendProgress(f32),
    NotifyDownloaded,
    BeginDownload,
    QuitAndInstall,
    CloseProgressWindow,
    ShowError(String),
}

pub struct UpdateOrchestrator {
    phase: UpdatePhase,
    check_started: bool,
    surface_open: bool,
    surface_ready: bool,
    /// Version payload held back until the surface reports ready, so the
    /// creation/delivery race cannot drop it.
    pending_version: Option<String>,
}

impl Default for UpdateOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateOrchestrator {
    pub fn new() -> Self {
        Self {
            phase: UpdatePhase::Idle,
            check_started: false,
            surface_open: false,
            surface_ready: false,
            pending_version: None,
        }
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    pub fn surface_open(&self) -> bool {
        self.surface_open
    }

    /// Move `Idle -> Checking`. Returns false if a check already ran this
    /// process; the caller must not start another one.
    pub fn begin_check(&mut self) -> bool {
        if self.check_started || self.phase != UpdatePhase::Idle {
            return false;
        }
        self.check_started = true;
        self.phase = UpdatePhase::Checking;
        true
    }

    pub fn on_event(&mut self, event: UpdateEvent) -> Vec<ShellCommand> {
        match event {
            UpdateEvent::Available { version } => self.on_available(version),
            UpdateEvent::UpToDate => {
                if self.phase == UpdatePhase::Checking {
                    self.phase = UpdatePhase::Idle;
                }
                Vec::new()
            }
            UpdateEvent::Progress { percent } => {
                if self.phase == UpdatePhase::Downloading {
                    vec![ShellCommand::SendProgress(percent)]
                } else {
                    // Late events after a cancel are dropped
                    Vec::new()
                }
            }
            UpdateEvent::Downloaded => {
                if self.phase == UpdatePhase::Downloading {
                    self.phase = UpdatePhase::Downloaded;
                    vec![ShellCommand::NotifyDownloaded]
                } else {
                    Vec::new()
                }
            }
            UpdateEvent::Failed { message } => self.on_failed(message),
        }
    }

    fn on_available(&mut self, version: String) -> Vec<ShellCommand> {
        if self.phase != UpdatePhase::Checking {
            return Vec::new();
        }
        self.phase = UpdatePhase::Available;
        if self.surface_open {
            let mut commands = vec![ShellCommand::FocusProgressWindow];
            if self.surface_ready {
                commands.push(ShellCommand::SendVersion(version));
            } else {
                self.pending_version = Some(version);
            }
            commands
        } else {
            self.surface_open = true;
            self.surface_ready = false;
            self.pending_version = Some(version);
            vec![ShellCommand::OpenProgressWindow]
        }
    }

    fn on_failed(&mut self, message: String) -> Vec<ShellCommand> {
        match self.phase {
            UpdatePhase::Checking | UpdatePhase::Available | UpdatePhase::Downloading => {
                let mut commands = Vec::new();
                if self.surface_open {
                    commands.push(ShellCommand::CloseProgressWindow);
                }
                commands.push(ShellCommand::ShowError(message));
                self.reset();
                commands
            }
            // Failures while quiescent (e.g. after a cancel) are dropped
            _ => Vec::new(),
        }
    }

    /// The progress window finished building and can receive messages.
    pub fn on_surface_ready(&mut self) -> Vec<ShellCommand> {
        if !self.surface_open {
            return Vec::new();
        }
        self.surface_ready = true;
        match self.pending_version.take() {
            Some(version) => vec![ShellCommand::SendVersion(version)],
            None => Vec::new(),
        }
    }

    pub fn on_request(&mut self, request: SurfaceRequest) -> Vec<ShellCommand> {
        match request {
            SurfaceRequest::StartDownload => {
                if self.phase == UpdatePhase::Available {
                    self.phase = UpdatePhase::Downloading;
                    vec![ShellCommand::BeginDownload]
                } else {
                    // Already downloading, or not in a downloadable state
                    Vec::new()
                }
            }
            SurfaceRequest::Restart => {
                if self.phase == UpdatePhase::Downloaded {
                    self.phase = UpdatePhase::Installing;
                    vec![ShellCommand::QuitAndInstall]
                } else {
                    Vec::new()
                }
            }
            SurfaceRequest::Close => {
                let was_open = self.surface_open;
                if self.phase != UpdatePhase::Installing {
                    self.reset();
                }
                if was_open {
                    vec![ShellCommand::CloseProgressWindow]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn reset(&mut self) {
        self.phase = UpdatePhase::Idle;
        self.surface_open = false;
        self.surface_ready = false;
        self.pending_version = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available(version: &str) -> UpdateEvent {
        UpdateEvent::Available {
            version: version.to_string(),
        }
    }

    fn checking_machine() -> UpdateOrchestrator {
        let mut flow = UpdateOrchestrator::new();
        assert!(flow.begin_check());
        flow
    }

    /// Drive the machine to `Available` with the window open and ready.
    fn available_machine() -> UpdateOrchestrator {
        let mut flow = checking_machine();
        let commands = flow.on_event(available("1.4.0"));
        assert_eq!(commands, vec![ShellCommand::OpenProgressWindow]);
        let commands = flow.on_surface_ready();
        assert_eq!(commands, vec![ShellCommand::SendVersion("1.4.0".to_string())]);
        flow
    }

    fn downloading_machine() -> UpdateOrchestrator {
        let mut flow = available_machine();
        let commands = flow.on_request(SurfaceRequest::StartDownload);
        assert_eq!(commands, vec![ShellCommand::BeginDownload]);
        flow
    }

    #[test]
    fn test_check_starts_once() {
        let mut flow = UpdateOrchestrator::new();
        assert!(flow.begin_check());
        assert_eq!(flow.phase(), UpdatePhase::Checking);
        assert!(!flow.begin_check());
    }

    #[test]
    fn test_no_second_check_after_cycle_completes() {
        let mut flow = checking_machine();
        flow.on_event(UpdateEvent::UpToDate);
        assert_eq!(flow.phase(), UpdatePhase::Idle);
        assert!(!flow.begin_check());
    }

    #[test]
    fn test_up_to_date_is_silent() {
        let mut flow = checking_machine();
        let commands = flow.on_event(UpdateEvent::UpToDate);
        assert!(commands.is_empty());
        assert_eq!(flow.phase(), UpdatePhase::Idle);
    }

    #[test]
    fn test_version_held_until_surface_ready() {
        let mut flow = checking_machine();
        let commands = flow.on_event(available("1.4.0"));
        // Window opens, but the version is not sent yet
        assert_eq!(commands, vec![ShellCommand::OpenProgressWindow]);

        let commands = flow.on_surface_ready();
        assert_eq!(commands, vec![ShellCommand::SendVersion("1.4.0".to_string())]);

        // A second ready signal has nothing left to deliver
        assert!(flow.on_surface_ready().is_empty());
    }

    #[test]
    fn test_download_requires_explicit_request() {
        let mut flow = available_machine();
        // Progress before the user opted in is dropped
        assert!(flow.on_event(UpdateEvent::Progress { percent: 0.5 }).is_empty());
        assert_eq!(flow.phase(), UpdatePhase::Available);
    }

    #[test]
    fn test_progress_forwarded_verbatim() {
        let mut flow = downloading_machine();
        for percent in [0.0, 0.25, 0.25, 0.8] {
            let commands = flow.on_event(UpdateEvent::Progress { percent });
            assert_eq!(commands, vec![ShellCommand::SendProgress(percent)]);
        }
    }

    #[test]
    fn test_duplicate_start_download_ignored() {
        let mut flow = downloading_machine();
        let commands = flow.on_request(SurfaceRequest::StartDownload);
        assert!(commands.is_empty());
        assert_eq!(flow.phase(), UpdatePhase::Downloading);
    }

    #[test]
    fn test_downloaded_offers_restart() {
        let mut flow = downloading_machine();
        let commands = flow.on_event(UpdateEvent::Downloaded);
        assert_eq!(commands, vec![ShellCommand::NotifyDownloaded]);
        assert_eq!(flow.phase(), UpdatePhase::Downloaded);
    }

    #[test]
    fn test_restart_only_after_downloaded() {
        let mut flow = downloading_machine();
        assert!(flow.on_request(SurfaceRequest::Restart).is_empty());

        flow.on_event(UpdateEvent::Downloaded);
        let commands = flow.on_request(SurfaceRequest::Restart);
        assert_eq!(commands, vec![ShellCommand::QuitAndInstall]);
        assert_eq!(flow.phase(), UpdatePhase::Installing);
    }

    #[test]
    fn test_error_during_checking_goes_quiescent() {
        let mut flow = checking_machine();
        let commands = flow.on_event(UpdateEvent::Failed {
            message: "connection refused".to_string(),
        });
        // No window yet: exactly one error message, no close, no download
        assert_eq!(
            commands,
            vec![ShellCommand::ShowError("connection refused".to_string())]
        );
        assert_eq!(flow.phase(), UpdatePhase::Idle);
    }

    #[test]
    fn test_error_with_window_open_closes_it_first() {
        let mut flow = downloading_machine();
        let commands = flow.on_event(UpdateEvent::Failed {
            message: "stream ended".to_string(),
        });
        assert_eq!(
            commands,
            vec![
                ShellCommand::CloseProgressWindow,
                ShellCommand::ShowError("stream ended".to_string()),
            ]
        );
        assert_eq!(flow.phase(), UpdatePhase::Idle);
        assert!(!flow.surface_open());
    }

    #[test]
    fn test_no_retry_after_error() {
        let mut flow = checking_machine();
        flow.on_event(UpdateEvent::Failed {
            message: "boom".to_string(),
        });
        assert!(!flow.begin_check());
    }

    #[test]
    fn test_second_available_refocuses_existing_window() {
        let mut flow = UpdateOrchestrator::new();
        flow.begin_check();
        flow.on_event(available("1.4.0"));
        flow.on_surface_ready();

        // A duplicate availability report must not open a second window.
        // Force the phase back to make the transition legal again.
        flow.phase = UpdatePhase::Checking;
        let commands = flow.on_event(available("1.4.0"));
        assert_eq!(
            commands,
            vec![
                ShellCommand::FocusProgressWindow,
                ShellCommand::SendVersion("1.4.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_close_cancels_and_drops_late_events() {
        let mut flow = downloading_machine();
        let commands = flow.on_request(SurfaceRequest::Close);
        assert_eq!(commands, vec![ShellCommand::CloseProgressWindow]);
        assert_eq!(flow.phase(), UpdatePhase::Idle);

        // The download thread is still running; its events must not
        // resurrect the UI.
        assert!(flow.on_event(UpdateEvent::Progress { percent: 0.9 }).is_empty());
        assert!(flow.on_event(UpdateEvent::Downloaded).is_empty());
        assert!(flow
            .on_event(UpdateEvent::Failed { message: "late".to_string() })
            .is_empty());
    }

    #[test]
    fn test_close_without_window_is_noop() {
        let mut flow = checking_machine();
        assert!(flow.on_request(SurfaceRequest::Close).is_empty());
    }

    #[test]
    fn test_available_outside_checking_is_dropped() {
        let mut flow = UpdateOrchestrator::new();
        assert!(flow.on_event(available("1.4.0")).is_empty());
        assert_eq!(flow.phase(), UpdatePhase::Idle);
    }
}
