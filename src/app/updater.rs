use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

const GITHUB_OWNER: &str = "attendancepad";
const GITHUB_REPO: &str = "attendancepad";
const USER_AGENT: &str = "AttendancePad";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub name: String,
    #[serde(default)]
    pub body: String,
    pub html_url: String,
    pub published_at: String,
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    /// Get the version string (tag_name without 'v' prefix)
    pub fn version(&self) -> String {
        self.tag_name.trim_start_matches('v').to_string()
    }

    /// The downloadable asset for the running platform, if the release
    /// carries one.
    pub fn platform_asset(&self) -> Option<&ReleaseAsset> {
        let needle = get_platform_asset_name();
        self.assets.iter().find(|a| a.name.contains(needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub enum UpdateCheckResult {
    NoUpdate,
    UpdateAvailable(ReleaseInfo),
    Error(String),
}

/// Compare two semantic versions
/// Returns true if remote is newer than current
pub fn is_newer_version(current: &str, remote: &str) -> bool {
    match (semver::Version::parse(current), semver::Version::parse(remote)) {
        (Ok(curr), Ok(rem)) => rem > curr,
        _ => false, // If parsing fails, assume not newer
    }
}

/// Fetch the latest release from GitHub
pub fn fetch_latest_release(owner: &str, repo: &str) -> Result<ReleaseInfo, String> {
    let url = format!(
        "https://api.github.com/repos/{}/{}/releases/latest",
        owner, repo
    );

    let response = minreq::get(&url)
        .with_header("User-Agent", USER_AGENT)
        .with_timeout(10)
        .send()
        .map_err(|e| format!("Failed to connect to update server: {}", e))?;

    if !(200..300).contains(&response.status_code) {
        return Err(format!(
            "Update server returned error: {}",
            response.status_code
        ));
    }

    response
        .json::<ReleaseInfo>()
        .map_err(|e| format!("Failed to parse update information: {}", e))
}

/// Check for updates given the running version
pub fn check_for_updates(current_version: &str) -> UpdateCheckResult {
    let release = match fetch_latest_release(GITHUB_OWNER, GITHUB_REPO) {
        Ok(r) => r,
        Err(e) => return UpdateCheckResult::Error(e),
    };

    let remote_version = release.version();
    if is_newer_version(current_version, &remote_version) {
        UpdateCheckResult::UpdateAvailable(release)
    } else {
        UpdateCheckResult::NoUpdate
    }
}

/// Get the expected asset name for the current platform
pub fn get_platform_asset_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos-universal"
    } else if cfg!(target_os = "windows") {
        "windows-x64.exe"
    } else {
        "linux-amd64"
    }
}

/// Download a binary from a URL to a specified path with progress
pub fn download_file<F>(url: &str, dest_path: &Path, mut progress_cb: F) -> Result<(), String>
where
    F: FnMut(f32),
{
    let response = minreq::get(url)
        .with_header("User-Agent", USER_AGENT)
        .with_timeout(60)
        .send_lazy()
        .map_err(|e| format!("Failed to download update: {}", e))?;

    if !(200..300).contains(&response.status_code) {
        return Err(format!(
            "Download failed with status: {}",
            response.status_code
        ));
    }

    let total_size: u64 = response
        .headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| "Failed to get content length".to_string())?;

    let file = std::fs::File::create(dest_path)
        .map_err(|e| format!("Failed to create temporary file: {}", e))?;
    let mut writer = std::io::BufWriter::new(file);

    let mut downloaded: u64 = 0;
    let mut last_progress: f32 = -1.0;
    for byte in response {
        let (byte, _) = byte.map_err(|e| format!("Failed to read from download stream: {}", e))?;
        writer
            .write_all(&[byte])
            .map_err(|e| format!("Failed to write to temporary file: {}", e))?;
        downloaded += 1;

        let current_progress = (downloaded as f32 / total_size as f32 * 100.0).floor() / 100.0;
        if current_progress > last_progress {
            progress_cb(current_progress);
            last_progress = current_progress;
        }
    }

    // Ensure all data is written to disk
    writer
        .flush()
        .map_err(|e| format!("Failed to flush file to disk: {}", e))?;

    // Report 100% completion
    if last_progress < 1.0 {
        progress_cb(1.0);
    }

    Ok(())
}

/// Replace the current executable with a new one
pub fn install_update(new_binary_path: &Path) -> Result<(), String> {
    let current_exe = std::env::current_exe()
        .map_err(|e| format!("Failed to get current executable path: {}", e))?;

    // On Windows, we can't overwrite a running exe, but we can rename it.
    // On macOS/Linux, it's also safer to rename the old one first.
    let old_exe = current_exe.with_extension("old");

    // Clean up any previous .old file
    if old_exe.exists() {
        let _ = std::fs::remove_file(&old_exe);
    }

    // Rename current exe to .old
    std::fs::rename(&current_exe, &old_exe)
        .map_err(|e| format!("Failed to backup current executable: {}", e))?;

    // Move new exe to current location
    if let Err(e) = std::fs::rename(new_binary_path, &current_exe) {
        // Rollback on failure
        let _ = std::fs::rename(&old_exe, &current_exe);
        return Err(format!("Failed to install new executable: {}", e));
    }

    // On Unix systems, ensure the new binary is executable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&current_exe)
            .map_err(|e| format!("Failed to get metadata: {}", e))?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&current_exe, perms)
            .map_err(|e| format!("Failed to set executable permissions: {}", e))?;
    }

    Ok(())
}

/// Deterministic temp location for the downloaded binary; the install step
/// reads it back from here.
pub fn download_dest() -> std::path::PathBuf {
    std::env::temp_dir().join("attendancepad_update")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_comparison_newer() {
        assert!(is_newer_version("1.3.0", "1.3.1"));
        assert!(is_newer_version("1.3.0", "1.4.0"));
        assert!(is_newer_version("1.3.0", "2.0.0"));
    }

    #[test]
    fn test_version_comparison_same() {
        assert!(!is_newer_version("1.3.0", "1.3.0"));
        assert!(!is_newer_version("2.0.0", "2.0.0"));
    }

    #[test]
    fn test_version_comparison_older() {
        assert!(!is_newer_version("1.3.1", "1.3.0"));
        assert!(!is_newer_version("2.0.0", "1.9.9"));
    }

    #[test]
    fn test_version_comparison_prerelease() {
        // Prereleases are considered lower than releases
        assert!(is_newer_version("1.3.0", "1.3.1-beta.1"));
        assert!(is_newer_version("1.3.1-beta.1", "1.3.1"));
        assert!(!is_newer_version("1.3.1", "1.3.1-beta.1"));
    }

    #[test]
    fn test_version_comparison_invalid() {
        // Invalid versions should return false
        assert!(!is_newer_version("invalid", "1.3.1"));
        assert!(!is_newer_version("1.3.0", "invalid"));
        assert!(!is_newer_version("invalid", "invalid"));
    }

    #[test]
    fn test_release_version_strips_v_prefix() {
        let release = ReleaseInfo {
            tag_name: "v1.3.1".to_string(),
            name: "Release 1.3.1".to_string(),
            body: String::new(),
            html_url: "https://example.invalid/releases/tag/v1.3.1".to_string(),
            published_at: "2026-08-01T00:00:00Z".to_string(),
            prerelease: false,
            assets: vec![],
        };
        assert_eq!(release.version(), "1.3.1");
    }

    #[test]
    fn test_platform_asset_lookup() {
        let asset = |name: &str| ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("https://example.invalid/{}", name),
            size: 1024,
        };
        let release = ReleaseInfo {
            tag_name: "1.3.1".to_string(),
            name: "Release 1.3.1".to_string(),
            body: String::new(),
            html_url: String::new(),
            published_at: String::new(),
            prerelease: false,
            assets: vec![
                asset("AttendancePad-linux-amd64"),
                asset("AttendancePad-windows-x64.exe"),
                asset("AttendancePad-macos-universal"),
            ],
        };
        let found = release.platform_asset().unwrap();
        assert!(found.name.contains(get_platform_asset_name()));
    }

    #[test]
    fn test_release_info_serialization() {
        let release = ReleaseInfo {
            tag_name: "1.3.1".to_string(),
            name: "Release 1.3.1".to_string(),
            body: "Test release".to_string(),
            html_url: "https://example.invalid/releases/tag/1.3.1".to_string(),
            published_at: "2026-08-01T00:00:00Z".to_string(),
            prerelease: false,
            assets: vec![],
        };

        let json = serde_json::to_string(&release).unwrap();
        let parsed: ReleaseInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(release.version(), parsed.version());
        assert_eq!(release.tag_name, parsed.tag_name);
    }
}
