use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use recordstrip_core::model::DriverProfile;

/// On-disk driver-profile snapshot, kept so the driver does not log in on
/// every start.
///
/// A snapshot that no longer parses against the current profile shape (a
/// required field is missing) is discarded on load, forcing a fresh login.
/// That is the migration trigger for stale pre-upgrade snapshots.
#[derive(Debug, Clone)]
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached profile, if a valid snapshot exists. Invalid snapshots
    /// are deleted on the way out.
    pub fn load(&self) -> Option<DriverProfile> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return None,
        };
        match serde_json::from_str::<DriverProfile>(&raw) {
            Ok(profile) => {
                debug!(event = "cache.profile_loaded", domain = "cache", profile_id = %profile.id);
                Some(profile)
            }
            Err(err) => {
                warn!(event = "cache.profile_invalid", domain = "cache", error = %err);
                let _ = std::fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, profile: &DriverProfile) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(profile).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, raw)
    }

    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordstrip_core::model::ProfileDocuments;
    use uuid::Uuid;

    fn profile() -> DriverProfile {
        DriverProfile {
            id: Uuid::new_v4(),
            full_name: "Carlos".into(),
            license_plate: "ABC1D23".into(),
            vehicle_model: "Onix".into(),
            phone_number: "+5511999999999".into(),
            email: Some("carlos@x.com".into()),
            password: None,
            auth_id: None,
            is_active: true,
            is_admin: false,
            show_license_plate: true,
            include_signature: false,
            pix_key: Some("carlos@x.com".into()),
            avatar_url: None,
            documents: ProfileDocuments::default(),
        }
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ProfileCache::new(dir.path().join("profile.json"));
        assert!(cache.load().is_none());

        let saved = profile();
        cache.save(&saved).unwrap();
        assert_eq!(cache.load(), Some(saved));

        cache.clear().unwrap();
        assert!(cache.load().is_none());
        cache.clear().unwrap(); // idempotent
    }

    #[test]
    fn stale_snapshot_is_discarded_and_forces_relogin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        // Pre-upgrade snapshot without the access-gate field.
        std::fs::write(&path, r#"{"id":"not even a uuid","full_name":"Carlos"}"#).unwrap();

        let cache = ProfileCache::new(&path);
        assert!(cache.load().is_none());
        assert!(!path.exists(), "invalid snapshot should be deleted");
    }
}
