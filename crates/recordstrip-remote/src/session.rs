use uuid::Uuid;

use recordstrip_core::model::DriverProfile;

use crate::errors::RemoteError;

/// The logged-in driver, passed explicitly to every driver-scoped call
/// instead of being read from ambient storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSession {
    profile: DriverProfile,
}

impl DriverSession {
    pub fn new(profile: DriverProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DriverProfile {
        &self.profile
    }

    pub fn driver_id(&self) -> Uuid {
        self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.is_admin
    }

    /// Gate for the admin operations; non-admins get a dedicated error
    /// rather than a generic remote failure.
    pub fn require_admin(&self) -> Result<(), RemoteError> {
        if self.profile.is_admin {
            Ok(())
        } else {
            Err(RemoteError::Validation(
                "this operation requires an admin profile".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordstrip_core::model::ProfileDocuments;

    #[test]
    fn admin_gate_distinguishes_roles() {
        let mut profile = DriverProfile {
            id: Uuid::new_v4(),
            full_name: "Carlos".into(),
            license_plate: String::new(),
            vehicle_model: String::new(),
            phone_number: String::new(),
            email: None,
            password: None,
            auth_id: None,
            is_active: true,
            is_admin: false,
            show_license_plate: false,
            include_signature: false,
            pix_key: None,
            avatar_url: None,
            documents: ProfileDocuments::default(),
        };
        assert!(DriverSession::new(profile.clone()).require_admin().is_err());
        profile.is_admin = true;
        assert!(DriverSession::new(profile).require_admin().is_ok());
    }
}
