use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment status of a trip. Toggled from the history views, bulk-flipped by
/// the settle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Paid,
    Pending,
}

impl TripStatus {
    /// The opposite status, used by the paid↔pending toggle.
    pub fn toggled(self) -> Self {
        match self {
            TripStatus::Paid => TripStatus::Pending,
            TripStatus::Pending => TripStatus::Paid,
        }
    }

    /// Wire/column value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TripStatus::Paid => "paid",
            TripStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized trip status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trip status: {0}")]
pub struct ParseTripStatusError(pub String);

impl std::str::FromStr for TripStatus {
    type Err = ParseTripStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(TripStatus::Paid),
            "pending" => Ok(TripStatus::Pending),
            other => Err(ParseTripStatusError(other.to_string())),
        }
    }
}

/// A driver's recurring customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub passenger_class: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Owning driver. Optional while pre-scoping rows are still around.
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One billable ride event.
///
/// `trip_date` is a calendar date with no time component; `created_at`
/// orders trips recorded on the same day. The embedded `passenger` is
/// present only when the row was selected with the passenger join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub passenger_id: Uuid,
    pub trip_date: NaiveDate,
    pub amount: f64,
    pub status: TripStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub passenger: Option<Passenger>,
}

/// A driver-side cost row. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub expense_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fixed expense categories offered before any driver-defined ones exist.
pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 5] = [
    "Combustível",
    "Manutenção",
    "Alimentação",
    "Lavagem",
    OTHER_CATEGORY,
];

/// The catch-all category; driver-defined customs are slotted before it.
pub const OTHER_CATEGORY: &str = "Outros";

/// All selectable categories for a driver: the default set plus any custom
/// category found in `expenses`, customs inserted before [`OTHER_CATEGORY`].
pub fn expense_categories(expenses: &[Expense]) -> Vec<String> {
    let mut categories: Vec<String> = DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .collect();
    for expense in expenses {
        if !categories.iter().any(|c| c == &expense.category) {
            categories.insert(categories.len() - 1, expense.category.clone());
        }
    }
    categories
}

/// The report/document attachments a profile may carry, one typed slot per
/// document so "uploaded vs not" is a checkable state instead of a loose
/// nullable string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocuments {
    #[serde(default)]
    pub report_logo_url: Option<String>,
    #[serde(default)]
    pub signature_url: Option<String>,
    #[serde(default)]
    pub car_document_url: Option<String>,
    #[serde(default)]
    pub cnh_url: Option<String>,
}

/// Document slots on a driver profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    ReportLogo,
    Signature,
    CarDocument,
    DriverLicense,
}

impl DocumentKind {
    /// Every document slot, in display order.
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::ReportLogo,
        DocumentKind::Signature,
        DocumentKind::CarDocument,
        DocumentKind::DriverLicense,
    ];
}

impl ProfileDocuments {
    /// URL of the given document, if uploaded.
    pub fn url(&self, kind: DocumentKind) -> Option<&str> {
        let slot = match kind {
            DocumentKind::ReportLogo => &self.report_logo_url,
            DocumentKind::Signature => &self.signature_url,
            DocumentKind::CarDocument => &self.car_document_url,
            DocumentKind::DriverLicense => &self.cnh_url,
        };
        slot.as_deref()
    }

    pub fn is_uploaded(&self, kind: DocumentKind) -> bool {
        self.url(kind).is_some_and(|u| !u.trim().is_empty())
    }
}

/// The app's primary user record.
///
/// Carries both credential models: the legacy plaintext `password` column
/// and the optional `auth_id` link to a hosted-auth identity. `is_active`
/// gates access, `is_admin` gates the admin views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Legacy pre-migration credential column.
    #[serde(default)]
    pub password: Option<String>,
    /// Link to the hosted-auth identity, populated by silent migration.
    #[serde(default)]
    pub auth_id: Option<Uuid>,
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub show_license_plate: bool,
    #[serde(default)]
    pub include_signature: bool,
    /// Payment reference included in outgoing charge messages.
    #[serde(default)]
    pub pix_key: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub documents: ProfileDocuments,
}

/// Insert payload for a passenger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPassenger {
    pub full_name: String,
    pub phone_number: String,
    pub is_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Uuid>,
}

/// Insert payload for a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrip {
    pub passenger_id: Uuid,
    pub trip_date: NaiveDate,
    pub amount: f64,
    pub status: TripStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Insert payload for an expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub driver_id: Uuid,
    pub amount: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub expense_date: NaiveDate,
}

/// Insert payload for a driver profile (admin registration). The legacy
/// password column seeds the first login; the hosted-auth link is populated
/// later by silent migration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDriverProfile {
    pub full_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub vehicle_model: String,
    pub license_plate: String,
    pub is_active: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
}

/// Patch payload for the editable profile fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub license_plate: String,
    pub vehicle_model: String,
    pub phone_number: String,
    pub show_license_plate: bool,
    pub include_signature: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expense(category: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            amount: 10.0,
            category: category.to_string(),
            description: None,
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn status_toggles_and_round_trips_through_wire_value() {
        assert_eq!(TripStatus::Paid.toggled(), TripStatus::Pending);
        assert_eq!(TripStatus::Pending.toggled(), TripStatus::Paid);
        assert_eq!("paid".parse::<TripStatus>().unwrap(), TripStatus::Paid);
        assert_eq!("PENDING".parse::<TripStatus>().unwrap(), TripStatus::Pending);
        assert!("settled".parse::<TripStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&TripStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn custom_categories_slot_before_the_catch_all() {
        let expenses = vec![expense("IPVA"), expense("Combustível"), expense("IPVA")];
        let categories = expense_categories(&expenses);
        assert_eq!(categories.len(), DEFAULT_EXPENSE_CATEGORIES.len() + 1);
        assert_eq!(categories[categories.len() - 2], "IPVA");
        assert_eq!(categories.last().map(String::as_str), Some(OTHER_CATEGORY));
    }

    #[test]
    fn document_slots_report_uploaded_state() {
        let documents = ProfileDocuments {
            signature_url: Some("https://cdn.test/sig.png".into()),
            cnh_url: Some("   ".into()),
            ..Default::default()
        };
        assert!(documents.is_uploaded(DocumentKind::Signature));
        assert!(!documents.is_uploaded(DocumentKind::ReportLogo));
        assert!(!documents.is_uploaded(DocumentKind::DriverLicense));
        assert_eq!(documents.url(DocumentKind::Signature), Some("https://cdn.test/sig.png"));
    }

    #[test]
    fn profile_deserialization_requires_the_access_gate_fields() {
        let missing_is_active = serde_json::json!({
            "id": Uuid::new_v4(),
            "full_name": "Carlos",
        });
        assert!(serde_json::from_value::<DriverProfile>(missing_is_active).is_err());

        let minimal = serde_json::json!({
            "id": Uuid::new_v4(),
            "full_name": "Carlos",
            "is_active": true,
        });
        let profile: DriverProfile = serde_json::from_value(minimal).unwrap();
        assert!(profile.is_active);
        assert!(!profile.is_admin);
        assert!(profile.auth_id.is_none());
    }
}
