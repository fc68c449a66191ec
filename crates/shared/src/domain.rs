use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(TenantId);
id_newtype!(MemberId);
id_newtype!(ActionItemId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Pastor,
    Volunteer,
}

/// The single authenticated operator. Immutable while active; replaced
/// wholesale on login and dropped on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub tenant_id: TenantId,
    pub avatar_url: Option<String>,
}

/// One reporting period of giving and spending. The sequence these arrive in
/// is chronological and meaningful; trend slicing depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub period: String,
    pub tithes: f64,
    pub offerings: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Prayer,
    Counseling,
    VolunteerSignup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role_label: String,
    pub ministry: String,
    pub status: MemberStatus,
    pub avatar_url: Option<String>,
}

/// A pastoral follow-up queued for the staff. Status transitions are owned
/// by the backend; the coordinator only carries the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: ActionItemId,
    pub category: ActionCategory,
    pub status: ActionStatus,
    pub date: NaiveDate,
    pub requester: Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Light => "light",
            DisplayMode::Dark => "dark",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(DisplayMode::Light),
            "dark" => Ok(DisplayMode::Dark),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorVariant {
    Blue,
    Red,
    Green,
    Glass,
}

impl ColorVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorVariant::Blue => "blue",
            ColorVariant::Red => "red",
            ColorVariant::Green => "green",
            ColorVariant::Glass => "glass",
        }
    }

    /// Glass renders as a translucent skin over the dark palette.
    pub fn is_translucent(self) -> bool {
        matches!(self, ColorVariant::Glass)
    }
}

impl FromStr for ColorVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(ColorVariant::Blue),
            "red" => Ok(ColorVariant::Red),
            "green" => Ok(ColorVariant::Green),
            "glass" => Ok(ColorVariant::Glass),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariant(pub String);

/// Applied presentation preferences. Both fields are always defined once
/// loaded; absence in the durable store resolves to a default, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub mode: DisplayMode,
    pub variant: ColorVariant,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Light,
            variant: ColorVariant::Blue,
        }
    }
}

/// Lifecycle of one asynchronously fetched collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Lifecycle of the AI narrative insight. `Unavailable` carries the friendly
/// text shown in place of a result; raw backend errors never reach here.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightState {
    #[default]
    Idle,
    Pending,
    Available(String),
    Unavailable(String),
}

impl InsightState {
    pub fn is_pending(&self) -> bool {
        matches!(self, InsightState::Pending)
    }

    /// The displayable text for both terminal states.
    pub fn text(&self) -> Option<&str> {
        match self {
            InsightState::Available(text) | InsightState::Unavailable(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mode_round_trips_persisted_form() {
        for mode in [DisplayMode::Light, DisplayMode::Dark] {
            assert_eq!(mode.as_str().parse::<DisplayMode>(), Ok(mode));
        }
    }

    #[test]
    fn color_variant_round_trips_persisted_form() {
        for variant in [
            ColorVariant::Blue,
            ColorVariant::Red,
            ColorVariant::Green,
            ColorVariant::Glass,
        ] {
            assert_eq!(variant.as_str().parse::<ColorVariant>(), Ok(variant));
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert_eq!(
            "purple".parse::<ColorVariant>(),
            Err(UnknownVariant("purple".to_string()))
        );
        assert_eq!(
            "midnight".parse::<DisplayMode>(),
            Err(UnknownVariant("midnight".to_string()))
        );
    }

    #[test]
    fn fetch_state_accessors() {
        let ready: FetchState<i32> = FetchState::Ready(3);
        assert!(ready.is_ready());
        assert_eq!(ready.ready(), Some(&3));
        assert!(FetchState::<i32>::Loading.is_loading());
        assert!(FetchState::<i32>::Failed("boom".into()).is_failed());
        assert_eq!(FetchState::<i32>::Idle.ready(), None);
    }
}
