//! Text-backed database enums.
//!
//! Statuses, kinds, and modalities are stored as `TEXT` columns guarded by
//! CHECK constraints; on the Rust side each is a proper enum so the workflow
//! dispatch is exhaustive. The sqlx plumbing delegates to `String`, the same
//! way the ID newtypes delegate to `Uuid`.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::PgTypeInfo,
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Error returned when a text value does not match any enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnumValue {
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for InvalidEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.value, self.expected)
    }
}

impl std::error::Error for InvalidEnumValue {}

/// Defines a text-backed enum with serde, sqlx, and schema support.
///
/// Variant text must match the snake_case serde rename so JSON and database
/// representations agree.
macro_rules! define_db_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(InvalidEnumValue {
                        value: other.to_string(),
                        expected: stringify!($name),
                    }),
                }
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<$name>()?)
            }
        }
    };
}

define_db_enum!(
    /// What a change request asks for.
    pub enum RequestKind {
        /// Move the session to a new date/timeslot/resource.
        Reschedule => "reschedule",
        /// Hand the session over to another teacher.
        Swap => "swap",
        /// Switch the session between in-person and virtual resources.
        ModalityChange => "modality_change",
    }
);

define_db_enum!(
    /// Lifecycle state of a change request.
    pub enum RequestStatus {
        Pending => "pending",
        /// A swap awaiting the nominated replacement's confirmation.
        WaitingConfirm => "waiting_confirm",
        Approved => "approved",
        Rejected => "rejected",
    }
);

define_db_enum!(
    /// Lifecycle state of a class session occurrence.
    pub enum SessionStatus {
        Planned => "planned",
        Done => "done",
        Cancelled => "cancelled",
    }
);

define_db_enum!(
    /// State of one teacher's assignment to one session.
    pub enum AssignmentStatus {
        Scheduled => "scheduled",
        OnLeave => "on_leave",
        Substituted => "substituted",
    }
);

define_db_enum!(
    /// Whether a resource is a physical room or a virtual link.
    pub enum ResourceKind {
        Room => "room",
        Virtual => "virtual",
    }
);

define_db_enum!(
    /// Delivery modality of a class or session.
    pub enum Modality {
        InPerson => "in_person",
        Virtual => "virtual",
    }
);

define_db_enum!(
    /// System role of a user.
    pub enum UserRole {
        Staff => "staff",
        Teacher => "teacher",
    }
);

impl ResourceKind {
    /// The modality a session takes on when held in a resource of this kind.
    pub const fn modality(&self) -> Modality {
        match self {
            Self::Room => Modality::InPerson,
            Self::Virtual => Modality::Virtual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_serde() {
        let json = serde_json::to_string(&RequestKind::ModalityChange).unwrap();
        assert_eq!(json, format!("\"{}\"", RequestKind::ModalityChange.as_str()));

        let json = serde_json::to_string(&RequestStatus::WaitingConfirm).unwrap();
        assert_eq!(json, "\"waiting_confirm\"");

        let json = serde_json::to_string(&AssignmentStatus::OnLeave).unwrap();
        assert_eq!(json, "\"on_leave\"");

        let json = serde_json::to_string(&Modality::InPerson).unwrap();
        assert_eq!(json, "\"in_person\"");
    }

    #[test]
    fn test_parse_roundtrip() {
        for kind in [
            RequestKind::Reschedule,
            RequestKind::Swap,
            RequestKind::ModalityChange,
        ] {
            assert_eq!(kind.as_str().parse::<RequestKind>().unwrap(), kind);
        }
        for status in [
            SessionStatus::Planned,
            SessionStatus::Done,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "expired".parse::<RequestStatus>().unwrap_err();
        assert_eq!(err.value, "expired");
        assert!(err.to_string().contains("RequestStatus"));
    }

    #[test]
    fn test_resource_kind_modality() {
        assert_eq!(ResourceKind::Room.modality(), Modality::InPerson);
        assert_eq!(ResourceKind::Virtual.modality(), Modality::Virtual);
    }
}
