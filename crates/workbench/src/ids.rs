use std::fmt;
use std::str::FromStr;

use snafu::ResultExt;
use uuid::Uuid;

use super::error::{InvalidIdSnafu, WorkbenchError, WorkbenchResult};

// One macro for every id wrapper so sessions and messages share parsing and display rules.
macro_rules! define_workbench_id {
    ($name:ident, $id_type:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(raw: Uuid) -> Self {
                Self(raw)
            }

            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn parse(raw: &str) -> WorkbenchResult<Self> {
                let parsed = Uuid::parse_str(raw).context(InvalidIdSnafu {
                    stage: "parse-workbench-id",
                    id_type: $id_type,
                    raw: raw.to_string(),
                })?;
                Ok(Self(parsed))
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = WorkbenchError;

            fn from_str(raw: &str) -> WorkbenchResult<Self> {
                Self::parse(raw)
            }
        }
    };
}

define_workbench_id!(SessionId, "session-id");
define_workbench_id!(MessageId, "message-id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_display() {
        let id = SessionId::new_v7();
        let parsed: SessionId = id.to_string().parse().expect("display output should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_id_reports_its_kind() {
        let error = MessageId::parse("not-a-uuid").expect_err("garbage must be rejected");
        assert!(matches!(
            error,
            WorkbenchError::InvalidId {
                id_type: "message-id",
                ..
            }
        ));
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(MessageId::new_v7(), MessageId::new_v7());
    }
}
