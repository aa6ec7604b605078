use std::fmt;

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
id_newtype!(IdeaId);
id_newtype!(SummaryId);
id_newtype!(PatentId);

/// Lifecycle of a dashboard patent as reported by the backend. Statuses this
/// client does not know decode as [`PatentStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatentStatus {
    Draft,
    Submitted,
    #[serde(rename = "onblockchain", alias = "on_blockchain")]
    OnBlockchain,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl PatentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PatentStatus::Draft => "draft",
            PatentStatus::Submitted => "submitted",
            PatentStatus::OnBlockchain => "onblockchain",
            PatentStatus::Rejected => "rejected",
            PatentStatus::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PatentStatus::Draft => "Draft",
            PatentStatus::Submitted => "Submitted",
            PatentStatus::OnBlockchain => "On blockchain",
            PatentStatus::Rejected => "Rejected",
            PatentStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PatentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
