use serde::{Deserialize, Serialize};

use super::Reference;
use crate::values::AccountId;

/// Trading account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Broker-side account code
    pub name: String,
    /// Human-readable label
    pub alias: String,
}

impl Reference for Account {
    fn id(&self) -> AccountId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
