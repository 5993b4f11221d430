use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Timestamp};

/// Context of one state-mutating call: who is calling, what value is attached, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub sender: Address,
    pub value: Amount,
    pub now: Timestamp,
}

impl Call {
    /// Call without attached value
    pub fn new(sender: Address, now: Timestamp) -> Self {
        Call {
            sender,
            value: Amount::ZERO,
            now,
        }
    }

    /// Same call with `value` attached
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}
