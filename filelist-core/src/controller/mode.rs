//! ``src/controller/mode.rs``
//!
//! Confirmation state machine for destructive actions. The widget starts in
//! `Normal`; a destructive key may move it into one of the `Confirm*` states,
//! and the next yes/no answer always brings it back.

use crate::fs::operations::Operation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigationMode {
    #[default]
    Normal,

    ConfirmDelete,

    ConfirmCompress,

    ConfirmDecompress,
}

/// Classified key while a confirmation prompt is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmInput {
    Affirm,
    Deny,
    Other,
}

impl NavigationMode {
    /// Prompt state guarding `operation`.
    #[must_use]
    pub const fn confirming(operation: Operation) -> Self {
        match operation {
            Operation::Delete => Self::ConfirmDelete,
            Operation::Compress => Self::ConfirmCompress,
            Operation::Decompress => Self::ConfirmDecompress,
        }
    }

    /// Operation awaiting confirmation, if any.
    #[must_use]
    pub const fn pending(self) -> Option<Operation> {
        match self {
            Self::Normal => None,
            Self::ConfirmDelete => Some(Operation::Delete),
            Self::ConfirmCompress => Some(Operation::Compress),
            Self::ConfirmDecompress => Some(Operation::Decompress),
        }
    }

    #[must_use]
    pub const fn is_confirming(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Transition table for an answer: next mode plus the operation to run.
    ///
    /// | mode      | Affirm          | Deny   | Other     |
    /// |-----------|-----------------|--------|-----------|
    /// | Normal    | Normal          | Normal | Normal    |
    /// | Confirm X | Normal, run X   | Normal | Confirm X |
    #[must_use]
    pub const fn on_confirm_input(self, input: ConfirmInput) -> (Self, Option<Operation>) {
        match (self, input) {
            (Self::Normal, _) => (Self::Normal, None),
            (mode, ConfirmInput::Affirm) => (Self::Normal, mode.pending()),
            (_, ConfirmInput::Deny) => (Self::Normal, None),
            (mode, ConfirmInput::Other) => (mode, None),
        }
    }

    /// Verb used in the prompt.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self.pending() {
            Some(op) => op.operation_name(),
            None => "",
        }
    }
}
