use serde::{Deserialize, Serialize};

/// A named, typed input or output of a contract method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Field name. Empty for the single output of a constant.
    pub name: String,
    /// Declared type, as written in the schema.
    #[serde(rename = "type")]
    pub ty: String,
    /// Internal type. Schemas carry a single type, so this mirrors `ty`.
    #[serde(rename = "internalType")]
    pub internal_type: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        Self {
            name: name.into(),
            internal_type: ty.clone(),
            ty,
        }
    }
}

/// State mutability marker of a method descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Nonpayable,
}

/// Kind of ABI entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Function,
}

/// Normalized description of one contract method, derived from its schema.
///
/// Built once per contract at bind time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// True for read-only methods, dispatched as dry runs.
    pub constant: bool,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub payable: bool,
    #[serde(rename = "stateMutability")]
    pub state_mutability: StateMutability,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl MethodDescriptor {
    /// Build a function descriptor with the fixed ABI markers schemas imply.
    pub fn function(
        name: impl Into<String>,
        constant: bool,
        inputs: Vec<Param>,
        outputs: Vec<Param>,
    ) -> Self {
        Self {
            name: name.into(),
            constant,
            inputs,
            outputs,
            payable: true,
            state_mutability: StateMutability::Nonpayable,
            kind: EntryKind::Function,
        }
    }

    /// Names of the inputs, in declaration order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|p| p.name.as_str())
    }
}
