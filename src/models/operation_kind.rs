use serde::Serialize;

/// Operation type of a logged event ("Tipo" column).
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Lançamento: trip / departure log entry.
    Launch,
    /// Baixa: document closeout, carries the CT-e count.
    Closeout,
    /// Abastecimento: refueling.
    Refuel,
    /// Any other label, kept verbatim so counts still add up.
    Other(String),
}

impl OperationKind {
    pub fn from_label(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "lançamento" | "lancamento" => Self::Launch,
            "baixa" => Self::Closeout,
            "abastecimento" => Self::Refuel,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OperationKind::Launch => "Lançamento",
            OperationKind::Closeout => "Baixa",
            OperationKind::Refuel => "Abastecimento",
            OperationKind::Other(s) => s.as_str(),
        }
    }

    /// Plural heading used in the indicator list.
    pub fn plural(&self) -> &str {
        match self {
            OperationKind::Launch => "Lançamentos",
            OperationKind::Closeout => "Baixas",
            OperationKind::Refuel => "Abastecimentos",
            OperationKind::Other(s) => s.as_str(),
        }
    }

    pub fn is_closeout(&self) -> bool {
        matches!(self, OperationKind::Closeout)
    }

    pub fn known() -> [OperationKind; 3] {
        [
            OperationKind::Launch,
            OperationKind::Closeout,
            OperationKind::Refuel,
        ]
    }
}
