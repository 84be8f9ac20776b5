use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// How a field can take part in an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Groupable text (or date) value.
    Dimension,
    /// Summable real value.
    Numeric,
    /// Strict boolean.
    Flag,
}

/// Known columns of the operations log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Date,
    Plate,
    Kind,
    Destination,
    Duration,
    Collaborator,
    CteIssued,
    NfReceipt,
    Toll,
    CteQuantity,
    Shift,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Date,
        Field::Plate,
        Field::Kind,
        Field::Destination,
        Field::Duration,
        Field::Collaborator,
        Field::CteIssued,
        Field::NfReceipt,
        Field::Toll,
        Field::CteQuantity,
        Field::Shift,
    ];

    /// Columns without which the operations log cannot be read at all.
    pub const REQUIRED: [Field; 3] = [Field::Date, Field::Kind, Field::Collaborator];

    /// Source column header (versioned contract with the spreadsheet).
    pub fn column(&self) -> &'static str {
        match self {
            Field::Date => "Data",
            Field::Plate => "Placa",
            Field::Kind => "Tipo",
            Field::Destination => "Destino",
            Field::Duration => "Total (min)",
            Field::Collaborator => "Colaborador",
            Field::CteIssued => "CT-e emitido",
            Field::NfReceipt => "Recepção de NFs",
            Field::Toll => "Pedágio",
            Field::CteQuantity => "QTD de CT-e",
            Field::Shift => "Turno",
        }
    }

    /// Identifier used in the configuration file.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Plate => "plate",
            Field::Kind => "type",
            Field::Destination => "destination",
            Field::Duration => "duration",
            Field::Collaborator => "collaborator",
            Field::CteIssued => "cte_issued",
            Field::NfReceipt => "nf_receipt",
            Field::Toll => "toll",
            Field::CteQuantity => "cte_quantity",
            Field::Shift => "shift",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Duration | Field::CteQuantity => FieldKind::Numeric,
            Field::CteIssued | Field::NfReceipt | Field::Toll => FieldKind::Flag,
            _ => FieldKind::Dimension,
        }
    }

    /// Resolve a field from either its config key or its column header
    /// (case-insensitive). Unknown names are a configuration error.
    pub fn parse(name: &str) -> AppResult<Field> {
        let wanted = name.trim().to_lowercase();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == wanted || f.column().to_lowercase() == wanted)
            .ok_or_else(|| AppError::config(format!("unknown field '{}'", name.trim())))
    }

    /// Ensure the field can be used as a grouping key.
    pub fn expect_dimension(self) -> AppResult<Field> {
        match self.kind() {
            FieldKind::Dimension => Ok(self),
            _ => Err(AppError::config(format!(
                "field '{}' cannot be used as a grouping dimension",
                self.key()
            ))),
        }
    }

    pub fn expect_numeric(self) -> AppResult<Field> {
        match self.kind() {
            FieldKind::Numeric => Ok(self),
            _ => Err(AppError::config(format!(
                "field '{}' is not numeric",
                self.key()
            ))),
        }
    }

    pub fn expect_flag(self) -> AppResult<Field> {
        match self.kind() {
            FieldKind::Flag => Ok(self),
            _ => Err(AppError::config(format!(
                "field '{}' is not a boolean field",
                self.key()
            ))),
        }
    }
}

/// Set of fields whose column was present in the loaded source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    present: Vec<Field>,
}

impl Schema {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut present = Vec::new();
        for f in fields {
            if !present.contains(&f) {
                present.push(f);
            }
        }
        Self { present }
    }

    /// Schema with every known field (handy for in-memory record sets).
    pub fn full() -> Self {
        Self::new(Field::ALL)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.present.contains(&field)
    }

    /// Fails with a configuration error when the column was not loaded.
    pub fn require(&self, field: Field) -> AppResult<()> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(AppError::config(format!(
                "column '{}' ({}) is not present in the loaded data",
                field.column(),
                field.key()
            )))
        }
    }
}
